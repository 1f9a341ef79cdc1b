pub mod controller;
pub mod hub;
pub mod model;
pub mod router;
pub mod service;
pub mod ws;
