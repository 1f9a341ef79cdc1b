pub mod controller;
pub mod model;
pub mod renderer;
pub mod router;
pub mod service;
