//! # hrdesk Router
//!
//! A small routing core that sits behind axum's fallback service.
//!
//! - [`RouteTable`]: registration, route groups with middleware chains, and
//!   the not-found fallback
//! - [`PathPattern`]: `:name` captures over `/`-separated segments
//! - [`Middleware`]: synchronous pre-handler hooks that may reject
//! - [`Handler`] / [`Reply`]: async handlers that return structured results
//! - [`Dispatcher`]: the immutable, shareable result of [`RouteTable::build`]
//!
//! # Example
//!
//! ```ignore
//! let mut table = RouteTable::new();
//! table.get("/api", welcome);
//! table.group(vec![boxed(Authenticate)], |t| {
//!     t.get("/api/users/:id", users::controller::get_user);
//! });
//! let dispatcher = table.build()?;
//!
//! let app = axum::Router::new().fallback(move |req: Request| {
//!     let dispatcher = dispatcher.clone();
//!     async move { dispatcher.dispatch(req, state).await }
//! });
//! ```

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod method;
pub mod middleware;
pub mod path;
pub mod table;

pub use context::RequestContext;
pub use dispatcher::{Dispatcher, MatchResult};
pub use error::RouteError;
pub use handler::{Handler, HandlerResult, Reply, ReplyBody};
pub use method::Method;
pub use middleware::{BoxedMiddleware, Middleware, boxed, run_chain};
pub use path::{Params, PathPattern, normalize_path};
pub use table::{GroupId, Route, RouteTable};
