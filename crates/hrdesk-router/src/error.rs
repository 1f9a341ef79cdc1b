use thiserror::Error;

use crate::method::Method;

/// Problems found while building the route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("route {method} {pattern} is registered more than once")]
    Conflict { method: Method, pattern: String },
}
