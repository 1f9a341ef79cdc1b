//! Route-group middlewares.
//!
//! - [`auth`]: bearer token verification and the handler-side [`AuthUser`]
//! - [`role`]: role requirements on top of an authenticated request
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`Authenticate`] verifies the token and stores the [`Claims`](hrdesk_auth::Claims)
//! 3. [`RequireRoles`] (if present) checks the role in those claims
//! 4. The handler reads the claims through [`AuthUser::from_context`]
//!
//! # Example
//!
//! ```ignore
//! table.group(authenticated(), |t| {
//!     t.get("/api/leave/balance", controller::get_balance);
//!     t.group(roles(&[Role::Admin, Role::Manager]), |t| {
//!         t.get("/api/leave/all", controller::list_requests);
//!     });
//! });
//! ```

pub mod auth;
pub mod role;

use hrdesk_auth::Role;
use hrdesk_router::{BoxedMiddleware, boxed};

use crate::state::AppState;

pub use auth::{AuthUser, Authenticate};
pub use role::RequireRoles;

/// Chain for routes that only need a valid token.
pub fn authenticated() -> Vec<BoxedMiddleware<AppState>> {
    vec![boxed(Authenticate)]
}

/// Chain that adds a role requirement. Use inside an [`authenticated`] group.
pub fn roles(allowed: &[Role]) -> Vec<BoxedMiddleware<AppState>> {
    vec![boxed(RequireRoles::new(allowed))]
}
