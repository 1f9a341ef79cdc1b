//! # hrdesk Auth
//!
//! Identity verification and authorization primitives.
//!
//! - [`claims`]: the verified token payload
//! - [`jwt`]: token issue and verification (HS256)
//! - [`roles`]: the closed set of roles and role checks
//!
//! Every token in the system decodes to the same [`Claims`] shape, so role
//! checks never need to search for where the role is stored.
//!
//! # Example
//!
//! ```ignore
//! use hrdesk_auth::{Role, check_any_role, create_access_token, verify_token};
//!
//! let token = create_access_token(user_id, "a@b.c", Role::Manager, &config)?;
//! let claims = verify_token(&token, &config)?;
//! check_any_role(&claims, &[Role::Admin, Role::Manager])?;
//! ```

pub mod claims;
pub mod jwt;
pub mod roles;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use roles::{Role, check_any_role, check_role};
