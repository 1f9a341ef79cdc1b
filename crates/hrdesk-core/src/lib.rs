//! # hrdesk Core
//!
//! Foundational types shared by every hrdesk crate:
//!
//! - [`errors`]: the application error type and its JSON rendering
//! - [`password`]: bcrypt hashing and verification
//! - [`response`]: the `{success, message, data}` envelope used by handlers
//! - [`serde`]: custom deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use hrdesk_core::{AppError, Envelope, hash_password};
//!
//! let hash = hash_password("Admin@123")?;
//! let body = Envelope::with_message("User created successfully", user);
//! let missing = AppError::not_found(anyhow::anyhow!("User not found"));
//! ```

pub mod errors;
pub mod password;
pub mod response;
pub mod serde;

pub use errors::AppError;
pub use password::{hash_password, verify_password};
pub use response::Envelope;
