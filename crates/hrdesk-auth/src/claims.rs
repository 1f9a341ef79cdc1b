//! JWT claim structure for access tokens.

use hrdesk_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::Role;

/// Verified payload of a bearer token.
///
/// # Fields
///
/// - `sub`: user ID (subject)
/// - `email`: user's email address
/// - `role`: the user's single role
/// - `iat` / `exp`: validity window as Unix timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
