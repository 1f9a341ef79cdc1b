use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use hrdesk_auth::{Claims, Role, verify_token};
use hrdesk_core::AppError;
use hrdesk_router::{Middleware, RequestContext};
use uuid::Uuid;

use crate::state::AppState;

pub const MISSING_TOKEN: &str = "Unauthorized: Missing or invalid token";

/// Verifies the bearer token and stores its [`Claims`] on the request.
#[derive(Debug, Clone, Copy)]
pub struct Authenticate;

impl Middleware<AppState> for Authenticate {
    fn handle(&self, ctx: &mut RequestContext, state: &AppState) -> Result<(), AppError> {
        let bearer = ctx
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| AppError::unauthorized(MISSING_TOKEN))?;

        let claims = verify_token(bearer.token(), &state.jwt_config)?;
        tracing::debug!(user_id = %claims.sub, role = %claims.role, "Token verified");

        ctx.extensions.insert(claims);
        Ok(())
    }
}

/// The authenticated caller, as seen by handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn from_context(ctx: &RequestContext) -> Result<Self, AppError> {
        ctx.extension::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized(MISSING_TOKEN))
    }

    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.0.user_id()
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}
