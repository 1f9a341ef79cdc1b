//! Role-based authorization.

use hrdesk_auth::{Claims, Role, check_any_role};
use hrdesk_core::AppError;
use hrdesk_router::{Middleware, RequestContext};

use super::auth::MISSING_TOKEN;

/// Lets the request through only if the verified role is one of `allowed`.
///
/// Must run after [`Authenticate`](super::Authenticate); without claims the
/// request is treated as unauthenticated.
#[derive(Debug, Clone)]
pub struct RequireRoles {
    allowed: Vec<Role>,
}

impl RequireRoles {
    pub fn new(allowed: &[Role]) -> Self {
        Self {
            allowed: allowed.to_vec(),
        }
    }

    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }
}

impl<S: Send + Sync + 'static> Middleware<S> for RequireRoles {
    fn handle(&self, ctx: &mut RequestContext, _state: &S) -> Result<(), AppError> {
        let claims = ctx
            .extension::<Claims>()
            .ok_or_else(|| AppError::unauthorized(MISSING_TOKEN))?;

        check_any_role(claims, &self.allowed).inspect_err(|_| {
            tracing::warn!(
                user_id = %claims.sub,
                role = %claims.role,
                path = %ctx.path,
                "Role check failed"
            );
        })
    }
}
