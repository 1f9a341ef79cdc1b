use hrdesk_auth::create_access_token;
use hrdesk_config::JwtConfig;
use hrdesk_core::{AppError, verify_password};
use sqlx::PgPool;
use tracing::instrument;

use super::model::{LoginRequest, LoginResponse, LoginUser};
use crate::metrics::{track_user_login_failure, track_user_login_success};
use crate::modules::users::service::UserService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = UserService::find_active_by_email(db, &dto.email).await? else {
            track_user_login_failure("unknown_user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &user.password)? {
            track_user_login_failure("bad_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let role = user.role()?;
        let token = create_access_token(user.id, &user.email, role, jwt_config)?;
        track_user_login_success(role.as_str());
        tracing::info!(user_id = %user.id, role = %role, "User logged in");

        Ok(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            token,
            role: role.to_string(),
            user: LoginUser {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
                role: role.to_string(),
                avatar_url: user.avatar_url,
            },
        })
    }
}
