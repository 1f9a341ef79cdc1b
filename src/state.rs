use hrdesk_config::{CorsConfig, JwtConfig, ServerConfig};
use hrdesk_db::{PgPool, init_db_pool};

use crate::modules::chat::hub::ChatHub;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
    pub chat: ChatHub,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        server_config: ServerConfig,
    ) -> Self {
        Self {
            db,
            jwt_config,
            cors_config,
            server_config,
            chat: ChatHub::default(),
        }
    }
}

pub async fn init_app_state() -> Result<AppState, sqlx::Error> {
    Ok(AppState::new(
        init_db_pool().await?,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        ServerConfig::from_env(),
    ))
}
