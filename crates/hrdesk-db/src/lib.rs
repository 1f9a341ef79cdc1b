//! # hrdesk DB
//!
//! PostgreSQL connection pool initialisation using SQLx.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//!
//! # Example
//!
//! ```ignore
//! use hrdesk_db::init_db_pool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = init_db_pool().await?;
//!     // Use pool for database operations
//! }
//! ```

use std::env;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

fn max_connections() -> u32 {
    env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS)
}

fn database_url() -> Result<String, sqlx::Error> {
    env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))
}

/// Connects a PostgreSQL pool using `DATABASE_URL`.
///
/// The returned pool is cheaply cloneable and is stored in the application
/// state; call this once at startup.
pub async fn init_db_pool() -> Result<PgPool, sqlx::Error> {
    let url = database_url()?;
    let max = max_connections();

    let pool = PgPoolOptions::new()
        .max_connections(max)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!(max_connections = max, "Database pool ready");
    Ok(pool)
}

/// Builds a pool that connects on first use.
///
/// Used by tests and tooling that need an `AppState` without a live server.
pub fn lazy_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections())
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy(url)
}
