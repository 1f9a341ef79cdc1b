use anyhow::Context;
use dotenvy::dotenv;
use hrdesk::cli::run_migrations;
use hrdesk::logging::init_tracing;
use hrdesk::metrics::init_metrics;
use hrdesk::modules::chat::ws::chat_router;
use hrdesk::router::init_router;
use hrdesk::state::init_app_state;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();
    init_metrics();

    let state = init_app_state()
        .await
        .context("Failed to connect to database")?;

    if state.server_config.run_migrations {
        run_migrations(&state.db)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Database migrations applied");
    }

    let http_addr = state.server_config.http_addr();
    let chat_addr = state.server_config.chat_addr();

    let app = init_router(state.clone()).context("Invalid route table")?;
    let chat = chat_router(state);

    let http_listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    let chat_listener = TcpListener::bind(&chat_addr)
        .await
        .with_context(|| format!("Failed to bind {}", chat_addr))?;

    tracing::info!(addr = %http_addr, "HTTP server listening");
    tracing::info!(addr = %chat_addr, "Chat server listening");

    tokio::try_join!(
        async { axum::serve(http_listener, app).await.context("HTTP server failed") },
        async { axum::serve(chat_listener, chat).await.context("Chat server failed") },
    )?;

    Ok(())
}
