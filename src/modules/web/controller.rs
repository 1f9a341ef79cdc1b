use axum::http::StatusCode;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use serde_json::json;

use crate::state::AppState;

pub async fn home(_: RequestContext, _: AppState) -> HandlerResult {
    Ok(Reply::html("<h1>Welcome to hrdesk</h1>"))
}

pub async fn api_index(_: RequestContext, _: AppState) -> HandlerResult {
    Reply::json(&json!({
        "message": "Welcome to the API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn api_test(_: RequestContext, _: AppState) -> HandlerResult {
    Reply::json(&json!({
        "status": "success",
        "message": "API route works!",
    }))
}

pub async fn metrics(_: RequestContext, _: AppState) -> HandlerResult {
    Ok(Reply::text(crate::metrics::render()))
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// JSON for `/api` paths, an HTML page for everything else.
pub async fn not_found(ctx: RequestContext, _: AppState) -> HandlerResult {
    let reply = if is_api_path(&ctx.path) {
        Reply::json(&json!({
            "error": "Route not found",
            "status": 404,
            "requested_uri": ctx.uri.to_string(),
        }))?
    } else {
        Reply::html("<h1>404 Not Found</h1><p>The page you requested could not be found.</p>")
    };
    Ok(reply.with_status(StatusCode::NOT_FOUND))
}
