use std::any::Any;

use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, middleware};
use hrdesk_config::{CorsConfig, ServerConfig};
use hrdesk_router::{Dispatcher, RouteError, RouteTable};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};

use crate::logging::logging_middleware;
use crate::modules::register_all;
use crate::state::AppState;

/// Route table with every module registered, not yet compiled.
pub fn route_table(config: &ServerConfig) -> RouteTable<AppState> {
    let mut table = RouteTable::new().with_max_body_bytes(config.max_body_bytes);
    if let Some(base_path) = &config.base_path {
        table = table.with_base_path(base_path.clone());
    }

    register_all(&mut table);
    table
}

/// Builds the route table for every module and compiles it.
pub fn build_routes(config: &ServerConfig) -> Result<Dispatcher<AppState>, RouteError> {
    route_table(config).build()
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(AnyOrigin)
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "message": "Internal server error",
        })),
    )
        .into_response()
}

/// The HTTP application: every request goes through the dispatcher.
pub fn init_router(state: AppState) -> Result<Router, RouteError> {
    let dispatcher = build_routes(&state.server_config)?;
    Ok(serve_dispatcher(state, dispatcher))
}

/// Mounts a compiled dispatcher behind panic capture, CORS and request
/// logging.
pub fn serve_dispatcher(state: AppState, dispatcher: Dispatcher<AppState>) -> Router {
    let cors = cors_layer(&state.cors_config);

    Router::new()
        .fallback(move |req: Request| {
            let dispatcher = dispatcher.clone();
            let state = state.clone();
            async move { dispatcher.dispatch(req, state).await }
        })
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}
