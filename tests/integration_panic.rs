mod common;

use axum::Router;
use axum::http::StatusCode;
use common::{get, send, test_state_with};
use hrdesk::router::{route_table, serve_dispatcher};
use hrdesk::state::AppState;
use hrdesk_config::ServerConfig;
use hrdesk_router::{HandlerResult, RequestContext};

async fn explode(_: RequestContext, _: AppState) -> HandlerResult {
    panic!("attempt to multiply with overflow")
}

fn app_with_panicking_route() -> Router {
    let state = test_state_with(ServerConfig::default());
    let mut table = route_table(&state.server_config);
    table.get("/api/explode", explode);
    serve_dispatcher(state, table.build().unwrap())
}

#[tokio::test]
async fn test_handler_panic_becomes_json_500() {
    let res = send(app_with_panicking_route(), get("/api/explode", None)).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.json(),
        serde_json::json!({"success": false, "message": "Internal server error"})
    );
}

#[tokio::test]
async fn test_app_keeps_serving_after_a_panic() {
    let app = app_with_panicking_route();

    let first = send(app.clone(), get("/api/explode", None)).await;
    assert_eq!(first.status, StatusCode::INTERNAL_SERVER_ERROR);

    let second = send(app, get("/api/test", None)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.json()["message"], "API route works!");
}
