use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    response::Response,
};
use hrdesk_core::AppError;
use hrdesk_router::{
    HandlerResult, Method, Reply, RequestContext, RouteError, RouteTable, boxed, normalize_path,
};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Counters {
    handler: Arc<AtomicUsize>,
    first: Arc<AtomicUsize>,
    second: Arc<AtomicUsize>,
}

async fn echo(ctx: RequestContext, _: Counters) -> HandlerResult {
    let params: Vec<Value> = ctx
        .params
        .iter()
        .map(|(name, value)| json!([name, value]))
        .collect();
    Reply::json(&json!({
        "method": ctx.method.as_str(),
        "path": ctx.path,
        "params": params,
    }))
}

async fn counted(_: RequestContext, state: Counters) -> HandlerResult {
    state.handler.fetch_add(1, Ordering::SeqCst);
    Ok(Reply::text("ok"))
}

fn request(method: &str, uri: &str) -> Request {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn static_route_invokes_handler_exactly_once() {
    let state = Counters::default();
    let mut table = RouteTable::new();
    table.get("/api/test", counted).post("/api/test", echo);
    let dispatcher = table.build().unwrap();

    let response = dispatcher
        .dispatch(request("GET", "/api/test"), state.clone())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.handler.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn users_by_id_end_to_end() {
    let mut table = RouteTable::new();
    table.get("/api/users/:id", echo);
    let dispatcher = table.build().unwrap();

    let plain = dispatcher
        .dispatch(request("GET", "/api/users/42"), Counters::default())
        .await;
    assert_eq!(plain.status(), StatusCode::OK);
    let plain = json_body(plain).await;
    assert_eq!(plain["params"], json!([["id", "42"]]));

    let trailing = dispatcher
        .dispatch(request("GET", "/api/users/42/"), Counters::default())
        .await;
    assert_eq!(json_body(trailing).await, plain);

    let missing = dispatcher
        .dispatch(request("GET", "/api/users"), Counters::default())
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = json_body(missing).await;
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["status"], 404);
    assert_eq!(body["requested_uri"], "/api/users");
}

#[tokio::test]
async fn duplicate_slashes_do_not_change_the_route() {
    let mut table = RouteTable::new();
    table.get("/api/pr/stats/monthly/:year/:month", echo);
    let dispatcher = table.build().unwrap();

    for uri in [
        "/api/pr/stats/monthly/2024/5",
        "//api/pr//stats/monthly/2024/5/",
        "/api/pr/stats/monthly/2024/5?x=1",
    ] {
        let response = dispatcher.dispatch(request("GET", uri), Counters::default()).await;
        let body = json_body(response).await;
        assert_eq!(body["params"], json!([["year", "2024"], ["month", "5"]]), "{uri}");
        assert_eq!(body["path"], normalize_path(uri));
    }
}

#[tokio::test]
async fn rejecting_middleware_stops_the_chain() {
    let state = Counters::default();
    let mut table = RouteTable::new();
    table.group(
        vec![
            boxed(|_: &mut RequestContext, s: &Counters| -> Result<(), AppError> {
                s.first.fetch_add(1, Ordering::SeqCst);
                Err(AppError::unauthorized("Unauthorized: Missing or invalid token"))
            }),
            boxed(|_: &mut RequestContext, s: &Counters| -> Result<(), AppError> {
                s.second.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        ],
        |t| {
            t.get("/api/leave/all", counted);
        },
    );
    let dispatcher = table.build().unwrap();

    let response = dispatcher
        .dispatch(request("GET", "/api/leave/all"), state.clone())
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(state.first.load(Ordering::SeqCst), 1);
    assert_eq!(state.second.load(Ordering::SeqCst), 0);
    assert_eq!(state.handler.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn method_override_dispatches_to_delete() {
    let mut table = RouteTable::new();
    table
        .post("/api/projects/:id", echo)
        .delete("/api/projects/:id", echo);
    let dispatcher = table.build().unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/projects/7")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("name=x&_method=DELETE"))
        .unwrap();
    let body = json_body(dispatcher.dispatch(req, Counters::default()).await).await;
    assert_eq!(body["method"], "DELETE");

    let req = Request::builder()
        .method("POST")
        .uri("/api/projects/7")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("_method=PATCH"))
        .unwrap();
    let body = json_body(dispatcher.dispatch(req, Counters::default()).await).await;
    assert_eq!(body["method"], "POST");
}

#[tokio::test]
async fn method_override_reads_multipart_forms() {
    let mut table = RouteTable::new();
    table
        .post("/api/projects/:id", echo)
        .put("/api/projects/:id", echo);
    let dispatcher = table.build().unwrap();

    let body = "--XyZ\r\n\
        Content-Disposition: form-data; name=\"name\"\r\n\r\n\
        Payroll revamp\r\n\
        --XyZ\r\n\
        Content-Disposition: form-data; name=\"_method\"\r\n\r\n\
        put\r\n\
        --XyZ--\r\n";
    let req = Request::builder()
        .method("POST")
        .uri("/api/projects/7")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XyZ")
        .body(Body::from(body))
        .unwrap();
    let body = json_body(dispatcher.dispatch(req, Counters::default()).await).await;
    assert_eq!(body["method"], "PUT");
    assert_eq!(body["params"], json!([["id", "7"]]));
}

#[tokio::test]
async fn static_route_beats_earlier_dynamic_route() {
    let mut table = RouteTable::new();
    table.get("/api/users/:id", echo).get("/api/users/blocked", echo);
    let dispatcher = table.build().unwrap();

    let hit = dispatcher.match_route(Method::Get, "/api/users/blocked").unwrap();
    assert_eq!(hit.pattern(), "/api/users/blocked");
    assert!(hit.params.is_empty());

    let hit = dispatcher.match_route(Method::Get, "/api/users/9").unwrap();
    assert_eq!(hit.pattern(), "/api/users/:id");
}

#[tokio::test]
async fn first_registered_dynamic_route_wins() {
    let mut table = RouteTable::new();
    table
        .get("/api/tasks/:id/:field", echo)
        .get("/api/tasks/project/:project_id", echo);
    let dispatcher = table.build().unwrap();

    let hit = dispatcher.match_route(Method::Get, "/api/tasks/project/3").unwrap();
    assert_eq!(hit.pattern(), "/api/tasks/:id/:field");
}

#[tokio::test]
async fn options_short_circuits_with_empty_ok() {
    let state = Counters::default();
    let mut table = RouteTable::new();
    table.group(
        vec![boxed(|_: &mut RequestContext, _: &Counters| -> Result<(), AppError> {
            Err(AppError::unauthorized("nope"))
        })],
        |t| {
            t.get("/api/users", counted);
        },
    );
    let dispatcher = table.build().unwrap();

    let response = dispatcher
        .dispatch(request("OPTIONS", "/api/users"), state.clone())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
    assert_eq!(state.handler.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn base_path_is_stripped() {
    let mut table = RouteTable::new().with_base_path("/hr/");
    table.get("/api/test", echo);
    let dispatcher = table.build().unwrap();

    let ok = dispatcher
        .dispatch(request("GET", "/hr/api/test"), Counters::default())
        .await;
    assert_eq!(ok.status(), StatusCode::OK);

    let outside = dispatcher
        .dispatch(request("GET", "/api/test"), Counters::default())
        .await;
    assert_eq!(outside.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn custom_not_found_handler_runs() {
    let mut table = RouteTable::new();
    table.not_found(|ctx: RequestContext, _: Counters| async move {
        Ok::<_, AppError>(
            Reply::html(format!("<h1>{} not here</h1>", ctx.path))
                .with_status(StatusCode::NOT_FOUND),
        )
    });
    let dispatcher = table.build().unwrap();

    let response = dispatcher
        .dispatch(request("PATCH", "/dashboard"), Counters::default())
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>/dashboard not here</h1>");
}

#[tokio::test]
async fn oversized_body_is_413() {
    let mut table = RouteTable::new().with_max_body_bytes(8);
    table.post("/api/chat/send", echo);
    let dispatcher = table.build().unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/chat/send")
        .body(Body::from("this body is longer than eight bytes"))
        .unwrap();
    let response = dispatcher.dispatch(req, Counters::default()).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn oversized_body_to_unknown_path_is_404() {
    let mut table = RouteTable::new().with_max_body_bytes(8);
    table.post("/api/chat/send", echo);
    let dispatcher = table.build().unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/nowhere")
        .body(Body::from("this body is longer than eight bytes"))
        .unwrap();
    let response = dispatcher.dispatch(req, Counters::default()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["requested_uri"], "/api/nowhere");
}

#[test]
fn conflicting_registration_fails_build() {
    let mut table = RouteTable::<Counters>::new();
    table.get("/api/users/blocked", echo).get("/api/users/blocked/", echo);
    assert!(matches!(table.build(), Err(RouteError::Conflict { .. })));
}
