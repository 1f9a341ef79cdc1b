//! Request dispatch.
//!
//! `Received -> Normalized -> Matched -> Authorized -> Handled`, with
//! `NotFound` and `Rejected` as the other terminal states.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    body::{Body, Bytes, to_bytes},
    extract::{FromRequest, Multipart, Request},
    http::{self, HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use hrdesk_core::AppError;
use serde_json::json;

use crate::context::RequestContext;
use crate::handler::Handler;
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, run_chain};
use crate::path::{Params, PathPattern, normalize_path, strip_base_path};
use crate::table::GroupId;

const OVERRIDE_FIELD: &str = "_method";

pub(crate) struct CompiledRoute<S> {
    pub(crate) method: Method,
    pub(crate) pattern: PathPattern,
    pub(crate) group: Option<GroupId>,
    pub(crate) handler: Arc<dyn Handler<S>>,
    pub(crate) middlewares: Arc<[BoxedMiddleware<S>]>,
}

#[derive(Default)]
pub(crate) struct MethodRoutes {
    pub(crate) statics: HashMap<String, usize>,
    pub(crate) dynamics: Vec<usize>,
}

/// A successful match: the route plus its captured parameters.
pub struct MatchResult<'a, S> {
    route: &'a CompiledRoute<S>,
    pub params: Params,
}

impl<S> MatchResult<'_, S> {
    pub fn method(&self) -> Method {
        self.route.method
    }

    /// Normalized pattern of the matched route.
    pub fn pattern(&self) -> &str {
        self.route.pattern.as_str()
    }

    pub fn group(&self) -> Option<GroupId> {
        self.route.group
    }
}

struct Inner<S> {
    routes: Vec<CompiledRoute<S>>,
    by_method: HashMap<Method, MethodRoutes>,
    not_found: Option<Arc<dyn Handler<S>>>,
    base_path: Option<String>,
    max_body_bytes: usize,
}

/// Frozen routing table. Cheap to clone and shared by every request.
pub struct Dispatcher<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Preflight,
    PayloadTooLarge,
    Handled,
    Failed,
    Rejected,
    NotFound,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Outcome::Preflight => "preflight",
            Outcome::PayloadTooLarge => "payload_too_large",
            Outcome::Handled => "handled",
            Outcome::Failed => "failed",
            Outcome::Rejected => "rejected",
            Outcome::NotFound => "not_found",
        }
    }
}

fn record(outcome: Outcome, method: &str, path: &str) {
    metrics::counter!("hrdesk_dispatch_total", "outcome" => outcome.as_str()).increment(1);
    match outcome {
        Outcome::Failed => tracing::warn!(method, path, outcome = outcome.as_str(), "Dispatch failed"),
        Outcome::Rejected => tracing::info!(method, path, outcome = outcome.as_str(), "Request rejected"),
        _ => tracing::debug!(method, path, outcome = outcome.as_str(), "Dispatched"),
    }
}

impl<S> Dispatcher<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(
        routes: Vec<CompiledRoute<S>>,
        by_method: HashMap<Method, MethodRoutes>,
        not_found: Option<Arc<dyn Handler<S>>>,
        base_path: Option<String>,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                routes,
                by_method,
                not_found,
                base_path,
                max_body_bytes,
            }),
        }
    }

    /// Canonical path used for matching, or `None` if `raw` lies outside the
    /// configured base path.
    pub fn canonical_path(&self, raw: &str) -> Option<String> {
        let path = normalize_path(raw);
        match &self.inner.base_path {
            Some(base) => strip_base_path(&path, base),
            None => Some(path),
        }
    }

    /// Finds the route for `method` and a canonical `path`.
    ///
    /// Static routes are looked up exactly first, so they win over any
    /// dynamic pattern. Dynamic routes are then tried in registration order.
    pub fn match_route(&self, method: Method, path: &str) -> Option<MatchResult<'_, S>> {
        let table = self.inner.by_method.get(&method)?;

        if let Some(&index) = table.statics.get(path) {
            return Some(MatchResult {
                route: &self.inner.routes[index],
                params: Params::default(),
            });
        }

        table.dynamics.iter().find_map(|&index| {
            let route = &self.inner.routes[index];
            route
                .pattern
                .matches(path)
                .map(|params| MatchResult { route, params })
        })
    }

    /// Whether any method has a route for the canonical `path`.
    fn serves_path(&self, path: &str) -> bool {
        self.inner.by_method.values().any(|table| {
            table.statics.contains_key(path)
                || table
                    .dynamics
                    .iter()
                    .any(|&index| self.inner.routes[index].pattern.matches(path).is_some())
        })
    }

    pub async fn dispatch(&self, req: Request, state: S) -> Response {
        let (parts, body) = req.into_parts();
        let raw_method = parts.method.as_str().to_owned();

        if parts.method == http::Method::OPTIONS {
            record(Outcome::Preflight, &raw_method, parts.uri.path());
            return StatusCode::OK.into_response();
        }

        let path = self.canonical_path(parts.uri.path());
        let display_path = path
            .clone()
            .unwrap_or_else(|| normalize_path(parts.uri.path()));

        // The body is only read for paths some route serves, so an unknown
        // path answers 404 whatever its body size.
        let routable = path.as_deref().is_some_and(|path| self.serves_path(path));
        let body = if routable {
            match to_bytes(body, self.inner.max_body_bytes).await {
                Ok(bytes) => bytes,
                Err(_) => {
                    record(Outcome::PayloadTooLarge, &raw_method, parts.uri.path());
                    return AppError::new(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        anyhow::anyhow!("Request body too large"),
                    )
                    .into_response();
                }
            }
        } else {
            Bytes::new()
        };

        let method = match Method::from_http(&parts.method) {
            Some(method) => Some(effective_method(method, &parts.headers, &body).await),
            None => None,
        };

        // Unroutable verbs still get a context so the not-found handler can run.
        let mut ctx = RequestContext {
            method: method.unwrap_or(Method::Get),
            uri: parts.uri,
            path: display_path,
            headers: parts.headers,
            body,
            params: Params::default(),
            extensions: parts.extensions,
        };

        let matched = match (method, path.as_deref()) {
            (Some(method), Some(path)) => self.match_route(method, path),
            _ => None,
        };

        let Some(MatchResult { route, params }) = matched else {
            return self.not_found(ctx, state, &raw_method).await;
        };

        ctx.params = params;
        let handler = Arc::clone(&route.handler);
        let middlewares = Arc::clone(&route.middlewares);
        let method_label = ctx.method.as_str();
        let path_label = ctx.path.clone();

        if let Err(err) = run_chain(&middlewares, &mut ctx, &state) {
            record(Outcome::Rejected, method_label, &path_label);
            return err.into_response();
        }

        match handler.call(ctx, state).await {
            Ok(reply) => {
                record(Outcome::Handled, method_label, &path_label);
                reply.into_response()
            }
            Err(err) => {
                record(Outcome::Failed, method_label, &path_label);
                err.into_response()
            }
        }
    }

    async fn not_found(&self, ctx: RequestContext, state: S, method: &str) -> Response {
        record(Outcome::NotFound, method, &ctx.path);

        let Some(handler) = &self.inner.not_found else {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Route not found",
                    "status": 404,
                    "requested_uri": ctx.uri.to_string(),
                })),
            )
                .into_response();
        };

        match handler.call(ctx, state).await {
            Ok(reply) => reply.into_response(),
            Err(err) => err.into_response(),
        }
    }
}

/// Applies a `_method` form field on POST requests.
///
/// The field is read from urlencoded and multipart form bodies. Only the four
/// routable verbs are honoured; anything else keeps the original method.
async fn effective_method(method: Method, headers: &HeaderMap, body: &Bytes) -> Method {
    if method != Method::Post {
        return method;
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let requested = if content_type.starts_with("application/x-www-form-urlencoded") {
        url::form_urlencoded::parse(body)
            .find(|(key, _)| key == OVERRIDE_FIELD)
            .map(|(_, value)| value.into_owned())
    } else if content_type.starts_with("multipart/form-data") {
        multipart_override(headers, body).await
    } else {
        None
    };

    requested
        .and_then(|value| value.parse::<Method>().ok())
        .unwrap_or(method)
}

async fn multipart_override(headers: &HeaderMap, body: &Bytes) -> Option<String> {
    let mut request = Request::new(Body::from(body.clone()));
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        request
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type.clone());
    }

    let mut multipart = Multipart::from_request(request, &()).await.ok()?;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some(OVERRIDE_FIELD) {
            return field.text().await.ok();
        }
    }
    None
}
