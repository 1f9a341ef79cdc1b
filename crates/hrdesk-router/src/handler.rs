//! The handler contract.
//!
//! Handlers receive the [`RequestContext`] and the application state and
//! return a [`Reply`]. They never touch the response; the dispatcher turns the
//! reply (or the error) into one.

use std::future::Future;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use hrdesk_core::AppError;
use serde::Serialize;
use serde_json::Value;

use crate::context::RequestContext;

pub type HandlerResult = Result<Reply, AppError>;

pub trait Handler<S>: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext, state: S) -> BoxFuture<'static, HandlerResult>;
}

impl<S, F, Fut> Handler<S> for F
where
    F: Fn(RequestContext, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: RequestContext, state: S) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(ctx, state))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    Json(Value),
    Html(String),
    Text(String),
    Empty,
}

/// Structured result of a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: ReplyBody,
}

impl Reply {
    /// 200 with `value` serialized as JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, AppError> {
        let body = serde_json::to_value(value).map_err(AppError::internal)?;
        Ok(Self {
            status: StatusCode::OK,
            body: ReplyBody::Json(body),
        })
    }

    /// 201 with `value` serialized as JSON.
    pub fn created<T: Serialize>(value: &T) -> Result<Self, AppError> {
        Ok(Self::json(value)?.with_status(StatusCode::CREATED))
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: ReplyBody::Html(body.into()),
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: ReplyBody::Text(body.into()),
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            body: ReplyBody::Empty,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.body {
            ReplyBody::Json(value) => (self.status, Json(value)).into_response(),
            ReplyBody::Html(body) => (self.status, Html(body)).into_response(),
            ReplyBody::Text(body) => (
                self.status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                )],
                body,
            )
                .into_response(),
            ReplyBody::Empty => self.status.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_reply_defaults_to_ok() {
        let reply = Reply::json(&json!({"success": true})).unwrap();
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, ReplyBody::Json(json!({"success": true})));
    }

    #[test]
    fn test_created_sets_status() {
        let reply = Reply::created(&json!({"id": 1})).unwrap();
        assert_eq!(reply.status, StatusCode::CREATED);
    }

    #[test]
    fn test_content_types() {
        let html = Reply::html("<h1>hi</h1>").into_response();
        assert!(
            html.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let json = Reply::json(&json!([])).unwrap().into_response();
        assert_eq!(json.headers()[header::CONTENT_TYPE], "application/json");

        let text = Reply::text("ok").into_response();
        assert!(
            text.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );
    }
}
