//! Per-request state handed to middlewares and handlers.

use std::str::FromStr;

use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::Query,
    http::{Extensions, HeaderMap, Uri, header},
};
use hrdesk_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::method::Method;
use crate::path::{Params, normalize_path};

/// Everything the dispatcher knows about one request.
///
/// `method` is the effective method (after `_method` override) and `path` is
/// the canonical path with any base path removed. Middlewares attach values
/// such as verified claims through `extensions`.
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub params: Params,
    pub extensions: Extensions,
}

impl RequestContext {
    pub fn new(method: Method, uri: Uri) -> Self {
        let path = normalize_path(uri.path());
        Self {
            method,
            uri,
            path,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: Params::default(),
            extensions: Extensions::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Parses a path parameter, answering 400 when it is absent or malformed.
    pub fn param_as<T: FromStr>(&self, name: &str) -> Result<T, AppError> {
        let raw = self
            .param(name)
            .ok_or_else(|| AppError::bad_request(anyhow!("{} is required", name)))?;
        raw.parse()
            .map_err(|_| AppError::bad_request(anyhow!("Invalid {}: {}", name, raw)))
    }

    pub fn query<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        Query::<T>::try_from_uri(&self.uri)
            .map(|Query(value)| value)
            .map_err(|rejection| AppError::bad_request(anyhow!("{}", rejection.body_text())))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        if !self.has_json_content_type() {
            return Err(AppError::bad_request(anyhow!(
                "Missing 'Content-Type: application/json' header"
            )));
        }

        serde_json::from_slice(&self.body).map_err(|err| {
            let error_msg = err.to_string();

            if error_msg.contains("missing field") {
                let field = error_msg
                    .split("missing field `")
                    .nth(1)
                    .and_then(|s| s.split('`').next())
                    .unwrap_or("unknown");
                return AppError::bad_request(anyhow!("{} is required", field));
            }

            if error_msg.contains("invalid type") {
                return AppError::bad_request(anyhow!("Invalid field type in request"));
            }

            AppError::bad_request(anyhow!("Invalid request body"))
        })
    }

    /// Like [`json`](Self::json), then runs `validator` rules (422 on failure).
    pub fn validated_json<T: DeserializeOwned + Validate>(&self) -> Result<T, AppError> {
        let value: T = self.json()?;
        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow!("{}", format_errors(&errors))))?;
        Ok(value)
    }

    pub fn extension<T: Clone + Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    fn has_json_content_type(&self) -> bool {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                let mime = value.split(';').next().unwrap_or_default().trim();
                mime == "application/json" || mime.ends_with("+json")
            })
            .unwrap_or(false)
    }
}

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages.join(", ")
}

/// Walks nested structs and lists so errors behind `#[validate(nested)]`
/// keep their messages.
fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(list) => out.extend(list.iter().map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })),
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, out),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect_messages(inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct LoginBody {
        #[validate(email(message = "Invalid email"))]
        email: String,
        password: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Amounts {
        #[validate(range(min = 0, message = "amount must not be negative"))]
        amount: i64,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Wrapper {
        #[serde(flatten)]
        #[validate(nested)]
        amounts: Amounts,
    }

    #[derive(Debug, Deserialize)]
    struct Range {
        start_date: Option<String>,
        status: Option<String>,
    }

    fn json_ctx(body: &'static str) -> RequestContext {
        let mut ctx = RequestContext::new(Method::Post, Uri::from_static("/api/auth/login"));
        ctx.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        ctx.body = Bytes::from_static(body.as_bytes());
        ctx
    }

    #[test]
    fn test_json_missing_field_names_it() {
        let err = json_ctx(r#"{"email":"a@b.c"}"#).json::<LoginBody>().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "password is required");
    }

    #[test]
    fn test_json_requires_content_type() {
        let mut ctx = json_ctx(r#"{"email":"a@b.c","password":"x"}"#);
        ctx.headers.remove(header::CONTENT_TYPE);
        assert!(ctx.json::<LoginBody>().is_err());
    }

    #[test]
    fn test_validated_json_is_422() {
        let err = json_ctx(r#"{"email":"nope","password":"x"}"#)
            .validated_json::<LoginBody>()
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.public_message(), "Invalid email");
    }

    #[test]
    fn test_validated_json_reports_nested_messages() {
        let err = json_ctx(r#"{"amount":-1}"#)
            .validated_json::<Wrapper>()
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.public_message(), "amount must not be negative");
    }

    #[test]
    fn test_query_reads_uri() {
        let ctx = RequestContext::new(
            Method::Get,
            Uri::from_static("/api/attendance/history?start_date=2024-01-01&status=Late"),
        );
        let range: Range = ctx.query().unwrap();
        assert_eq!(range.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(range.status.as_deref(), Some("Late"));
        assert_eq!(ctx.path, "/api/attendance/history");
    }

    #[test]
    fn test_param_as_rejects_garbage() {
        let ctx = RequestContext::new(Method::Get, Uri::from_static("/api/pr/stats/yearly/x"));
        let err = ctx.param_as::<i32>("year").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
