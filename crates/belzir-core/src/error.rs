use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error body shared by every service: a stable machine-readable
/// `kind` plus a human `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody<'a> {
    pub kind: &'a str,
    pub message: String,
}

/// Build an error response with the shared body shape.
///
/// Callers log 5xx causes themselves before calling this; `message` is what the
/// client sees and must not carry internal details.
pub fn error_response(status: StatusCode, kind: &str, message: String) -> Response {
    (status, axum::Json(ErrorBody { kind, message })).into_response()
}
