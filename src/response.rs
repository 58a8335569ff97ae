//! Helpers for building the JSON response envelope shared by all endpoints.
//!
//! Successful responses have the shape `{"message": ..., "data": ...}` where
//! `data` is omitted when there is nothing to return. Failures have the shape
//! `{"error": {"status": ..., "message": ..., "errors": [...]}}` where
//! `errors` carries per-field validation messages when applicable.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A validation failure for a single request field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// The name of the request field that failed validation.
    pub field: String,
    /// A human readable description of the problem.
    pub message: String,
}

impl FieldError {
    /// Create a field error for `field` with `message`.
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
        }
    }
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    status: u16,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct MessageEnvelope<'a, T: Serialize> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

/// Render an error response with the given `status` and `message`.
///
/// `errors` should be set for validation failures so the client can surface
/// per-field messages.
pub fn error_response(
    status: StatusCode,
    message: &str,
    errors: Option<&[FieldError]>,
) -> Response {
    (
        status,
        Json(ErrorEnvelope {
            error: ErrorDetail {
                status: status.as_u16(),
                message,
                errors,
            },
        }),
    )
        .into_response()
}

/// Render a success response containing only a message.
pub fn message_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(MessageEnvelope::<()> {
            message,
            data: None,
        }),
    )
        .into_response()
}

/// Render a success response with a message and a data payload.
pub fn data_response<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    (
        status,
        Json(MessageEnvelope {
            message,
            data: Some(data),
        }),
    )
        .into_response()
}
