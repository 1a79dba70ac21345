//! Error bodies of the user management API (RFC 9457 `application/problem+json`).
//!
//! Every problem carries a machine-readable `code`; `type` is derived from it.
//! Field failures point into the request body with snake_case JSON pointers,
//! so a `Surname` validation error is reported at `/surname`.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

const ERROR_TYPE_BASE: &str = "https://errors.example.com/";

pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "Problem", description = "Error response of the user management API")]
pub struct Problem {
    /// `https://errors.example.com/{code}`
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    /// Request path.
    pub instance: String,
    /// e.g. `USERS_NOT_FOUND`, `INVALID_ARGUMENT`
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "ValidationError")]
pub struct ValidationError {
    pub detail: String,
    /// JSON Pointer into the request body (e.g., "/email").
    pub pointer: String,
}

/// `UserId` -> `/user_id`
pub fn json_pointer(field: &str) -> String {
    let mut out = String::from("/");
    for (i, ch) in field.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

impl Problem {
    /// Problem for `instance`, tagged with the current tracing span when there is one.
    pub fn new(
        status: StatusCode,
        code: &str,
        title: &str,
        detail: impl Into<String>,
        instance: &str,
    ) -> Self {
        Self {
            type_url: format!("{ERROR_TYPE_BASE}{code}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: instance.to_string(),
            code: code.to_string(),
            trace_id: tracing::Span::current()
                .id()
                .map(|id| id.into_u64().to_string()),
            errors: None,
        }
    }

    /// 400 for malformed input that never reached field validation
    /// (unparsable path segments, query strings or bodies, bad paging).
    pub fn invalid_argument(detail: impl Into<String>, instance: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            INVALID_ARGUMENT,
            "Invalid argument",
            detail,
            instance,
        )
    }

    /// Attach a failure for one input field, named as the domain names it.
    pub fn with_field_error(mut self, field: &str, detail: impl Into<String>) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(ValidationError {
            detail: detail.into(),
            pointer: json_pointer(field),
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut resp = axum::Json(self.0).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}
