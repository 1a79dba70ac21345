use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;

use crate::api::problem::{Problem, ProblemResponse};
use crate::domain::error::{DomainError, ErrorKind};

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    let problem = match e {
        DomainError::UserNotFound { .. } => Problem::new(
            StatusCode::NOT_FOUND,
            "USERS_NOT_FOUND",
            "User not found",
            e.to_string(),
            instance,
        ),
        DomainError::LogNotFound { .. } => Problem::new(
            StatusCode::NOT_FOUND,
            "LOGS_NOT_FOUND",
            "Log not found",
            e.to_string(),
            instance,
        ),
        DomainError::EmailAlreadyExists { .. } => Problem::new(
            StatusCode::CONFLICT,
            "USERS_EMAIL_CONFLICT",
            "Email already exists",
            e.to_string(),
            instance,
        ),
        DomainError::Validation { .. } => Problem::new(
            StatusCode::BAD_REQUEST,
            "USERS_VALIDATION",
            "Validation error",
            e.to_string(),
            instance,
        ),
        DomainError::InvalidArgument { .. } => Problem::invalid_argument(e.to_string(), instance),
        DomainError::Store(_) => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Store error occurred");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_STORE",
                "Internal error",
                "An internal storage error occurred",
                instance,
            )
        }
    };

    // Field failures point at the offending body member; bad arguments do not.
    let problem = match (e.kind(), e.field()) {
        (ErrorKind::ValidationFailed, Some(field)) => problem.with_field_error(field, e.to_string()),
        _ => problem,
    };
    ProblemResponse(problem)
}

/// A missing or unreadable JSON body is an invalid argument, not a framework error page.
pub fn map_body_rejection(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    let e = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            DomainError::invalid_argument("body", "A JSON request body is required")
        }
        other => DomainError::invalid_argument("body", other.body_text()),
    };
    map_domain_error(&e, instance)
}

/// e.g. `/users/abc`
pub fn map_path_rejection(rejection: &PathRejection, instance: &str) -> ProblemResponse {
    map_domain_error(
        &DomainError::invalid_argument("path", rejection.body_text()),
        instance,
    )
}

/// e.g. `/logs?page=x`
pub fn map_query_rejection(rejection: &QueryRejection, instance: &str) -> ProblemResponse {
    map_domain_error(
        &DomainError::invalid_argument("query", rejection.body_text()),
        instance,
    )
}
