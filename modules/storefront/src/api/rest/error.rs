use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{}", code))
        .with_code(code)
        .with_instance(instance);

    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_trace_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

pub fn stock_item_not_found(id: i32, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::NOT_FOUND,
        "STOREFRONT_NOT_FOUND",
        "Stock item not found",
        format!("Stock item with id {} was not found", id),
        instance,
    )
}

pub fn user_not_found(id: i32, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::NOT_FOUND,
        "STOREFRONT_NOT_FOUND",
        "User not found",
        format!("User with id {} was not found", id),
        instance,
    )
}

/// Malformed request body or query string.
pub fn bad_request(detail: impl Into<String>, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "STOREFRONT_VALIDATION",
        "Validation error",
        detail,
        instance,
    )
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::StockItemNotFound { id } => stock_item_not_found(*id, instance),
        DomainError::UserNotFound { id } => user_not_found(*id, instance),
        DomainError::Validation { .. } => bad_request(e.to_string(), instance),
        DomainError::InsufficientStock {
            id,
            available,
            requested,
        } => from_parts(
            StatusCode::CONFLICT,
            "STOREFRONT_INSUFFICIENT_STOCK",
            "Insufficient stock",
            format!(
                "Stock item {} has {} in stock; a change of {} would make it negative",
                id, available, requested
            ),
            instance,
        ),
        DomainError::EmailAlreadyExists { email } => from_parts(
            StatusCode::CONFLICT,
            "STOREFRONT_EMAIL_CONFLICT",
            "Email already exists",
            format!("Email '{}' is already in use", email),
            instance,
        ),
        DomainError::Persistence { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}
