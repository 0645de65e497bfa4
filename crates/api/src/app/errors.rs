use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use showcase_core::{DomainError, ProductId};
use showcase_infra::{CatalogError, CurationError, VisibilityError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "Product not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        CatalogError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "Product not found"),
        CatalogError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        CatalogError::StoreUnavailable(msg) => store_unavailable(msg),
    }
}

pub fn curation_error_to_response(err: CurationError) -> axum::response::Response {
    match err {
        CurationError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "Product not found"),
        CurationError::StoreUnavailable(msg) => store_unavailable(msg),
    }
}

/// `LimitReached` carries `isLimitReached` so clients can special-case it.
pub fn visibility_error_to_response(err: VisibilityError) -> axum::response::Response {
    let message = err.user_message();
    match err {
        VisibilityError::LimitReached { current, limit } => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "success": false,
                "isLimitReached": true,
                "message": message,
                "current": current,
                "limit": limit,
            })),
        )
            .into_response(),
        VisibilityError::InvalidFlag(_) => json_error(StatusCode::BAD_REQUEST, "invalid_flag", message),
        VisibilityError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", message),
        VisibilityError::StoreUnavailable(msg) => store_unavailable(msg),
    }
}

fn store_unavailable(detail: String) -> axum::response::Response {
    tracing::warn!(detail = %detail, "store unavailable");
    json_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "store_unavailable",
        "Temporarily unavailable, please try again",
    )
}

/// Unwrap a JSON body, answering malformed input with the usual error envelope.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    body.map(|Json(value)| value)
        .map_err(|rejection| json_error(rejection.status(), "invalid_body", rejection.body_text()))
}

pub fn parse_product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"))
}
