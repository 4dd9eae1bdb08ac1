use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use hotcoffee_core::DomainError;
use hotcoffee_infra::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    let code = err.code();
    match err {
        ServiceError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, code, msg),
        ServiceError::AlreadyExists(msg) => json_error(StatusCode::CONFLICT, code, msg),
        ServiceError::Unavailable(msg) => json_error(StatusCode::CONFLICT, code, msg),
        ServiceError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, code, msg),
        ServiceError::Storage(e) => {
            error!(error = %e, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, code, e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse an id from the request path into its canonical form.
pub fn parse_id<I>(raw: &str) -> Result<I, axum::response::Response>
where
    I: std::str::FromStr<Err = DomainError>,
{
    raw.parse::<I>()
        .map_err(|e| service_error_to_response(ServiceError::from(e)))
}
