use axum::http::StatusCode;
use axum::response::Response;
use tracing::error;

use hotcoffee_infra::config::StorageConfig;
use hotcoffee_infra::services::{FileShopServices, ServiceError};
use hotcoffee_infra::store::StoreError;

use crate::app::errors;

/// Services shared by every handler.
pub type AppServices = FileShopServices;

/// Open the documents under the configured data directory and wire the services.
pub fn build_services(config: &StorageConfig) -> Result<AppServices, StoreError> {
    FileShopServices::open(config)
}

/// Run a service call on the blocking pool (services do synchronous file IO).
///
/// Service errors become JSON error responses; a panicked call becomes a 500.
pub async fn call<T, F>(services: &AppServices, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&AppServices) -> Result<T, ServiceError> + Send + 'static,
{
    let services = services.clone();
    match tokio::task::spawn_blocking(move || f(&services)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(errors::service_error_to_response(e)),
        Err(join_err) => {
            error!(error = %join_err, "service call panicked");
            Err(errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            ))
        }
    }
}
