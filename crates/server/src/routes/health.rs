//! Health check endpoint

use axum::Json;
use gateway_core::HealthCheckResponse;

/// GET / - Report that the gateway is up. Consults no inputs and does not
/// contact the EMR service.
pub async fn check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}
