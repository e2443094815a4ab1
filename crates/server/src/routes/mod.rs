pub mod convert;
pub mod fhir;
pub mod health;
pub mod metrics;

use std::any::Any;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use gateway_core::ErrorResponse;

use crate::upstream::EmrClient;

/// Build the relaying routes
pub fn gateway_routes() -> Router<EmrClient> {
    Router::new()
        .route("/hl7-to-fhir", post(convert::convert))
        .route("/fhir/{version}/{resource_type}", get(fhir::read))
        .route("/fhir/{version}/{resource_type}/{id}", get(fhir::read))
}

/// Fallback for any method/path outside the routing table
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found()))
}

/// Response for a handler that panicked
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(error = %detail, "Unhandled error");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::unexpected()),
    )
        .into_response()
}
