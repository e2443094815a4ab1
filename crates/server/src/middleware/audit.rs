//! Audit logging for relayed requests

use axum::{body::Body, extract::Request, middleware::Next, response::Response};

use super::request_id::RequestId;

/// Paths whose requests are relayed to the EMR service
fn is_relayed(path: &str) -> bool {
    path == "/hl7-to-fhir" || path.starts_with("/fhir/")
}

/// Middleware to log every request forwarded upstream for audit purposes.
/// The `Authorization` value itself is never logged.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().path().to_string();
    let has_authorization = request
        .headers()
        .contains_key(axum::http::header::AUTHORIZATION);
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(request).await;

    if is_relayed(&uri) {
        let status = response.status().as_u16();

        tracing::info!(
            target: "audit",
            request_id = %request_id,
            method = %method,
            path = %uri,
            authorization = has_authorization,
            status = %status,
            "Relayed request"
        );
    }

    response
}
