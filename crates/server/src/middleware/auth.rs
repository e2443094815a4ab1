//! Authorization pass-through
//!
//! The gateway does not verify credentials. It only requires that a
//! non-empty `Authorization` header is present and forwards it verbatim to
//! the EMR service, which makes the actual decision.

use axum::http::{HeaderMap, HeaderValue, header};
use gateway_core::GatewayError;

/// Extract the caller's `Authorization` header for forwarding upstream
pub fn forwarded_authorization(headers: &HeaderMap) -> Result<HeaderValue, GatewayError> {
    headers
        .get(header::AUTHORIZATION)
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or(GatewayError::MissingAuthorization)
}
