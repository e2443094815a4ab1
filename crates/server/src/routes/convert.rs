//! HL7 v2 to FHIR conversion handler

use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, header},
    response::IntoResponse,
};
use gateway_core::ConversionRequest;
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::middleware::forwarded_authorization;
use crate::upstream::EmrClient;

/// POST /hl7-to-fhir - Relay an HL7 v2 message to the EMR converter
///
/// Body: `{"message": "MSH|...", "resourceType": "Patient"}`. The message is
/// checked before the `Authorization` header, and the upstream status and
/// body are returned as-is.
pub async fn convert(
    State(client): State<EmrClient>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body.map_err(|rejection| {
        AppError::Unhandled(format!("Unreadable request body: {}", rejection.body_text()))
    })?;
    let body = json_body(&headers, &body)?;
    let request = ConversionRequest::from_body(body.as_ref()).map_err(AppError::conversion)?;
    let authorization = forwarded_authorization(&headers).map_err(AppError::conversion)?;

    client
        .convert(&request, &authorization)
        .await
        .map_err(AppError::conversion)
}

/// Parse a JSON request body. Bodies that are empty or not declared as JSON
/// count as absent; a declared JSON body that fails to parse is unhandled.
fn json_body(headers: &HeaderMap, body: &Bytes) -> Result<Option<JsonValue>, AppError> {
    if body.is_empty() || !is_json(headers) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::Unhandled(format!("Malformed JSON body: {}", e)))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn json_content_types() {
        assert!(is_json(&with_content_type("application/json")));
        assert!(is_json(&with_content_type("application/json; charset=utf-8")));
        assert!(is_json(&with_content_type("application/fhir+json")));
        assert!(!is_json(&with_content_type("text/plain")));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[test]
    fn non_json_body_counts_as_absent() {
        let body = Bytes::from_static(b"MSH|^~\\&|");
        let parsed = json_body(&with_content_type("text/plain"), &body).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn malformed_json_is_unhandled() {
        let body = Bytes::from_static(b"{\"message\": ");
        assert!(matches!(
            json_body(&with_content_type("application/json"), &body),
            Err(AppError::Unhandled(_))
        ));
    }
}
