use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::GatewayError;
use crate::outcome::timestamp;

/// Resource type requested from the converter when the caller names none
pub const DEFAULT_RESOURCE_TYPE: &str = "Patient";

/// Payload sent to the upstream `convert/hl7-to-fhir` endpoint
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub resource_type: String,
    pub message: String,
}

impl ConversionRequest {
    /// Build the upstream payload from an inbound JSON body.
    ///
    /// The body must be an object whose `message` is a non-empty string.
    /// A missing, empty or non-string `resourceType` falls back to
    /// [`DEFAULT_RESOURCE_TYPE`].
    pub fn from_body(body: Option<&JsonValue>) -> Result<Self, GatewayError> {
        let body = body.ok_or(GatewayError::MissingMessage)?;

        let message = body
            .get("message")
            .and_then(JsonValue::as_str)
            .filter(|m| !m.is_empty())
            .ok_or(GatewayError::MissingMessage)?;

        let resource_type = body
            .get("resourceType")
            .and_then(JsonValue::as_str)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_RESOURCE_TYPE);

        Ok(Self {
            resource_type: resource_type.to_string(),
            message: message.to_string(),
        })
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

impl HealthCheckResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            message: "Demo integration service is running".to_string(),
            timestamp: timestamp(),
        }
    }
}
