//! Error response shape and the shared error normalizer

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{GatewayError, UpstreamKind};

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Message returned when the upstream could not be reached. The underlying
/// error text is only logged.
pub const UPSTREAM_FAILURE_MESSAGE: &str =
    "An unexpected error occurred while processing the request";

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2025-09-06T15:00:00.000Z`
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// JSON error body returned to callers
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<JsonValue>,

    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            status: None,
            error_details: None,
            timestamp: timestamp(),
        }
    }

    /// Body for requests that match no route
    pub fn not_found() -> Self {
        Self::new("Not Found", "The requested endpoint does not exist")
    }

    /// Body for failures that escaped every handler
    pub fn unexpected() -> Self {
        Self::new(INTERNAL_SERVER_ERROR, "An unexpected error occurred")
    }
}

/// Map a gateway error to the status code and body sent to the caller.
///
/// Upstream rejections keep the upstream status and, when the upstream body
/// carries them, its `message` and `error` fields. Transport failures always
/// become a generic 500.
pub fn normalize(error: &GatewayError, kind: UpstreamKind) -> (u16, ErrorResponse) {
    match error {
        GatewayError::MissingMessage => (400, ErrorResponse::new("Bad Request", &error.to_string())),
        GatewayError::MissingAuthorization => {
            (401, ErrorResponse::new("Unauthorized", &error.to_string()))
        }
        GatewayError::Upstream { status, body } => {
            let message = body
                .get("message")
                .and_then(JsonValue::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());

            let response = ErrorResponse {
                error: kind.label().to_string(),
                message,
                status: Some(*status),
                error_details: body.get("error").cloned(),
                timestamp: timestamp(),
            };
            (*status, response)
        }
        GatewayError::Transport(_) => (
            500,
            ErrorResponse::new(INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE_MESSAGE),
        ),
    }
}
