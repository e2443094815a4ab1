use serde_json::Value as JsonValue;
use std::fmt;
use thiserror::Error;

/// Gateway error types
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Request body must contain a \"message\" field with HL7 v2 message")]
    MissingMessage,

    #[error("Authorization header is required")]
    MissingAuthorization,

    /// The upstream answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Upstream { status: u16, body: JsonValue },

    /// No usable upstream response (connect failure, timeout, bad base URL).
    #[error("{0}")]
    Transport(String),
}

impl GatewayError {
    pub fn transport(err: impl fmt::Display) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// Which upstream operation produced an error. Selects the `error` label
/// reported to callers when the upstream rejects a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    Conversion,
    FhirServer,
}

impl UpstreamKind {
    pub fn label(self) -> &'static str {
        match self {
            UpstreamKind::Conversion => "EMR Service Error",
            UpstreamKind::FhirServer => "FHIR Server Error",
        }
    }

    /// Short name used in log fields and metric labels
    pub fn operation(self) -> &'static str {
        match self {
            UpstreamKind::Conversion => "convert",
            UpstreamKind::FhirServer => "fhir",
        }
    }
}

impl fmt::Display for UpstreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())
    }
}
