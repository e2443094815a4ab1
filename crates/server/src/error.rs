//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gateway_core::{ErrorResponse, GatewayError, UpstreamKind};

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// A precondition or upstream failure in one of the relaying handlers
    Gateway {
        kind: UpstreamKind,
        source: GatewayError,
    },
    /// Anything else that reached the top of a handler
    Unhandled(String),
}

impl AppError {
    pub fn conversion(source: GatewayError) -> Self {
        AppError::Gateway {
            kind: UpstreamKind::Conversion,
            source,
        }
    }

    pub fn fhir(source: GatewayError) -> Self {
        AppError::Gateway {
            kind: UpstreamKind::FhirServer,
            source,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Gateway { kind, source } => {
                match &source {
                    GatewayError::Transport(cause) => {
                        tracing::error!(upstream = %kind, error = %cause, "Upstream call failed");
                    }
                    GatewayError::Upstream { status, .. } => {
                        tracing::warn!(upstream = %kind, status, "Upstream rejected request");
                    }
                    GatewayError::MissingMessage | GatewayError::MissingAuthorization => {
                        tracing::debug!(upstream = %kind, reason = %source, "Precondition failed");
                    }
                }
                let (status, body) = gateway_core::normalize(&source, kind);
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, body)
            }
            AppError::Unhandled(cause) => {
                tracing::error!(error = %cause, "Unhandled error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::unexpected())
            }
        };

        (status, Json(body)).into_response()
    }
}
