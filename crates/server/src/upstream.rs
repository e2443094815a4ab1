//! HTTP client for the upstream EMR service

use std::time::Duration;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use gateway_core::{ConversionRequest, FhirQuery, GatewayError, UpstreamKind};
use serde_json::Value as JsonValue;
use url::Url;

use crate::config::Config;

/// Client for the EMR conversion service and its FHIR API
#[derive(Clone)]
pub struct EmrClient {
    http: reqwest::Client,
    emr_endpoint: Url,
    fhir_base_url: Url,
    convert_timeout: Duration,
}

/// Successful upstream answer, relayed to the caller unchanged
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: JsonValue,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl EmrClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            emr_endpoint: config.emr_endpoint.clone(),
            fhir_base_url: config.fhir_base_url.clone(),
            convert_timeout: config.convert_timeout,
        }
    }

    /// POST an HL7 message to `{emr_endpoint}/convert/hl7-to-fhir`
    pub async fn convert(
        &self,
        request: &ConversionRequest,
        authorization: &HeaderValue,
    ) -> Result<UpstreamResponse, GatewayError> {
        let url = gateway_core::conversion_url(&self.emr_endpoint)?;
        tracing::info!(
            upstream = %url,
            resource_type = %request.resource_type,
            "Forwarding HL7 conversion"
        );

        let result = self
            .http
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, authorization.clone())
            .timeout(self.convert_timeout)
            .json(request)
            .send()
            .await;

        record(UpstreamKind::Conversion, relay(result).await)
    }

    /// GET a FHIR resource or search from `{fhir_base_url}/...`
    pub async fn fetch(
        &self,
        query: &FhirQuery<'_>,
        authorization: &HeaderValue,
    ) -> Result<UpstreamResponse, GatewayError> {
        let url = gateway_core::fhir_url(&self.fhir_base_url, query)?;
        tracing::info!(upstream = %url, "Forwarding FHIR request");

        let result = self
            .http
            .get(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, authorization.clone())
            .send()
            .await;

        record(UpstreamKind::FhirServer, relay(result).await)
    }
}

/// Split an upstream answer into success or rejection, reading the body
/// either way.
async fn relay(
    result: Result<reqwest::Response, reqwest::Error>,
) -> Result<UpstreamResponse, GatewayError> {
    let response = result.map_err(GatewayError::transport)?;
    let status = response.status();
    let bytes = response.bytes().await.map_err(GatewayError::transport)?;
    let body = decode_body(&bytes);

    if status.is_success() {
        Ok(UpstreamResponse { status, body })
    } else {
        Err(GatewayError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

/// JSON when possible, otherwise the raw text as a JSON string
fn decode_body(bytes: &[u8]) -> JsonValue {
    if bytes.is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| JsonValue::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn record(
    kind: UpstreamKind,
    result: Result<UpstreamResponse, GatewayError>,
) -> Result<UpstreamResponse, GatewayError> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(GatewayError::Upstream { .. }) => "rejected",
        Err(_) => "transport_error",
    };
    metrics::counter!(
        "upstream_requests_total",
        "operation" => kind.operation(),
        "outcome" => outcome
    )
    .increment(1);
    result
}
