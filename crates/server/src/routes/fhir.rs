//! FHIR REST proxy handler

use axum::{
    extract::{Path, RawQuery, State, rejection::PathRejection},
    http::HeaderMap,
    response::IntoResponse,
};
use gateway_core::FhirQuery;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::forwarded_authorization;
use crate::upstream::EmrClient;

/// Path parameters shared by the collection and instance routes
#[derive(Debug, Deserialize)]
pub struct ResourcePath {
    pub version: String,
    pub resource_type: String,
    #[serde(default)]
    pub id: Option<String>,
}

/// GET /fhir/{version}/{resource_type}[/{id}] - Relay a FHIR read or search
///
/// Neither the version nor the resource type is checked against a known
/// set. Query pairs are forwarded in their original order, repeated keys
/// included.
pub async fn read(
    State(client): State<EmrClient>,
    path: Result<Path<ResourcePath>, PathRejection>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let authorization = forwarded_authorization(&headers).map_err(AppError::fhir)?;
    let Path(path) = path.map_err(|rejection| {
        AppError::Unhandled(format!("Unparseable path: {}", rejection.body_text()))
    })?;

    let params = query_pairs(raw_query.as_deref());
    let query = FhirQuery {
        version: &path.version,
        resource_type: &path.resource_type,
        id: path.id.as_deref(),
        params: &params,
    };

    client
        .fetch(&query, &authorization)
        .await
        .map_err(AppError::fhir)
}

fn query_pairs(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect()
    })
    .unwrap_or_default()
}
