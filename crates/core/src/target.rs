//! Upstream URL construction

use url::Url;

use crate::error::GatewayError;

/// Path and query of an inbound FHIR read/search
#[derive(Debug, Clone)]
pub struct FhirQuery<'a> {
    pub version: &'a str,
    pub resource_type: &'a str,
    pub id: Option<&'a str>,
    /// Query pairs in the order the caller sent them
    pub params: &'a [(String, String)],
}

/// `{base}/convert/hl7-to-fhir`
pub fn conversion_url(base: &Url) -> Result<Url, GatewayError> {
    with_segments(base, &["convert", "hl7-to-fhir"])
}

/// `{base}/{version}/{resourceType}[/{id}][?query]`
///
/// Segments are percent-escaped. The query string is form-urlencoded
/// (spaces as `+`) and omitted entirely when there are no pairs.
pub fn fhir_url(base: &Url, query: &FhirQuery<'_>) -> Result<Url, GatewayError> {
    let mut segments = vec![query.version, query.resource_type];
    segments.extend(query.id);

    let mut url = with_segments(base, &segments)?;
    if !query.params.is_empty() {
        url.query_pairs_mut().extend_pairs(query.params);
    }
    Ok(url)
}

fn with_segments(base: &Url, segments: &[&str]) -> Result<Url, GatewayError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GatewayError::Transport(format!("upstream base {base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
