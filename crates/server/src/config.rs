//! Server configuration

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_PORT: &str = "3000";
const DEFAULT_EMR_ENDPOINT: &str = "http://localhost:3010";
const DEFAULT_FHIR_BASE_URL: &str = "http://localhost:3010/fhir";
const DEFAULT_CONVERT_TIMEOUT_SECS: u64 = 30;

/// Invalid configuration value
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{name} must be an http or https URL, got {value}")]
    UnsupportedScheme { name: &'static str, value: String },

    #[error("{name} must be a whole number of seconds, got {value}")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Base of the EMR conversion service (`POST {base}/convert/hl7-to-fhir`)
    pub emr_endpoint: Url,
    /// Base of the upstream FHIR API (`GET {base}/{version}/{resourceType}`)
    pub fhir_base_url: Url,
    pub cors_origins: Vec<String>,
    /// Upper bound on a single conversion call. FHIR reads are unbounded.
    pub convert_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| {
            let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.into());
            format!("0.0.0.0:{}", port)
        });

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let convert_timeout = match std::env::var("CONVERT_TIMEOUT_SECS") {
            Ok(value) => value
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTimeout {
                    name: "CONVERT_TIMEOUT_SECS",
                    value,
                })?,
            Err(_) => Duration::from_secs(DEFAULT_CONVERT_TIMEOUT_SECS),
        };

        Ok(Self {
            bind_address,
            emr_endpoint: upstream_url("EMR_ENDPOINT", DEFAULT_EMR_ENDPOINT)?,
            fhir_base_url: upstream_url("FHIR_BASE_URL", DEFAULT_FHIR_BASE_URL)?,
            cors_origins,
            convert_timeout,
        })
    }
}

fn upstream_url(name: &'static str, default: &str) -> Result<Url, ConfigError> {
    let value = std::env::var(name).unwrap_or_else(|_| default.into());
    parse_upstream(name, &value)
}

/// Parse an upstream base address, accepting only http(s) URLs
pub fn parse_upstream(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_bases() {
        let url = parse_upstream("FHIR_BASE_URL", "http://localhost:3010/fhir").unwrap();
        assert_eq!(url.path(), "/fhir");
        assert!(parse_upstream("EMR_ENDPOINT", "https://emr.example.org").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(matches!(
            parse_upstream("EMR_ENDPOINT", "ftp://emr.example.org"),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            parse_upstream("EMR_ENDPOINT", "localhost:3010"),
            Err(ConfigError::UnsupportedScheme { .. }) | Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_upstream("EMR_ENDPOINT", "not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
