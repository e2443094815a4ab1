//! gateway-core: Shared types for the HL7/FHIR EMR gateway
//!
//! This crate holds the wire shapes exchanged with callers and with the
//! upstream EMR service, the gateway error taxonomy, the error normalizer,
//! and upstream URL construction. It has no HTTP framework dependency.

pub mod error;
pub mod message;
pub mod outcome;
pub mod target;

pub use error::{GatewayError, UpstreamKind};
pub use message::{ConversionRequest, DEFAULT_RESOURCE_TYPE, HealthCheckResponse};
pub use outcome::{ErrorResponse, normalize, timestamp};
pub use target::{FhirQuery, conversion_url, fhir_url};
