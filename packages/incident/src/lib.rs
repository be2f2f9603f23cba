#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic incident fetching and normalization.
//!
//! A single bounding-box query goes to the TomTom Incident Details API
//! ([`tomtom`]); the raw `incidents` array is then flattened into
//! [`NormalizedIncident`] records by [`normalize::normalize`].
//!
//! The provider endpoint and its fixed traffic-model timestamp are defined
//! in `services/tomtom.toml` and embedded at compile time ([`service`]).

pub mod normalize;
pub mod service;
pub mod tomtom;

use async_trait::async_trait;
use thiserror::Error;
use traffic_map_incident_models::BoundingBox;

pub use traffic_map_incident_models::NormalizedIncident;

/// Errors from incident fetching.
#[derive(Debug, Error)]
pub enum IncidentError {
    /// HTTP request failed before a response arrived.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with something other than `200 OK`.
    #[error("{status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// A provider of raw traffic incident payloads.
///
/// Implementations issue exactly one request per call; no retries.
#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Human-readable name of the provider, used in captions.
    fn name(&self) -> &str;

    /// Fetches the raw incident payload for `bbox`.
    ///
    /// # Errors
    ///
    /// Returns [`IncidentError`] on transport failure, a non-200 status, or
    /// an undecodable body.
    async fn fetch(&self, bbox: &BoundingBox) -> Result<serde_json::Value, IncidentError>;
}
