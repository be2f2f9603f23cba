#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place-name geocoding for the traffic map.
//!
//! Resolves free-text location names (e.g. `"Birmingham"`) to WGS84
//! coordinates through Nominatim / OpenStreetMap, asking for exactly one
//! best match. The provider endpoint and the client identifier sent as
//! `User-Agent` come from the [`service_registry`].
//!
//! Geocoders are passed around as `Arc<dyn Geocoder>` rather than held in
//! process-wide state.

pub mod nominatim;
pub mod service_registry;

use async_trait::async_trait;
use thiserror::Error;
use traffic_map_incident_models::Coordinates;

pub use nominatim::NominatimGeocoder;

/// A geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// The canonical name returned by the provider.
    pub display_name: Option<String>,
}

impl GeocodedPlace {
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// A place-name geocoder.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves `query` to its single best match.
    ///
    /// Returns `Ok(None)` when the provider has no match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request fails or the response is
    /// malformed.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, GeocodeError>;
}
