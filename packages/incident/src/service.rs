//! Embedded TomTom service definition.
//!
//! The endpoint, the API key variable, and the default traffic-model
//! timestamp are defined in `services/tomtom.toml`. Environment variables
//! override the embedded values at runtime.

use serde::Deserialize;

/// Overrides the embedded endpoint URL.
pub const URL_ENV: &str = "TOMTOM_INCIDENT_URL";

/// Overrides the embedded `t` parameter.
pub const TIMESTAMP_ENV: &str = "TOMTOM_INCIDENT_TIMESTAMP";

const SERVICE_TOML: &str = include_str!("../services/tomtom.toml");

/// A traffic incident service definition loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct IncidentService {
    /// Unique identifier (e.g., `"tomtom"`).
    pub id: String,
    /// Provider name shown in the data source caption.
    pub name: String,
    /// Incident details endpoint.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Value sent as the `t` query parameter.
    pub timestamp: String,
}

/// Runtime settings for one TomTom client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomTomConfig {
    /// Provider name shown in the data source caption.
    pub name: String,
    /// Incident details endpoint.
    pub base_url: String,
    /// API key; may be empty, in which case every request fails upstream.
    pub api_key: String,
    /// Value sent as the `t` query parameter.
    pub timestamp: String,
}

/// Returns the embedded TomTom service definition.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (a compile-time guarantee
/// since the config is embedded).
#[must_use]
pub fn tomtom_service() -> IncidentService {
    toml::de::from_str(SERVICE_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse incident service 'tomtom': {e}"))
}

impl TomTomConfig {
    /// Builds the config from the embedded definition plus environment
    /// overrides.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from the embedded definition, overriding it with
    /// whatever `lookup` returns for the API key, URL and timestamp
    /// variables.
    ///
    /// A missing API key is not an error here; it yields an empty key.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let service = tomtom_service();

        let api_key = lookup(service.api_key_env.as_str()).unwrap_or_else(|| {
            log::debug!("{} is not set; requests will be unauthenticated", service.api_key_env);
            String::new()
        });

        Self {
            name: service.name,
            base_url: lookup(URL_ENV).unwrap_or(service.base_url),
            api_key,
            timestamp: lookup(TIMESTAMP_ENV).unwrap_or(service.timestamp),
        }
    }
}
