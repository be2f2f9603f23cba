//! Compile-time registry of geocoding service configurations.
//!
//! Each geocoding provider is defined in a TOML file under `services/`.
//! The registry embeds these at compile time and exposes them via
//! [`all_services`]; [`nominatim_service`] picks the one the dashboard uses.

use serde::Deserialize;

/// Overrides the Nominatim endpoint at runtime.
pub const NOMINATIM_URL_ENV: &str = "NOMINATIM_URL";

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Search endpoint (e.g., `"https://nominatim.openstreetmap.org/search"`).
    pub base_url: String,
    /// Client identifier sent as the `User-Agent` header.
    pub user_agent: String,
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[("nominatim", include_str!("../services/nominatim.toml"))];

#[cfg(test)]
const EXPECTED_SERVICE_COUNT: usize = 1;

/// Returns all geocoding service configurations.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_services() -> Vec<GeocodingService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse geocoding service '{name}': {e}"))
        })
        .collect()
}

/// Returns the Nominatim service definition with the `NOMINATIM_URL`
/// override applied.
///
/// # Panics
///
/// Panics if the embedded registry has no `nominatim` entry.
#[must_use]
pub fn nominatim_service() -> GeocodingService {
    let mut service = all_services()
        .into_iter()
        .find(|s| s.id == "nominatim")
        .unwrap_or_else(|| panic!("No 'nominatim' geocoding service embedded"));

    if let Ok(url) = std::env::var(NOMINATIM_URL_ENV) {
        service.base_url = url;
    }

    service
}
