//! `GeoJSON` export of cleaned incidents.
//!
//! Each incident becomes a `MultiPoint` feature (the provider geometry is
//! treated as points, not a path) with its type, severity, color and raw
//! icon category as properties.

use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use traffic_map_incident_models::NormalizedIncident;

use crate::DashboardError;

/// Converts incidents to a `FeatureCollection`, preserving order.
#[must_use]
pub fn to_feature_collection(incidents: &[NormalizedIncident]) -> FeatureCollection {
    let features = incidents.iter().map(to_feature).collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn to_feature(incident: &NormalizedIncident) -> Feature {
    let points = incident
        .coordinates
        .iter()
        .map(|position| position.to_vec())
        .collect();

    let mut properties = JsonObject::new();
    properties.insert(
        "type".to_string(),
        serde_json::Value::String(incident.incident_type.to_string()),
    );
    properties.insert(
        "severity".to_string(),
        serde_json::to_value(&incident.severity).unwrap_or(serde_json::Value::Null),
    );
    properties.insert(
        "color".to_string(),
        serde_json::Value::String(incident.color.to_string()),
    );
    properties.insert(
        "iconCategory".to_string(),
        serde_json::to_value(incident.icon_category).unwrap_or(serde_json::Value::Null),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::MultiPoint(points))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Writes incidents to `path` as a `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// Returns [`DashboardError::Io`] if the file cannot be written.
pub fn write_geojson(path: &Path, incidents: &[NormalizedIncident]) -> Result<(), DashboardError> {
    let geojson = GeoJson::from(to_feature_collection(incidents));
    std::fs::write(path, geojson.to_string())?;
    log::info!("Wrote {} incidents to {}", incidents.len(), path.display());
    Ok(())
}
