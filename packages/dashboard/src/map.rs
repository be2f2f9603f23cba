//! Builds the incident map view.
//!
//! Each incident coordinate becomes a colored point, and each incident gets
//! one labeled marker at its first coordinate. Provider coordinates are
//! `[lon, lat]`; the view uses explicit latitude/longitude fields.

use traffic_map_dashboard_models::{MAP_ZOOM, MapMarker, MapPoint, MapView};
use traffic_map_incident_models::{Coordinates, NormalizedIncident};

/// Builds a map centered on `center` showing `incidents` in order.
#[must_use]
pub fn build_map(center: Coordinates, incidents: &[NormalizedIncident]) -> MapView {
    let points = incidents
        .iter()
        .flat_map(|incident| {
            incident.coordinates.iter().map(|[lon, lat]| MapPoint {
                latitude: *lat,
                longitude: *lon,
                color: incident.color,
            })
        })
        .collect();

    let markers = incidents
        .iter()
        .filter_map(|incident| {
            let [lon, lat] = incident.first_position()?;
            Some(MapMarker {
                latitude: lat,
                longitude: lon,
                color: incident.color,
                popup: format!("Type: {}", incident.incident_type),
            })
        })
        .collect();

    MapView {
        center,
        zoom: MAP_ZOOM,
        points,
        markers,
    }
}
