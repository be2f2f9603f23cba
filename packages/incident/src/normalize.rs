//! Flattens raw provider incidents into [`NormalizedIncident`] records.
//!
//! Normalization never fails. A malformed record degrades field by field
//! to defaults, oddly shaped geometry included; the only reason to drop a
//! record is an empty or missing coordinate list. Input order is preserved.

use serde_json::Value;
use traffic_map_incident_models::{IconCategory, NormalizedIncident, Position, Severity};

/// Severity candidates, in precedence order.
const SEVERITY_FIELDS: &[&str] = &["magnitudeOfDelay", "delay", "impact"];

/// Normalizes a raw incident payload.
///
/// Returns an empty list when the payload is absent or has no
/// `incidents` array.
#[must_use]
pub fn normalize(payload: Option<&Value>) -> Vec<NormalizedIncident> {
    let Some(incidents) = payload
        .and_then(|p| p.get("incidents"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    incidents.iter().filter_map(normalize_incident).collect()
}

/// Normalizes one raw incident, or returns `None` if its coordinate list
/// is missing or empty.
#[must_use]
pub fn normalize_incident(raw: &Value) -> Option<NormalizedIncident> {
    let properties = raw.get("properties");
    let raw_coordinates = raw
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())?;

    let icon_category = IconCategory::from_json(properties.and_then(|p| p.get("iconCategory")));
    let incident_type = icon_category.incident_type();

    Some(NormalizedIncident {
        icon_category,
        incident_type,
        severity: severity(properties),
        coordinates: positions(raw_coordinates),
        color: incident_type.color(),
    })
}

/// Picks the first severity field carrying a meaningful value.
///
/// Null, `false`, zero, and empty strings or collections count as "no
/// value" and fall through to the next field.
fn severity(properties: Option<&Value>) -> Severity {
    SEVERITY_FIELDS
        .iter()
        .filter_map(|field| properties.and_then(|p| p.get(*field)))
        .find(|value| is_meaningful(value))
        .map_or(Severity::NotReported, |value| Severity::Reported(value.clone()))
}

/// Returns `false` for null, `false`, zero, and empty strings or
/// collections.
#[must_use]
pub fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Flattens a GeoJSON coordinate array of any nesting depth into
/// `[lon, lat]` positions.
///
/// A `Point` pair, a `LineString` list and deeper `Polygon` or
/// `MultiLineString` rings all reduce to their positions in document
/// order. Entries that are not numeric pairs contribute nothing, so the
/// result may be empty.
fn positions(items: &[Value]) -> Vec<Position> {
    let mut out = Vec::new();
    collect_positions(items, &mut out);
    out
}

fn collect_positions(items: &[Value], out: &mut Vec<Position>) {
    if let Some(point) = position(items) {
        out.push(point);
        return;
    }

    for nested in items.iter().filter_map(Value::as_array) {
        collect_positions(nested, out);
    }
}

fn position(pair: &[Value]) -> Option<Position> {
    match pair {
        [lon, lat, ..] => Some([lon.as_f64()?, lat.as_f64()?]),
        _ => None,
    }
}
