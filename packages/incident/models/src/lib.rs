#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Traffic incident taxonomy and display-ready incident types.
//!
//! The traffic provider tags every incident with an integer icon category.
//! This crate maps those codes onto a fixed set of [`IncidentType`] labels,
//! each with a map [`IncidentColor`], and defines the flat
//! [`NormalizedIncident`] record that the map and the API consume.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Label used when the icon category is missing or unrecognized.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Label used when none of the severity fields carry a value.
pub const NOT_REPORTED_LABEL: &str = "Not Reported";

/// A `[longitude, latitude]` pair as sent by the traffic provider.
pub type Position = [f64; 2];

/// Incident type derived from the provider's icon category code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IncidentType {
    /// Code 0, and the fallback for anything unrecognized.
    Unknown,
    /// Code 1.
    Accident,
    /// Code 2.
    Fog,
    /// Code 3.
    DangerousConditions,
    /// Code 4.
    Rain,
    /// Code 5.
    Ice,
    /// Code 6.
    Jam,
    /// Code 7.
    LaneClosed,
    /// Code 8.
    #[serde(rename = "Road Closed")]
    #[strum(serialize = "Road Closed")]
    RoadClosed,
    /// Code 9.
    RoadWorks,
    /// Code 10.
    Wind,
    /// Code 11.
    Flooding,
    /// Code 14.
    BrokenDownVehicle,
}

impl IncidentType {
    /// Maps a provider icon category code to its incident type.
    ///
    /// Codes outside the known table map to [`Self::Unknown`].
    #[must_use]
    pub const fn from_icon_code(code: i64) -> Self {
        match code {
            1 => Self::Accident,
            2 => Self::Fog,
            3 => Self::DangerousConditions,
            4 => Self::Rain,
            5 => Self::Ice,
            6 => Self::Jam,
            7 => Self::LaneClosed,
            8 => Self::RoadClosed,
            9 => Self::RoadWorks,
            10 => Self::Wind,
            11 => Self::Flooding,
            14 => Self::BrokenDownVehicle,
            _ => Self::Unknown,
        }
    }

    /// Returns the provider icon category code for this type.
    #[must_use]
    pub const fn icon_code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Accident => 1,
            Self::Fog => 2,
            Self::DangerousConditions => 3,
            Self::Rain => 4,
            Self::Ice => 5,
            Self::Jam => 6,
            Self::LaneClosed => 7,
            Self::RoadClosed => 8,
            Self::RoadWorks => 9,
            Self::Wind => 10,
            Self::Flooding => 11,
            Self::BrokenDownVehicle => 14,
        }
    }

    /// Returns the map color used to draw incidents of this type.
    #[must_use]
    pub const fn color(self) -> IncidentColor {
        match self {
            Self::Accident => IncidentColor::Red,
            Self::RoadClosed => IncidentColor::Black,
            Self::Jam => IncidentColor::Orange,
            Self::DangerousConditions => IncidentColor::Purple,
            Self::Rain | Self::Ice => IncidentColor::Blue,
            Self::LaneClosed => IncidentColor::Green,
            Self::RoadWorks => IncidentColor::Yellow,
            Self::Wind => IncidentColor::Brown,
            Self::Flooding => IncidentColor::Cyan,
            Self::BrokenDownVehicle => IncidentColor::Magenta,
            Self::Fog | Self::Unknown => IncidentColor::Gray,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Unknown,
            Self::Accident,
            Self::Fog,
            Self::DangerousConditions,
            Self::Rain,
            Self::Ice,
            Self::Jam,
            Self::LaneClosed,
            Self::RoadClosed,
            Self::RoadWorks,
            Self::Wind,
            Self::Flooding,
            Self::BrokenDownVehicle,
        ]
    }
}

/// Display color for an incident marker.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IncidentColor {
    Red,
    Black,
    Orange,
    Gray,
    Purple,
    Blue,
    Green,
    Yellow,
    Brown,
    Cyan,
    Magenta,
}

/// The icon category as received from the provider.
///
/// Serializes as the integer code, or as the string `"Unknown"` when the
/// provider sent no usable integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconCategory {
    /// An integer code (known or not).
    Code(i64),
    /// Missing or non-integer category.
    Unknown,
}

impl IconCategory {
    /// Reads an icon category from a raw JSON field.
    ///
    /// Integral numbers (including `1.0`) become [`Self::Code`], as do
    /// booleans (`true` is code 1, `false` code 0). Anything else,
    /// including a missing field, becomes [`Self::Unknown`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        if let Some(flag) = value.and_then(serde_json::Value::as_bool) {
            return Self::Code(i64::from(flag));
        }

        let Some(number) = value.and_then(serde_json::Value::as_number) else {
            return Self::Unknown;
        };

        if let Some(code) = number.as_i64() {
            return Self::Code(code);
        }

        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map_or(Self::Unknown, |f| Self::Code(f as i64))
    }

    /// Resolves this category to its incident type.
    #[must_use]
    pub const fn incident_type(self) -> IncidentType {
        match self {
            Self::Code(code) => IncidentType::from_icon_code(code),
            Self::Unknown => IncidentType::Unknown,
        }
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Unknown => f.write_str(UNKNOWN_LABEL),
        }
    }
}

impl Serialize for IconCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Code(code) => serializer.serialize_i64(*code),
            Self::Unknown => serializer.serialize_str(UNKNOWN_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for IconCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(Some(&value)))
    }
}

/// Incident severity as reported by the provider.
///
/// The provider spreads severity across several optional fields whose
/// types differ, so the reported value is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    /// A value taken from one of the provider's severity fields.
    Reported(serde_json::Value),
    /// None of the severity fields carried a value.
    NotReported,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reported(serde_json::Value::String(s)) => f.write_str(s),
            Self::Reported(value) => write!(f, "{value}"),
            Self::NotReported => f.write_str(NOT_REPORTED_LABEL),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Reported(value) => value.serialize(serializer),
            Self::NotReported => serializer.serialize_str(NOT_REPORTED_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) if s == NOT_REPORTED_LABEL => Self::NotReported,
            other => Self::Reported(other),
        })
    }
}

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The query region between two locations.
///
/// The corners are kept in the order the user entered them; no
/// west/east or south/north sorting is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// First corner (the start location).
    pub start: Coordinates,
    /// Second corner (the end location).
    pub end: Coordinates,
}

impl BoundingBox {
    #[must_use]
    pub const fn from_corners(start: Coordinates, end: Coordinates) -> Self {
        Self { start, end }
    }

    /// Formats the box as the provider's `bbox` parameter:
    /// `lon1,lat1,lon2,lat2`.
    #[must_use]
    pub fn to_query_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.start.longitude, self.start.latitude, self.end.longitude, self.end.latitude
        )
    }
}

/// A flat, display-ready traffic incident.
///
/// Incidents without a coordinate list are dropped during normalization.
/// `coordinates` can still be empty when the list held no numeric pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIncident {
    /// Raw provider category.
    pub icon_category: IconCategory,
    /// Human-readable type label.
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    /// First reported severity value.
    pub severity: Severity,
    /// `[longitude, latitude]` points in provider order.
    pub coordinates: Vec<Position>,
    /// Marker color.
    pub color: IncidentColor,
}

impl NormalizedIncident {
    /// Returns the first point of the incident geometry.
    #[must_use]
    pub fn first_position(&self) -> Option<Position> {
        self.coordinates.first().copied()
    }
}
