#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard state, map, chart, and API types for the traffic map.
//!
//! These types are serialized to JSON for the dashboard API and the
//! browser page. They are separate from the incident types so the
//! presentation contract can evolve on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use traffic_map_incident_models::{Coordinates, IncidentColor, NormalizedIncident};

/// Start location pre-filled in the inputs.
pub const DEFAULT_START_LOCATION: &str = "Birmingham";

/// End location pre-filled in the inputs.
pub const DEFAULT_END_LOCATION: &str = "Coventry";

/// Zoom level of the incident map.
pub const MAP_ZOOM: u8 = 12;

/// Which simulated statistic to chart.
///
/// None of these are computed from incident data; each is a uniformly
/// random placeholder within [`StatisticKind::range`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum StatisticKind {
    #[default]
    #[serde(rename = "Average Accident Rate")]
    #[strum(serialize = "Average Accident Rate")]
    AverageAccidentRate,
    #[serde(rename = "Standard Deviation of Accident Rate")]
    #[strum(serialize = "Standard Deviation of Accident Rate")]
    StdDevAccidentRate,
    #[serde(rename = "Average Traffic Severity")]
    #[strum(serialize = "Average Traffic Severity")]
    AverageTrafficSeverity,
}

impl StatisticKind {
    /// Returns the half-open `[low, high)` range values are drawn from.
    #[must_use]
    pub const fn range(self) -> (f64, f64) {
        match self {
            Self::AverageAccidentRate => (0.0, 100.0),
            Self::StdDevAccidentRate => (0.0, 20.0),
            Self::AverageTrafficSeverity => (0.0, 10.0),
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::AverageAccidentRate,
            Self::StdDevAccidentRate,
            Self::AverageTrafficSeverity,
        ]
    }
}

/// Time period shown in the chart title. Does not filter anything.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TimePeriod {
    #[default]
    #[serde(rename = "Last 1 hour")]
    #[strum(serialize = "Last 1 hour")]
    LastHour,
    #[serde(rename = "Last 30 minutes")]
    #[strum(serialize = "Last 30 minutes")]
    LastThirtyMinutes,
    #[serde(rename = "Last 24 hours")]
    #[strum(serialize = "Last 24 hours")]
    LastDay,
}

impl TimePeriod {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::LastHour, Self::LastThirtyMinutes, Self::LastDay]
    }
}

/// One user-triggered fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    /// Free-text start location.
    pub start_location: String,
    /// Free-text end location.
    pub end_location: String,
    /// Statistic to simulate.
    #[serde(default)]
    pub statistic: StatisticKind,
    /// Period label for the chart.
    #[serde(default)]
    pub period: TimePeriod,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            start_location: DEFAULT_START_LOCATION.to_string(),
            end_location: DEFAULT_END_LOCATION.to_string(),
            statistic: StatisticKind::default(),
            period: TimePeriod::default(),
        }
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message shown to the user after a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A colored dot for one incident coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub color: IncidentColor,
}

/// A labeled marker at an incident's first coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub color: IncidentColor,
    /// Popup text, e.g. `"Type: Accident"`.
    pub popup: String,
}

/// Everything the browser needs to draw the incident map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Map center (the start location).
    pub center: Coordinates,
    pub zoom: u8,
    /// One point per incident coordinate, in incident order.
    pub points: Vec<MapPoint>,
    /// One marker per incident, in incident order.
    pub markers: Vec<MapMarker>,
}

/// A single bar in a [`BarChart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    /// Location label on the x axis.
    pub label: String,
    pub value: f64,
}

/// Bar chart of a simulated statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    /// E.g. `"Average Accident Rate for Last 1 hour"`.
    pub title: String,
    pub x_label: String,
    /// E.g. `"Average Accident Rate Value"`.
    pub y_label: String,
    pub bars: Vec<ChartBar>,
    /// Always `true`: the values are random placeholders.
    pub simulated: bool,
}

/// Session-scoped display state.
///
/// Replaced wholesale after every successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Number of cleaned incidents from the last fetch.
    pub total_incidents: Option<usize>,
    /// Cleaned incidents from the last fetch.
    pub incidents: Option<Vec<NormalizedIncident>>,
    pub map: Option<MapView>,
    pub chart: Option<BarChart>,
    /// Caption naming the incident provider.
    pub data_source: Option<String>,
    /// When the state was last replaced.
    pub last_updated: Option<DateTime<Utc>>,
}

impl DashboardState {
    /// Returns the incident count caption, if a fetch has completed.
    #[must_use]
    pub fn total_caption(&self) -> Option<String> {
        self.total_incidents
            .map(|n| format!("Total Incidents Reported: {n}"))
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Input choices offered by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOptions {
    pub default_start_location: String,
    pub default_end_location: String,
    pub statistics: Vec<StatisticKind>,
    pub periods: Vec<TimePeriod>,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            default_start_location: DEFAULT_START_LOCATION.to_string(),
            default_end_location: DEFAULT_END_LOCATION.to_string(),
            statistics: StatisticKind::all().to_vec(),
            periods: TimePeriod::all().to_vec(),
        }
    }
}

/// Response from the fetch endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    /// Warnings and errors raised during the fetch.
    pub notices: Vec<Notice>,
    /// Whether the display state was replaced.
    pub updated: bool,
    /// Display state after the fetch.
    pub state: DashboardState,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use serde_json::json;

    use super::*;

    #[test]
    fn statistic_labels() {
        assert_eq!(
            StatisticKind::StdDevAccidentRate.to_string(),
            "Standard Deviation of Accident Rate"
        );
        assert_eq!(
            StatisticKind::from_str("Average Traffic Severity").unwrap(),
            StatisticKind::AverageTrafficSeverity
        );
        assert_eq!(StatisticKind::all().len(), 3);
    }

    #[test]
    fn statistic_ranges_are_non_empty() {
        for kind in StatisticKind::all() {
            let (low, high) = kind.range();
            assert!(low < high, "{kind} has an empty range");
        }
    }

    #[test]
    fn period_labels() {
        let labels: Vec<String> = TimePeriod::all().iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["Last 1 hour", "Last 30 minutes", "Last 24 hours"]);
    }

    #[test]
    fn fetch_request_defaults() {
        let request: FetchRequest = serde_json::from_value(json!({
            "startLocation": "Leeds",
            "endLocation": "York"
        }))
        .unwrap();
        assert_eq!(request.statistic, StatisticKind::AverageAccidentRate);
        assert_eq!(request.period, TimePeriod::LastHour);

        let default = FetchRequest::default();
        assert_eq!(default.start_location, "Birmingham");
        assert_eq!(default.end_location, "Coventry");
    }

    #[test]
    fn total_caption() {
        let mut state = DashboardState::default();
        assert!(state.total_caption().is_none());
        state.total_incidents = Some(0);
        assert_eq!(state.total_caption().unwrap(), "Total Incidents Reported: 0");
    }
}
