//! Plain-text rendering of fetch results.

use std::fmt::Write as _;

use traffic_map_dashboard_models::{BarChart, DashboardState, Notice, NoticeLevel};
use traffic_map_incident_models::NormalizedIncident;

/// Widest bar drawn by [`chart`], in characters.
const BAR_WIDTH: u32 = 40;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[must_use]
pub fn notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Warning => format!("warning: {}", notice.message),
        NoticeLevel::Error => format!("error: {}", notice.message),
    }
}

/// One line per incident, numbered from 1.
#[must_use]
pub fn incident(index: usize, incident: &NormalizedIncident) -> String {
    let location = incident.first_position().map_or_else(
        || "no coordinates".to_string(),
        |[lon, lat]| format!("({lat:.5}, {lon:.5})"),
    );

    format!(
        "{:>3}. {} | severity: {} | color: {} | {location}",
        index + 1,
        incident.incident_type,
        incident.severity,
        incident.color,
    )
}

/// Horizontal bars scaled to the largest value.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn chart(chart: &BarChart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart.title);
    if chart.simulated {
        let _ = writeln!(out, "(simulated values, not derived from incident data)");
    }

    let label_width = chart
        .bars
        .iter()
        .map(|bar| bar.label.chars().count())
        .max()
        .unwrap_or(0)
        .max(chart.x_label.len());
    let max = chart
        .bars
        .iter()
        .map(|bar| bar.value)
        .fold(0.0_f64, f64::max);

    let _ = writeln!(out, "{:<label_width$} | {}", chart.x_label, chart.y_label);
    for bar in &chart.bars {
        let len = if max > 0.0 {
            ((bar.value / max) * f64::from(BAR_WIDTH)).round().max(0.0) as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<label_width$} | {} {:.2}",
            bar.label,
            "#".repeat(len),
            bar.value
        );
    }

    out
}

/// Full report for a completed fetch.
#[must_use]
pub fn state(state: &DashboardState) -> String {
    let mut out = String::new();

    if let Some(caption) = state.total_caption() {
        let _ = writeln!(out, "{caption}");
    }
    if let Some(incidents) = &state.incidents {
        for (i, item) in incidents.iter().enumerate() {
            let _ = writeln!(out, "{}", incident(i, item));
        }
    }
    if let Some(bars) = &state.chart {
        let _ = writeln!(out);
        out.push_str(&chart(bars));
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Data Source: {}",
        state.data_source.as_deref().unwrap_or("TomTom API")
    );
    let updated = state.last_updated.unwrap_or_else(chrono::Utc::now);
    let _ = writeln!(
        out,
        "Last Updated: {}",
        updated
            .with_timezone(&chrono::Local)
            .format(TIMESTAMP_FORMAT)
    );

    out
}
