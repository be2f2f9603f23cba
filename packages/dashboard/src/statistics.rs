//! Simulated traffic statistics.
//!
//! These are placeholders: each value is drawn uniformly from the kind's
//! range and has no relation to the fetched incidents. Charts built here
//! are flagged `simulated` so front ends can say so.

use rand::Rng;
use traffic_map_dashboard_models::{BarChart, ChartBar, StatisticKind, TimePeriod};

/// Draws a random value for `kind`.
pub fn simulate<R: Rng>(kind: StatisticKind, rng: &mut R) -> f64 {
    let (low, high) = kind.range();
    rng.random_range(low..high)
}

/// Builds the one-bar chart for a simulated statistic at `location`.
#[must_use]
pub fn build_chart(
    kind: StatisticKind,
    period: TimePeriod,
    location: &str,
    value: f64,
) -> BarChart {
    BarChart {
        title: format!("{kind} for {period}"),
        x_label: "City".to_string(),
        y_label: format!("{kind} Value"),
        bars: vec![ChartBar {
            label: location.to_string(),
            value,
        }],
        simulated: true,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for kind in StatisticKind::all() {
            let (low, high) = kind.range();
            for _ in 0..1_000 {
                let value = simulate(*kind, &mut rng);
                assert!(
                    (low..high).contains(&value),
                    "{kind} produced {value} outside [{low}, {high})"
                );
            }
        }
    }

    #[test]
    fn chart_labels() {
        let chart = build_chart(
            StatisticKind::AverageTrafficSeverity,
            TimePeriod::LastDay,
            "Birmingham",
            4.2,
        );
        assert_eq!(chart.title, "Average Traffic Severity for Last 24 hours");
        assert_eq!(chart.x_label, "City");
        assert_eq!(chart.y_label, "Average Traffic Severity Value");
        assert_eq!(chart.bars.len(), 1);
        assert_eq!(chart.bars[0].label, "Birmingham");
        assert!(chart.simulated);
    }
}
