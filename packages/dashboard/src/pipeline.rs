//! The fetch pipeline behind the dashboard button.
//!
//! Geocodes both locations, queries incidents for the box between them,
//! normalizes the result, and builds a complete replacement
//! [`DashboardState`]. Every failure becomes a [`Notice`]; nothing here
//! is fatal and nothing is retried.

use std::sync::Arc;

use rand::Rng;
use traffic_map_dashboard_models::{DashboardState, FetchRequest, Notice};
use traffic_map_geocoder::{Geocoder, NominatimGeocoder, service_registry};
use traffic_map_incident::service::TomTomConfig;
use traffic_map_incident::tomtom::TomTomClient;
use traffic_map_incident::{IncidentSource, normalize};
use traffic_map_incident_models::{BoundingBox, Coordinates};

use crate::{DashboardError, map, statistics};

/// External collaborators used by the pipeline.
#[derive(Clone)]
pub struct Services {
    pub geocoder: Arc<dyn Geocoder>,
    pub incidents: Arc<dyn IncidentSource>,
}

impl Services {
    /// Builds the Nominatim geocoder and the TomTom client from the
    /// embedded service definitions and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if the geocoder HTTP client cannot be
    /// built.
    pub fn from_env() -> Result<Self, DashboardError> {
        let geocoder = NominatimGeocoder::new(&service_registry::nominatim_service())?;
        let incidents = TomTomClient::new(TomTomConfig::from_env());

        Ok(Self {
            geocoder: Arc::new(geocoder),
            incidents: Arc::new(incidents),
        })
    }
}

/// Result of one pipeline run.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Messages for the user, in the order they were raised.
    pub notices: Vec<Notice>,
    /// Replacement display state; `None` leaves the current state as is.
    pub state: Option<DashboardState>,
}

/// Resolves a place name, recording a warning when it cannot.
pub async fn resolve_location(
    geocoder: &dyn Geocoder,
    name: &str,
    notices: &mut Vec<Notice>,
) -> Option<Coordinates> {
    match geocoder.geocode(name).await {
        Ok(Some(place)) => {
            log::debug!(
                "Resolved '{name}' to ({}, {})",
                place.latitude,
                place.longitude
            );
            Some(place.coordinates())
        }
        Ok(None) => {
            log::warn!("No geocoding match for '{name}'");
            notices.push(Notice::warning(format!(
                "Unable to find coordinates for {name}. Check the city name."
            )));
            None
        }
        Err(e) => {
            log::warn!("Geocoding '{name}' failed: {e}");
            notices.push(Notice::warning(format!("Geocoding Error: {e}")));
            None
        }
    }
}

/// Fetches the raw incident payload, recording an error when it cannot.
pub async fn fetch_incidents(
    source: &dyn IncidentSource,
    bbox: &BoundingBox,
    notices: &mut Vec<Notice>,
) -> Option<serde_json::Value> {
    match source.fetch(bbox).await {
        Ok(payload) => Some(payload),
        Err(e) => {
            log::error!("Incident fetch from {} failed: {e}", source.name());
            notices.push(Notice::error(format!(
                "Error fetching traffic incidents: {e}"
            )));
            None
        }
    }
}

/// Runs one fetch end to end.
///
/// Both locations are always geocoded so that each bad name gets its own
/// warning. The incident request is only issued once both resolve. An
/// empty payload (`null`, `{}`, `[]`) leaves the display as it was; an
/// object with an empty `incidents` array still reports zero.
pub async fn run_fetch<R: Rng>(
    services: &Services,
    request: &FetchRequest,
    rng: &mut R,
) -> FetchOutcome {
    let mut notices = Vec::new();

    let geocoder = services.geocoder.as_ref();
    let start = resolve_location(geocoder, &request.start_location, &mut notices).await;
    let end = resolve_location(geocoder, &request.end_location, &mut notices).await;

    let (Some(start), Some(end)) = (start, end) else {
        return FetchOutcome {
            notices,
            state: None,
        };
    };

    let bbox = BoundingBox::from_corners(start, end);
    let Some(payload) = fetch_incidents(services.incidents.as_ref(), &bbox, &mut notices).await
    else {
        return FetchOutcome {
            notices,
            state: None,
        };
    };

    if !normalize::is_meaningful(&payload) {
        log::info!("Empty incident payload; keeping the current display");
        return FetchOutcome {
            notices,
            state: None,
        };
    }

    let incidents = normalize::normalize(Some(&payload));
    log::info!(
        "{} incidents between '{}' and '{}'",
        incidents.len(),
        request.start_location,
        request.end_location
    );

    let value = statistics::simulate(request.statistic, rng);
    let chart = statistics::build_chart(
        request.statistic,
        request.period,
        &request.start_location,
        value,
    );

    let state = DashboardState {
        total_incidents: Some(incidents.len()),
        map: Some(map::build_map(start, &incidents)),
        incidents: Some(incidents),
        chart: Some(chart),
        data_source: Some(services.incidents.name().to_string()),
        last_updated: Some(chrono::Utc::now()),
    };

    FetchOutcome {
        notices,
        state: Some(state),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;
    use serde_json::json;
    use traffic_map_dashboard_models::NoticeLevel;
    use traffic_map_geocoder::{GeocodeError, GeocodedPlace};
    use traffic_map_incident::IncidentError;

    use super::*;

    /// Geocoder answering from a fixed table; unknown names have no match.
    pub struct FakeGeocoder {
        pub places: BTreeMap<String, (f64, f64)>,
        pub fail: bool,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, GeocodeError> {
            if self.fail {
                return Err(GeocodeError::RateLimited);
            }
            Ok(self.places.get(query).map(|(lat, lon)| GeocodedPlace {
                latitude: *lat,
                longitude: *lon,
                display_name: Some(query.to_string()),
            }))
        }
    }

    /// Incident source returning a canned payload and recording requests.
    ///
    /// With no payload it answers `403`, or an undecodable body when
    /// `malformed` is set.
    pub struct FakeIncidents {
        pub payload: Option<serde_json::Value>,
        pub malformed: bool,
        pub requests: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IncidentSource for FakeIncidents {
        fn name(&self) -> &str {
            "Fake Traffic"
        }

        async fn fetch(&self, bbox: &BoundingBox) -> Result<serde_json::Value, IncidentError> {
            self.requests.lock().unwrap().push(bbox.to_query_param());
            if self.malformed {
                return Err(serde_json::from_str::<serde_json::Value>("<html>")
                    .unwrap_err()
                    .into());
            }
            self.payload.clone().ok_or_else(|| IncidentError::Status {
                status: 403,
                body: "Forbidden".to_string(),
            })
        }
    }

    pub fn fake_services(payload: Option<serde_json::Value>) -> (Services, Arc<FakeIncidents>) {
        let places = BTreeMap::from([
            ("Birmingham".to_string(), (52.48, -1.90)),
            ("Coventry".to_string(), (52.41, -1.51)),
        ]);
        let incidents = Arc::new(FakeIncidents {
            payload,
            malformed: false,
            requests: Mutex::new(Vec::new()),
        });
        let services = Services {
            geocoder: Arc::new(FakeGeocoder {
                places,
                fail: false,
            }),
            incidents: incidents.clone(),
        };
        (services, incidents)
    }

    fn request(start: &str, end: &str) -> FetchRequest {
        FetchRequest {
            start_location: start.to_string(),
            end_location: end.to_string(),
            ..FetchRequest::default()
        }
    }

    #[tokio::test]
    async fn full_fetch_builds_state() {
        let payload = json!({
            "incidents": [
                {
                    "properties": { "iconCategory": 1, "magnitudeOfDelay": 3 },
                    "geometry": { "coordinates": [[-1.8, 52.45], [-1.79, 52.44]] }
                },
                {
                    "properties": { "iconCategory": 6 },
                    "geometry": { "coordinates": [] }
                }
            ]
        });
        let (services, fake) = fake_services(Some(payload));
        let mut rng = StdRng::seed_from_u64(7);

        let outcome = run_fetch(&services, &request("Birmingham", "Coventry"), &mut rng).await;

        assert!(outcome.notices.is_empty());
        assert_eq!(
            fake.requests.lock().unwrap().as_slice(),
            ["-1.9,52.48,-1.51,52.41"]
        );

        let state = outcome.state.unwrap();
        assert_eq!(state.total_incidents, Some(1));
        assert_eq!(state.data_source.as_deref(), Some("Fake Traffic"));
        let map = state.map.unwrap();
        assert_eq!(map.markers.len(), 1);
        assert_eq!(map.points.len(), 2);
        let chart = state.chart.unwrap();
        assert_eq!(chart.bars[0].label, "Birmingham");
        assert!((0.0..100.0).contains(&chart.bars[0].value));
    }

    #[tokio::test]
    async fn empty_incidents_report_zero() {
        let (services, _) = fake_services(Some(json!({ "incidents": [] })));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_fetch(&services, &request("Birmingham", "Coventry"), &mut rng).await;
        let state = outcome.state.unwrap();

        assert_eq!(state.total_caption().unwrap(), "Total Incidents Reported: 0");
        assert!(state.map.unwrap().markers.is_empty());
    }

    #[tokio::test]
    async fn empty_payload_keeps_current_state() {
        for payload in [json!({}), json!(null), json!([])] {
            let (services, fake) = fake_services(Some(payload.clone()));
            let mut rng = StdRng::seed_from_u64(1);

            let outcome = run_fetch(&services, &FetchRequest::default(), &mut rng).await;

            assert_eq!(fake.requests.lock().unwrap().len(), 1);
            assert!(outcome.notices.is_empty(), "{payload} raised notices");
            assert!(outcome.state.is_none(), "{payload} replaced the state");
        }
    }

    #[tokio::test]
    async fn unknown_locations_warn_and_skip_fetch() {
        let (services, fake) = fake_services(Some(json!({ "incidents": [] })));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_fetch(&services, &request("Atlantis", "El Dorado"), &mut rng).await;

        assert!(outcome.state.is_none());
        assert!(fake.requests.lock().unwrap().is_empty());
        assert_eq!(outcome.notices.len(), 2);
        assert_eq!(
            outcome.notices[0].message,
            "Unable to find coordinates for Atlantis. Check the city name."
        );
        assert!(outcome.notices.iter().all(|n| n.level == NoticeLevel::Warning));
    }

    #[tokio::test]
    async fn geocoder_errors_become_warnings() {
        let (mut services, fake) = fake_services(Some(json!({ "incidents": [] })));
        services.geocoder = Arc::new(FakeGeocoder {
            places: BTreeMap::new(),
            fail: true,
        });
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_fetch(&services, &FetchRequest::default(), &mut rng).await;

        assert!(outcome.state.is_none());
        assert!(fake.requests.lock().unwrap().is_empty());
        assert_eq!(outcome.notices[0].message, "Geocoding Error: Rate limit exceeded");
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let (services, _) = fake_services(None);
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_fetch(&services, &FetchRequest::default(), &mut rng).await;

        assert!(outcome.state.is_none());
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].level, NoticeLevel::Error);
        assert_eq!(
            outcome.notices[0].message,
            "Error fetching traffic incidents: 403 - Forbidden"
        );
    }

    #[tokio::test]
    async fn undecodable_response_is_reported() {
        let (mut services, _) = fake_services(None);
        services.incidents = Arc::new(FakeIncidents {
            payload: None,
            malformed: true,
            requests: Mutex::new(Vec::new()),
        });
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_fetch(&services, &FetchRequest::default(), &mut rng).await;

        assert!(outcome.state.is_none());
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].level, NoticeLevel::Error);
        assert!(
            outcome.notices[0]
                .message
                .starts_with("Error fetching traffic incidents: expected value"),
            "{}",
            outcome.notices[0].message
        );
    }
}
