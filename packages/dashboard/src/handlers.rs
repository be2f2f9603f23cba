//! HTTP handler functions for the dashboard.

use actix_web::{HttpResponse, web};
use traffic_map_dashboard_models::{ApiHealth, ApiOptions, FetchRequest, FetchResponse};

use crate::{AppState, export, pipeline};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// `GET /`
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/options`
///
/// Returns input defaults and the selector choices.
pub async fn options() -> HttpResponse {
    HttpResponse::Ok().json(ApiOptions::default())
}

/// `GET /api/state`
///
/// Returns the current session display state.
pub async fn state(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.snapshot())
}

/// `POST /api/fetch`
///
/// Runs the fetch pipeline and replaces the display state when it
/// completes. Failures come back as notices with a `200`.
pub async fn fetch(state: web::Data<AppState>, body: web::Json<FetchRequest>) -> HttpResponse {
    let request = body.into_inner();
    let mut rng = rand::rng();

    let outcome = pipeline::run_fetch(&state.services, &request, &mut rng).await;
    let updated = outcome.state.is_some();

    if let Some(next) = outcome.state {
        state.replace(next);
    }

    HttpResponse::Ok().json(FetchResponse {
        notices: outcome.notices,
        updated,
        state: state.snapshot(),
    })
}

/// `GET /api/incidents.geojson`
///
/// Exports the incidents from the last fetch.
pub async fn incidents_geojson(state: web::Data<AppState>) -> HttpResponse {
    let incidents = state.snapshot().incidents.unwrap_or_default();

    HttpResponse::Ok()
        .content_type("application/geo+json")
        .json(export::to_feature_collection(&incidents))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};
    use serde_json::json;
    use traffic_map_dashboard_models::DashboardState;

    use super::*;
    use crate::configure;
    use crate::pipeline::tests::fake_services;

    fn app_state(payload: Option<serde_json::Value>) -> web::Data<AppState> {
        let (services, _) = fake_services(payload);
        web::Data::new(AppState::new(services))
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn options_list_defaults_and_choices() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/options").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["defaultStartLocation"], "Birmingham");
        assert_eq!(body["defaultEndLocation"], "Coventry");
        assert_eq!(body["statistics"].as_array().unwrap().len(), 3);
        assert_eq!(body["periods"][1], "Last 30 minutes");
    }

    #[actix_web::test]
    async fn index_serves_page() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("Traffic Incident Data Fetcher"));
        assert!(html.contains("formatLocal(new Date(state.lastUpdated))"));
        assert!(!html.contains("toISOString"));
    }

    #[actix_web::test]
    async fn fetch_replaces_state() {
        let data = app_state(Some(json!({
            "incidents": [{
                "properties": { "iconCategory": 1 },
                "geometry": { "coordinates": [[-1.8, 52.45]] }
            }]
        })));
        let app =
            test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/fetch")
            .set_json(json!({ "startLocation": "Birmingham", "endLocation": "Coventry" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["updated"], true);
        assert_eq!(body["notices"], json!([]));
        assert_eq!(body["state"]["totalIncidents"], 1);
        assert_eq!(body["state"]["incidents"][0]["type"], "Accident");
        assert_eq!(body["state"]["map"]["markers"][0]["popup"], "Type: Accident");
        assert_eq!(data.snapshot().total_incidents, Some(1));
        assert!(body["state"]["lastUpdated"].is_string());
        assert_eq!(body["state"]["lastUpdated"], json!(data.snapshot().last_updated));

        let req = test::TestRequest::get().uri("/api/incidents.geojson").to_request();
        let geojson: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(geojson["features"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn failed_fetch_keeps_previous_state() {
        let data = app_state(None);
        let previous = DashboardState {
            total_incidents: Some(5),
            ..DashboardState::default()
        };
        data.replace(previous.clone());
        let app =
            test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/fetch")
            .set_json(json!({ "startLocation": "Birmingham", "endLocation": "Coventry" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["updated"], false);
        assert_eq!(body["notices"][0]["level"], "error");
        assert_eq!(body["state"]["totalIncidents"], 5);
        assert_eq!(data.snapshot(), previous);
    }
}
