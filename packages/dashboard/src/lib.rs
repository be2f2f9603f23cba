#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic incident dashboard.
//!
//! The [`pipeline`] geocodes a start and end location, fetches TomTom
//! incidents for the box between them, and builds the map view and the
//! simulated statistic chart. The Actix-Web server wraps the pipeline with
//! a single-page UI and a small JSON API; the session display state lives
//! in [`AppState`] and is replaced wholesale after each successful fetch.

mod handlers;

pub mod export;
pub mod interactive;
pub mod map;
pub mod pipeline;
pub mod statistics;

use std::sync::{Mutex, PoisonError};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use thiserror::Error;
use traffic_map_dashboard_models::DashboardState;

pub use pipeline::Services;

/// Errors from dashboard setup and export.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The geocoder could not be constructed.
    #[error("Geocoder error: {0}")]
    Geocode(#[from] traffic_map_geocoder::GeocodeError),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Geocoder and incident provider.
    pub services: Services,
    /// Current display state. Last write wins.
    session: Mutex<DashboardState>,
}

impl AppState {
    #[must_use]
    pub fn new(services: Services) -> Self {
        Self {
            services,
            session: Mutex::new(DashboardState::default()),
        }
    }

    /// Returns a copy of the current display state.
    pub fn snapshot(&self) -> DashboardState {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the display state wholesale.
    pub fn replace(&self, next: DashboardState) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

/// Registers the dashboard routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index)).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/state", web::get().to(handlers::state))
            .route("/fetch", web::post().to(handlers::fetch))
            .route("/incidents.geojson", web::get().to(handlers::incidents_geojson)),
    );
}

/// Listen address for the dashboard server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, defaulting to `127.0.0.1:8080`.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Self { bind_addr, port }
    }
}

/// Starts the dashboard server.
///
/// Builds the geocoder and incident clients from the environment and
/// serves the UI on the configured address. The caller provides the async
/// runtime and the logger.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the clients cannot be built, or
/// the HTTP server fails to bind or encounters a runtime error.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let services = Services::from_env().map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(services));

    let ServerConfig { bind_addr, port } = config;
    log::info!("Starting dashboard on http://{bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
