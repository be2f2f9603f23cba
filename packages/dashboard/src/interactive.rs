//! Interactive launcher for the dashboard server.
//!
//! Prompts for the listen address, pre-filled from the environment, and
//! warns when no TomTom API key is configured before starting.

use dialoguer::{Confirm, Input};
use traffic_map_incident::service::tomtom_service;

use crate::ServerConfig;

/// Prompts for a [`ServerConfig`] and starts the server.
///
/// # Errors
///
/// Returns an `std::io::Result` error if a prompt fails or the server
/// fails to start.
pub async fn run() -> std::io::Result<()> {
    println!("Traffic Incident Dashboard");
    println!();

    let key_env = tomtom_service().api_key_env;
    if std::env::var(&key_env).is_err() {
        println!("Note: {key_env} is not set; incident requests will be rejected.");
        println!();
    }

    let defaults = ServerConfig::from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr)
        .interact_text()
        .map_err(std::io::Error::other)?;

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .map_err(std::io::Error::other)?;

    if !Confirm::new()
        .with_prompt(format!("Start dashboard on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .map_err(std::io::Error::other)?
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(ServerConfig { bind_addr, port }).await
}
