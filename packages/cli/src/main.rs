#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the traffic incident dashboard.
//!
//! `fetch` runs the same pipeline as the dashboard button and prints the
//! result to the terminal, `serve` starts the web dashboard, and running
//! with no subcommand asks which of the two to do.
//!
//! Uses `indicatif-log-bridge` (via [`traffic_map_cli_utils::init_logger`])
//! so that log lines and spinners never fight for the terminal.

mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use traffic_map_cli_utils::MultiProgress;
use traffic_map_dashboard::{ServerConfig, Services, export, pipeline};
use traffic_map_dashboard_models::{
    DEFAULT_END_LOCATION, DEFAULT_START_LOCATION, FetchRequest, StatisticKind, TimePeriod,
};

#[derive(Parser)]
#[command(name = "traffic_map_cli", about = "Traffic incident fetcher")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch incidents between two places and print them
    Fetch {
        /// Start location (city name)
        #[arg(long, default_value = DEFAULT_START_LOCATION)]
        start: String,

        /// End location (city name)
        #[arg(long, default_value = DEFAULT_END_LOCATION)]
        end: String,

        /// Simulated statistic to chart
        #[arg(long, default_value_t = StatisticKind::default())]
        statistic: StatisticKind,

        /// Period label for the chart
        #[arg(long, default_value_t = TimePeriod::default())]
        period: TimePeriod,

        /// Also write the cleaned incidents to this `GeoJSON` file
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// Start the web dashboard
    Serve,
}

/// Top-level choice when no subcommand is given.
enum Tool {
    Fetch,
    Serve,
}

impl Tool {
    const ALL: &[Self] = &[Self::Fetch, Self::Serve];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Fetch => "Fetch incidents",
            Self::Serve => "Start dashboard server",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = traffic_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Fetch {
            start,
            end,
            statistic,
            period,
            geojson,
        }) => {
            let request = FetchRequest {
                start_location: start,
                end_location: end,
                statistic,
                period,
            };
            run_fetch(&multi, &request, geojson.as_deref()).await?;
        }
        Some(Commands::Serve) => serve(false).await?,
        None => interactive(&multi).await?,
    }

    Ok(())
}

async fn interactive(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Traffic Incident Data Fetcher");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Fetch => {
            let request = prompt_request()?;
            let geojson: String = Input::new()
                .with_prompt("Write GeoJSON to (leave empty to skip)")
                .allow_empty(true)
                .interact_text()?;
            let geojson = (!geojson.trim().is_empty()).then(|| PathBuf::from(geojson.trim()));

            run_fetch(multi, &request, geojson.as_deref()).await?;
        }
        Tool::Serve => serve(true).await?,
    }

    Ok(())
}

fn prompt_request() -> Result<FetchRequest, dialoguer::Error> {
    let start_location: String = Input::new()
        .with_prompt("Start Location (City Name)")
        .default(DEFAULT_START_LOCATION.to_string())
        .interact_text()?;

    let end_location: String = Input::new()
        .with_prompt("End Location (City Name)")
        .default(DEFAULT_END_LOCATION.to_string())
        .interact_text()?;

    let statistics = StatisticKind::all();
    let idx = Select::new()
        .with_prompt("Select Statistic")
        .items(statistics)
        .default(0)
        .interact()?;
    let statistic = statistics[idx];

    let periods = TimePeriod::all();
    let idx = Select::new()
        .with_prompt("Select Time Period")
        .items(periods)
        .default(0)
        .interact()?;
    let period = periods[idx];

    Ok(FetchRequest {
        start_location,
        end_location,
        statistic,
        period,
    })
}

async fn run_fetch(
    multi: &MultiProgress,
    request: &FetchRequest,
    geojson: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let services = Services::from_env()?;

    let spinner = traffic_map_cli_utils::spinner(
        multi,
        &format!(
            "Fetching incidents between {} and {}",
            request.start_location, request.end_location
        ),
    );
    let mut rng = rand::rng();
    let outcome = pipeline::run_fetch(&services, request, &mut rng).await;
    spinner.finish_and_clear();

    for notice in &outcome.notices {
        println!("{}", render::notice(notice));
    }

    let Some(state) = outcome.state else {
        log::warn!("Fetch did not complete; nothing to show");
        return Ok(());
    };

    println!();
    print!("{}", render::state(&state));

    if let Some(path) = geojson {
        let incidents = state.incidents.as_deref().unwrap_or_default();
        export::write_geojson(path, incidents)?;
        println!("Wrote {} incidents to {}", incidents.len(), path.display());
    }

    Ok(())
}

async fn serve(prompt: bool) -> Result<(), Box<dyn std::error::Error>> {
    // The server uses actix-web's runtime, so we need to run it
    // in a blocking task to avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if prompt {
                traffic_map_dashboard::interactive::run().await
            } else {
                traffic_map_dashboard::run_server(ServerConfig::from_env()).await
            }
        })
    })
    .await??;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_defaults() {
        let cli = Cli::try_parse_from(["traffic_map_cli", "fetch"]).unwrap();
        let Some(Commands::Fetch {
            start,
            end,
            statistic,
            period,
            geojson,
        }) = cli.command
        else {
            panic!("expected fetch");
        };

        assert_eq!(start, "Birmingham");
        assert_eq!(end, "Coventry");
        assert_eq!(statistic, StatisticKind::AverageAccidentRate);
        assert_eq!(period, TimePeriod::LastHour);
        assert!(geojson.is_none());
    }

    #[test]
    fn fetch_parses_labels() {
        let cli = Cli::try_parse_from([
            "traffic_map_cli",
            "fetch",
            "--start",
            "Leeds",
            "--statistic",
            "Average Traffic Severity",
            "--period",
            "Last 24 hours",
            "--geojson",
            "out.geojson",
        ])
        .unwrap();
        let Some(Commands::Fetch {
            start,
            statistic,
            period,
            geojson,
            ..
        }) = cli.command
        else {
            panic!("expected fetch");
        };

        assert_eq!(start, "Leeds");
        assert_eq!(statistic, StatisticKind::AverageTrafficSeverity);
        assert_eq!(period, TimePeriod::LastDay);
        assert_eq!(geojson, Some(PathBuf::from("out.geojson")));
    }

    #[test]
    fn rejects_unknown_statistic() {
        assert!(
            Cli::try_parse_from(["traffic_map_cli", "fetch", "--statistic", "Median"]).is_err()
        );
    }

    #[test]
    fn no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["traffic_map_cli"]).unwrap();
        assert!(cli.command.is_none());
    }
}
