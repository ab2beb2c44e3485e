#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the hazard map dashboard.
//!
//! With a subcommand, runs one non-interactive operation (list regions, or
//! fetch and print a district). Without one, starts a `dialoguer` menu
//! session backed by the dashboard runtime.
//!
//! Uses `indicatif-log-bridge` (via [`progress::init_logger`]) so that log
//! lines and the fetch spinner never fight for the terminal.

mod interactive;
mod progress;
mod render;

use std::str::FromStr;

use clap::{Parser, Subcommand};
use hazard_map_dashboard::Dashboard;
use hazard_map_gateway::{GatewayConfig, HttpRiskGateway};
use hazard_map_geography::catalog;
use hazard_map_risk_models::HazardType;

#[derive(Debug, Parser)]
#[command(name = "hazard_map", about = "Landslide and flood risk dashboard")]
struct Cli {
    /// Risk data API base URL (overrides `HAZARD_MAP_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List catalog regions
    Regions {
        /// Only list the direct children of this region (e.g. "manipur")
        #[arg(long)]
        parent: Option<String>,
    },
    /// Fetch risk data for a district and print cells, counts, and alerts
    Show {
        /// Country name or id
        #[arg(long, default_value = "india")]
        country: String,
        /// State name or id
        #[arg(long, default_value = "manipur")]
        state: String,
        /// District name or id (e.g. "Imphal West")
        #[arg(long)]
        district: String,
        /// Hazard mode: landslide or flood
        #[arg(long, default_value = "landslide", value_parser = parse_hazard)]
        hazard: HazardType,
        /// Print the dashboard snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = progress::init_logger();
    let cli = Cli::parse();
    let catalog = catalog();

    let Some(command) = cli.command else {
        let gateway = HttpRiskGateway::new(gateway_config(cli.api_url.as_deref())?)?;
        return interactive::run(&multi, catalog, gateway).await;
    };

    match command {
        Commands::Regions { parent } => {
            let regions = match parent.as_deref() {
                Some(key) => {
                    let Some(parent) = catalog.lookup(key) else {
                        return Err(format!("Unknown region '{key}'").into());
                    };
                    catalog.children(&parent.id)
                }
                None => catalog.regions().iter().collect(),
            };
            render::print_regions(&regions);
        }
        Commands::Show {
            country,
            state,
            district,
            hazard,
            json,
        } => {
            let gateway = HttpRiskGateway::new(gateway_config(cli.api_url.as_deref())?)?;
            let mut dashboard = Dashboard::new(catalog);

            if !dashboard.select_country(Some(&country)) {
                return Err(format!("Unknown country '{country}'").into());
            }
            if !dashboard.select_state(Some(&state)) {
                return Err(format!("Unknown state '{state}' in {country}").into());
            }
            let Some(ticket) = dashboard.select_district(Some(&district)) else {
                return Err(format!("Unknown district '{district}' in {state}").into());
            };
            dashboard.set_hazard_mode(hazard);

            let spinner = progress::fetch_spinner(&multi, &ticket.district_name);
            dashboard.load(&gateway, &ticket).await;
            spinner.finish_and_clear();

            let snapshot = dashboard.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                render::print_snapshot(&snapshot, catalog);
            }
            if let Some(error) = snapshot.error {
                return Err(error.into());
            }
        }
    }

    Ok(())
}

fn parse_hazard(value: &str) -> Result<HazardType, String> {
    HazardType::from_str(value.trim())
        .map_err(|_| format!("unknown hazard '{value}' (expected landslide or flood)"))
}

/// Environment configuration with the `--api-url` flag taking precedence.
fn gateway_config(api_url: Option<&str>) -> Result<GatewayConfig, hazard_map_gateway::ConfigError> {
    GatewayConfig::from_lookup(|key| match (key, api_url) {
        ("HAZARD_MAP_API_URL", Some(url)) => Some(url.to_string()),
        _ => std::env::var(key).ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_hazard(args: &[&str]) -> HazardType {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Some(Commands::Show { hazard, .. }) => hazard,
            other => panic!("expected show command, got {other:?}"),
        }
    }

    #[test]
    fn hazard_flag_parses_case_insensitively() {
        for (value, expected) in [
            ("flood", HazardType::Flood),
            ("Flood", HazardType::Flood),
            ("Landslide", HazardType::Landslide),
        ] {
            let args = ["hazard_map", "show", "--district", "Imphal West", "--hazard", value];
            assert_eq!(show_hazard(&args), expected);
        }
    }

    #[test]
    fn hazard_defaults_to_landslide() {
        let hazard = show_hazard(&["hazard_map", "show", "--district", "Chandel"]);
        assert_eq!(hazard, HazardType::Landslide);
    }

    #[test]
    fn unknown_hazard_is_rejected() {
        let err = Cli::try_parse_from([
            "hazard_map",
            "show",
            "--district",
            "Chandel",
            "--hazard",
            "earthquake",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("unknown hazard 'earthquake'"));
    }
}
