//! Menu-driven dashboard session.
//!
//! Drives a [`DashboardRuntime`] with `dialoguer` prompts: walk the
//! country/state/district hierarchy, toggle the hazard mode, focus road
//! alerts, and print the current snapshot after each step.

use std::sync::Arc;

use dialoguer::Select;
use hazard_map_dashboard::{
    Dashboard, DashboardEvent, DashboardHandle, DashboardRuntime, DashboardSnapshot,
};
use hazard_map_gateway::HttpRiskGateway;
use hazard_map_geography::GeoCatalog;
use hazard_map_geography_models::{GeographicRegion, RegionLevel};
use hazard_map_risk_models::HazardType;
use indicatif::MultiProgress;

use crate::progress::fetch_spinner;
use crate::render::{breadcrumb, print_snapshot};

/// Top-level actions available in the dashboard menu.
enum DashboardAction {
    ChooseCountry,
    ChooseState,
    ChooseDistrict,
    ToggleHazard,
    FocusAlert,
    ShowSnapshot,
    Quit,
}

impl DashboardAction {
    const ALL: &[Self] = &[
        Self::ChooseCountry,
        Self::ChooseState,
        Self::ChooseDistrict,
        Self::ToggleHazard,
        Self::FocusAlert,
        Self::ShowSnapshot,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ChooseCountry => "Choose country",
            Self::ChooseState => "Choose state",
            Self::ChooseDistrict => "Choose district (fetch risk data)",
            Self::ToggleHazard => "Toggle hazard mode",
            Self::FocusAlert => "Focus a road alert",
            Self::ShowSnapshot => "Show dashboard",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails or the dashboard runtime stops
/// unexpectedly. Fetch failures are shown in the dashboard, not returned.
#[allow(clippy::too_many_lines, clippy::future_not_send)]
pub async fn run(
    multi: &MultiProgress,
    catalog: &'static GeoCatalog,
    gateway: HttpRiskGateway,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Hazard Map");
    println!("Risk endpoint: {}", gateway.config().endpoint);

    let (handle, task) = DashboardRuntime::spawn(Dashboard::new(catalog), Arc::new(gateway));

    let labels: Vec<&str> = DashboardAction::ALL
        .iter()
        .map(DashboardAction::label)
        .collect();

    loop {
        let snapshot = handle.snapshot();
        println!();
        println!(
            "[{}] {} mode",
            breadcrumb(&snapshot, catalog),
            snapshot.hazard_mode.label()
        );

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match DashboardAction::ALL[idx] {
            DashboardAction::ChooseCountry => {
                let countries = catalog.countries();
                if let Some(choice) = choose_region(RegionLevel::Country, &countries)? {
                    dispatch(&handle, DashboardEvent::SelectCountry(choice)).await?;
                }
            }
            DashboardAction::ChooseState => {
                let Some(country) = snapshot.selection.country() else {
                    println!("Choose a country first.");
                    continue;
                };
                let states = catalog.children(country);
                if let Some(choice) = choose_region(RegionLevel::State, &states)? {
                    dispatch(&handle, DashboardEvent::SelectState(choice)).await?;
                }
            }
            DashboardAction::ChooseDistrict => {
                let Some(state) = snapshot.selection.state() else {
                    println!("Choose a state first.");
                    continue;
                };
                let districts = catalog.children(state);
                if let Some(choice) = choose_region(RegionLevel::District, &districts)? {
                    let name = choice
                        .as_deref()
                        .and_then(|id| catalog.lookup(id))
                        .map(|r| r.name.clone());
                    let spinner = name.as_deref().map(|n| fetch_spinner(multi, n));
                    let snapshot =
                        dispatch(&handle, DashboardEvent::SelectDistrict(choice)).await?;
                    if let Some(spinner) = spinner {
                        spinner.finish_and_clear();
                    }
                    print_snapshot(&snapshot, catalog);
                }
            }
            DashboardAction::ToggleHazard => {
                let next = match snapshot.hazard_mode {
                    HazardType::Landslide => HazardType::Flood,
                    HazardType::Flood => HazardType::Landslide,
                };
                let snapshot = dispatch(&handle, DashboardEvent::SetHazardMode(next)).await?;
                print_snapshot(&snapshot, catalog);
            }
            DashboardAction::FocusAlert => {
                if snapshot.alerts.is_empty() {
                    println!("No road alerts to focus.");
                    continue;
                }
                let alert_labels: Vec<String> = snapshot
                    .alerts
                    .iter()
                    .map(|a| format!("{} ({}%)", a.road_label, a.severity))
                    .collect();
                let idx = Select::new()
                    .with_prompt("Alert")
                    .items(&alert_labels)
                    .default(0)
                    .interact()?;
                let id = snapshot.alerts[idx].id.clone();
                let snapshot = dispatch(&handle, DashboardEvent::FocusAlert(id)).await?;
                println!(
                    "Map focused on {:.4}, {:.4} (zoom {})",
                    snapshot.view.center.latitude,
                    snapshot.view.center.longitude,
                    snapshot.view.zoom
                );
            }
            DashboardAction::ShowSnapshot => print_snapshot(&snapshot, catalog),
            DashboardAction::Quit => break,
        }
    }

    drop(handle);
    task.await?;

    Ok(())
}

/// Prompts for a region at `level`, with a leading entry to clear it.
///
/// Returns `None` if there is nothing to choose from, `Some(None)` to
/// clear, and `Some(Some(id))` for a selection.
fn choose_region(
    level: RegionLevel,
    regions: &[&GeographicRegion],
) -> Result<Option<Option<String>>, dialoguer::Error> {
    if regions.is_empty() {
        println!("No {level} entries in the catalog.");
        return Ok(None);
    }

    let mut labels = vec![format!("(clear {level})")];
    labels.extend(regions.iter().map(|r| r.name.clone()));

    let idx = Select::new()
        .with_prompt(format!("Select {level}"))
        .items(&labels)
        .default(1)
        .max_length(20)
        .interact()?;

    Ok(Some(if idx == 0 {
        None
    } else {
        Some(regions[idx - 1].id.clone())
    }))
}

/// Sends `event` and waits until it has been processed and any fetch it
/// started has settled.
async fn dispatch(
    handle: &DashboardHandle,
    event: DashboardEvent,
) -> Result<DashboardSnapshot, Box<dyn std::error::Error>> {
    let mut rx = handle.subscribe();
    rx.mark_unchanged();
    handle.send(event)?;
    rx.changed().await?;
    let snapshot = rx.wait_for(|s| !s.loading).await?.clone();
    Ok(snapshot)
}
