//! Plain-text rendering of catalog entries and dashboard snapshots.

use hazard_map_dashboard::DashboardSnapshot;
use hazard_map_geography::GeoCatalog;
use hazard_map_geography_models::GeographicRegion;

/// Prints `regions` as an id/level/name table.
pub fn print_regions(regions: &[&GeographicRegion]) {
    println!("{:<16} {:<9} {:<18} CENTER", "ID", "LEVEL", "NAME");
    println!("{}", "-".repeat(64));
    for region in regions {
        println!(
            "{:<16} {:<9} {:<18} {:.2}, {:.2} (z{})",
            region.id,
            region.level,
            region.name,
            region.center.latitude,
            region.center.longitude,
            region.zoom
        );
    }
}

/// Human-readable navigation path, e.g. `India > Manipur > Imphal West`.
#[must_use]
pub fn breadcrumb(snapshot: &DashboardSnapshot, catalog: &GeoCatalog) -> String {
    let path: Vec<&str> = [
        snapshot.selection.country(),
        snapshot.selection.state(),
        snapshot.selection.district(),
    ]
    .into_iter()
    .flatten()
    .map(|id| catalog.lookup(id).map_or(id, |r| r.name.as_str()))
    .collect();

    if path.is_empty() {
        catalog.world().name.clone()
    } else {
        path.join(" > ")
    }
}

/// Prints the full dashboard state.
pub fn print_snapshot(snapshot: &DashboardSnapshot, catalog: &GeoCatalog) {
    println!();
    println!("Location:  {}", breadcrumb(snapshot, catalog));
    println!("Hazard:    {}", snapshot.hazard_mode.label());
    println!(
        "View:      {:.4}, {:.4} (zoom {})",
        snapshot.view.center.latitude, snapshot.view.center.longitude, snapshot.view.zoom
    );
    if let Some(updated) = snapshot.last_updated {
        println!("Updated:   {}", updated.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if snapshot.loading {
        println!("Loading...");
    }
    if let Some(error) = &snapshot.error {
        println!("Error:     {error}");
    }

    if snapshot.selection.district().is_none() {
        return;
    }

    let counts = &snapshot.counts;
    println!(
        "Cells:     {} total ({} high, {} moderate, {} low)",
        counts.total, counts.high, counts.moderate, counts.low
    );

    if !snapshot.cells.is_empty() {
        println!();
        println!("{:<10} {:<9} {:<34} UPDATED", "LEVEL", "RISK", "BOUNDS");
        println!("{}", "-".repeat(76));
        for cell in &snapshot.cells {
            let b = cell.bounds();
            println!(
                "{:<10} {:<9} {:<34} {}",
                cell.level(),
                format!("{}%", cell.risk_percentage()),
                format!(
                    "{:.3},{:.3} .. {:.3},{:.3}",
                    b.min_lat(),
                    b.min_lon(),
                    b.max_lat(),
                    b.max_lon()
                ),
                cell.updated_at().format("%Y-%m-%d %H:%M")
            );
        }
    }

    println!();
    if snapshot.alerts.is_empty() {
        println!("No road alerts.");
        return;
    }
    println!("Road alerts:");
    for alert in &snapshot.alerts {
        println!(
            "  [{}] {} ({}%, {} cells)",
            alert.level(),
            alert.road_label,
            alert.severity,
            alert.contributing_cells.len()
        );
        println!("      {}", alert.message);
        println!("      -> {}", alert.recommendation);
    }
}
