//! Top-level dashboard coordinator.
//!
//! Wires navigation -> gateway fetch -> cell store -> alert synthesis ->
//! map view. Every mutation of the cell store or hazard mode re-runs the
//! same pipeline (filter, synthesize, count) so derived state is always
//! consistent with its inputs.
//!
//! District fetches are tracked with a generation counter. Each district
//! selection (or any navigation change that discards district data)
//! bumps the generation, and a fetch result is only applied if its
//! [`FetchTicket`] still matches: the most recent selection always wins.

use chrono::{DateTime, Utc};
use hazard_map_alerts::AlertSynthesizer;
use hazard_map_gateway::{GatewayError, RiskSource};
use hazard_map_geography::GeoCatalog;
use hazard_map_geography_models::{NavigationSelection, RegionLevel};
use hazard_map_risk_models::{HazardType, RiskCell, RiskCounts, RoadAlert};

use crate::DashboardSnapshot;
use crate::store::RiskCellStore;
use crate::view::ViewStateController;

/// Identifies one district fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Generation at the time the fetch was issued.
    pub generation: u64,
    /// Catalog id of the district.
    pub district_id: String,
    /// Display name sent to the gateway (e.g. `"Imphal West"`).
    pub district_name: String,
}

/// Dashboard state and the pipeline that keeps it consistent.
#[derive(Debug)]
pub struct Dashboard {
    catalog: &'static GeoCatalog,
    selection: NavigationSelection,
    hazard: HazardType,
    store: RiskCellStore,
    synthesizer: AlertSynthesizer,
    view: ViewStateController,
    filtered: Vec<RiskCell>,
    alerts: Vec<RoadAlert>,
    counts: RiskCounts,
    loading: bool,
    error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
    generation: u64,
    pending: Option<FetchTicket>,
}

impl Dashboard {
    /// Creates a dashboard focused on the world, in landslide mode.
    #[must_use]
    pub fn new(catalog: &'static GeoCatalog) -> Self {
        Self {
            catalog,
            selection: NavigationSelection::default(),
            hazard: HazardType::Landslide,
            store: RiskCellStore::default(),
            synthesizer: AlertSynthesizer::default(),
            view: ViewStateController::new(catalog.world()),
            filtered: Vec::new(),
            alerts: Vec::new(),
            counts: RiskCounts::default(),
            loading: false,
            error: None,
            last_updated: None,
            generation: 0,
            pending: None,
        }
    }

    /// Current navigation selection.
    #[must_use]
    pub const fn selection(&self) -> &NavigationSelection {
        &self.selection
    }

    /// Current hazard mode.
    #[must_use]
    pub const fn hazard_mode(&self) -> HazardType {
        self.hazard
    }

    /// Alerts for the current hazard mode.
    #[must_use]
    pub fn alerts(&self) -> &[RoadAlert] {
        &self.alerts
    }

    /// Whether a district fetch is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The fetch currently awaited, if any.
    #[must_use]
    pub const fn pending_fetch(&self) -> Option<&FetchTicket> {
        self.pending.as_ref()
    }

    /// Selects (or clears, with `None`) the country.
    ///
    /// Returns `false` without changing anything if `key` is not a country
    /// in the catalog.
    pub fn select_country(&mut self, key: Option<&str>) -> bool {
        let id = match key {
            Some(key) => {
                let Some(region) = self.catalog.lookup_at(key, RegionLevel::Country) else {
                    log::warn!("Ignoring unknown country '{key}'");
                    return false;
                };
                Some(region.id.clone())
            }
            None => None,
        };

        log::info!("Country selection -> {}", id.as_deref().unwrap_or("(none)"));
        self.selection.set_country(id);
        self.synthesizer = AlertSynthesizer::default();
        self.discard_district_data();
        self.view.focus_selection(&self.selection, self.catalog);
        true
    }

    /// Selects (or clears) the state within the selected country.
    ///
    /// Returns `false` without changing anything if no country is selected,
    /// or `key` is not a state of the selected country.
    pub fn select_state(&mut self, key: Option<&str>) -> bool {
        let id = match key {
            Some(key) => match self.child_of(key, RegionLevel::State, self.selection.country()) {
                Some(id) => Some(id),
                None => {
                    log::warn!("Ignoring state '{key}' outside the selected country");
                    return false;
                }
            },
            None => None,
        };

        if self.selection.set_state(id.clone()).is_err() {
            return false;
        }

        log::info!("State selection -> {}", id.as_deref().unwrap_or("(none)"));
        self.synthesizer = id
            .as_deref()
            .map_or_else(AlertSynthesizer::default, AlertSynthesizer::for_state);
        self.discard_district_data();
        self.view.focus_selection(&self.selection, self.catalog);
        true
    }

    /// Selects (or clears) the district within the selected state.
    ///
    /// Selecting a district discards any previous district data, marks the
    /// dashboard as loading, moves the view to the district immediately,
    /// and returns the [`FetchTicket`] the caller must resolve via
    /// [`Dashboard::apply_fetch`]. Re-selecting the same district issues a
    /// fresh ticket, which is how a failed fetch is retried.
    ///
    /// Returns `None` when clearing, or when `key` is not a district of the
    /// selected state (in which case nothing changes).
    pub fn select_district(&mut self, key: Option<&str>) -> Option<FetchTicket> {
        let Some(key) = key else {
            log::info!("District selection -> (none)");
            // Clearing an unset district is a valid no-op on the selection.
            self.selection.set_district(None).ok();
            self.discard_district_data();
            self.view.focus_selection(&self.selection, self.catalog);
            return None;
        };

        let Some(region) = self
            .catalog
            .lookup_at(key, RegionLevel::District)
            .filter(|r| r.parent.is_some() && r.parent.as_deref() == self.selection.state())
        else {
            log::warn!("Ignoring district '{key}' outside the selected state");
            return None;
        };

        if self.selection.set_district(Some(region.id.clone())).is_err() {
            return None;
        }

        self.discard_district_data();
        self.loading = true;

        let ticket = FetchTicket {
            generation: self.generation,
            district_id: region.id.clone(),
            district_name: region.name.clone(),
        };
        log::info!(
            "District selection -> {} (fetch #{})",
            ticket.district_id,
            ticket.generation
        );
        self.pending = Some(ticket.clone());
        self.view.focus_selection(&self.selection, self.catalog);
        Some(ticket)
    }

    /// Applies the outcome of a district fetch.
    ///
    /// Results for a ticket that is no longer current are discarded and
    /// `false` is returned; the visible state is untouched.
    pub fn apply_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<RiskCell>, GatewayError>,
    ) -> bool {
        if self.pending.as_ref() != Some(ticket) {
            log::warn!(
                "Discarding stale fetch #{} for {} (current generation {})",
                ticket.generation,
                ticket.district_id,
                self.generation
            );
            return false;
        }

        self.pending = None;
        self.loading = false;

        match result {
            Ok(cells) => {
                log::info!("Loaded {} risk cells for {}", cells.len(), ticket.district_id);
                self.store.set_cells(cells);
                self.error = None;
                self.last_updated = Some(Utc::now());
            }
            Err(e) => {
                log::error!("Risk fetch for {} failed: {e}", ticket.district_id);
                self.store.clear();
                self.error = Some(e.user_message());
            }
        }

        self.recompute();
        true
    }

    /// Issues the fetch for `ticket` against `source` and applies it.
    ///
    /// Returns whether the result was applied (see
    /// [`Dashboard::apply_fetch`]).
    pub async fn load(&mut self, source: &dyn RiskSource, ticket: &FetchTicket) -> bool {
        let result = source.fetch_risk_cells(&ticket.district_name).await;
        self.apply_fetch(ticket, result)
    }

    /// Switches the hazard mode and re-derives cells, alerts, and counts.
    pub fn set_hazard_mode(&mut self, hazard: HazardType) {
        if self.hazard != hazard {
            log::info!("Hazard mode -> {hazard}");
        }
        self.hazard = hazard;
        self.recompute();
    }

    /// Focuses the map on the alert with `alert_id`.
    ///
    /// Returns `false` if no current alert has that id. The navigation
    /// selection is never changed.
    pub fn focus_alert(&mut self, alert_id: &str) -> bool {
        let Some(alert) = self.alerts.iter().find(|a| a.id == alert_id) else {
            log::debug!("No alert '{alert_id}' to focus");
            return false;
        };
        self.view.focus_alert(alert)
    }

    /// Read-only copy of everything the presentation layer needs.
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            selection: self.selection.clone(),
            hazard_mode: self.hazard,
            loading: self.loading,
            error: self.error.clone(),
            cells: self.filtered.clone(),
            alerts: self.alerts.clone(),
            counts: self.counts,
            view: self.view.view(),
            transition: self.view.last_transition(),
            last_updated: self.last_updated,
        }
    }

    fn child_of(&self, key: &str, level: RegionLevel, parent: Option<&str>) -> Option<String> {
        let parent = parent?;
        self.catalog
            .lookup_at(key, level)
            .filter(|r| r.parent.as_deref() == Some(parent))
            .map(|r| r.id.clone())
    }

    /// Drops every district-derived value and invalidates outstanding
    /// fetches.
    fn discard_district_data(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.loading = false;
        self.error = None;
        self.last_updated = None;
        self.store.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered = self.store.filter_by_hazard(self.hazard);
        self.alerts = self.synthesizer.synthesize(&self.filtered, self.hazard);
        self.counts = RiskCounts::from_cells(&self.filtered);
    }
}
