#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard state for the hazard map.
//!
//! [`Dashboard`] coordinates hierarchical navigation, district risk
//! fetches, hazard-mode filtering, road alert synthesis, and map focus.
//! [`DashboardRuntime`] drives it from a tokio task for front ends that
//! issue events concurrently with in-flight fetches.

pub mod orchestrator;
pub mod runtime;
pub mod store;
pub mod view;

#[cfg(test)]
mod testing;

use chrono::{DateTime, Utc};
use hazard_map_geography_models::{NavigationSelection, ViewState};
use hazard_map_risk_models::{HazardType, RiskCell, RiskCounts, RoadAlert};
use serde::Serialize;

pub use orchestrator::{Dashboard, FetchTicket};
pub use runtime::{DashboardEvent, DashboardHandle, DashboardRuntime, RuntimeError};
pub use store::RiskCellStore;
pub use view::{Easing, Transition, ViewStateController};

/// Everything the presentation layer renders, as of one processed event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Current navigation path.
    pub selection: NavigationSelection,
    /// Active hazard filter.
    pub hazard_mode: HazardType,
    /// Whether a district fetch is in flight.
    pub loading: bool,
    /// User-facing message from the last failed fetch.
    pub error: Option<String>,
    /// Cells of the active hazard, in payload order.
    pub cells: Vec<RiskCell>,
    /// Road alerts for the active hazard.
    pub alerts: Vec<RoadAlert>,
    /// Risk level breakdown of `cells`.
    pub counts: RiskCounts,
    /// Map focus.
    pub view: ViewState,
    /// The move that produced `view`, for animation.
    pub transition: Option<Transition>,
    /// When the current cells were applied.
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazard_map_geography::catalog;

    #[test]
    fn snapshot_serializes_camel_case() {
        let mut dash = Dashboard::new(catalog());
        dash.select_country(Some("india"));
        let json = serde_json::to_value(dash.snapshot()).unwrap();

        assert_eq!(json["hazardMode"], "landslide");
        assert_eq!(json["loading"], false);
        assert!(json["lastUpdated"].is_null());
        assert_eq!(json["view"]["zoom"], 5);
        assert_eq!(json["transition"]["durationMs"], 1500);
        assert_eq!(json["counts"]["total"], 0);
    }
}
