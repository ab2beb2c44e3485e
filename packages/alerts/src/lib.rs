#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Road alert synthesis for the hazard map.
//!
//! Turns the risk cells shown for the active hazard mode into a short,
//! ordered list of [`RoadAlert`] advisories. The only strategy today is the
//! [`LatitudeBandStrategy`] heuristic; true road-network intersection would
//! plug in behind the same [`AlertStrategy`] trait.
//!
//! Thresholds and road labels are per-state data loaded from the
//! [`rules`] registry. States without a rule set produce no alerts.

pub mod latitude;
pub mod rules;

use std::sync::Arc;

use hazard_map_risk_models::{HazardType, RiskCell, RoadAlert};

pub use latitude::LatitudeBandStrategy;
pub use rules::{AlertRule, Band, BandRules, RuleError};

/// Produces road alerts from risk cells.
///
/// Implementations must be deterministic: identical inputs give identical
/// output.
pub trait AlertStrategy: Send + Sync {
    /// Synthesizes alerts for `hazard` from `cells`.
    fn synthesize(&self, cells: &[RiskCell], hazard: HazardType) -> Vec<RoadAlert>;
}

/// Strategy for regions without alert rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlerts;

impl AlertStrategy for NoAlerts {
    fn synthesize(&self, _cells: &[RiskCell], _hazard: HazardType) -> Vec<RoadAlert> {
        Vec::new()
    }
}

/// Cheaply cloneable handle around the active [`AlertStrategy`].
#[derive(Clone)]
pub struct AlertSynthesizer {
    strategy: Arc<dyn AlertStrategy>,
}

impl std::fmt::Debug for AlertSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertSynthesizer").finish_non_exhaustive()
    }
}

impl Default for AlertSynthesizer {
    fn default() -> Self {
        Self::new(NoAlerts)
    }
}

impl AlertSynthesizer {
    /// Wraps a strategy.
    #[must_use]
    pub fn new(strategy: impl AlertStrategy + 'static) -> Self {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    /// Builds the synthesizer configured for `state`, falling back to
    /// [`NoAlerts`] when the state has no rule set.
    #[must_use]
    pub fn for_state(state: &str) -> Self {
        rules::rule_set_for_state(state).map_or_else(
            || {
                log::debug!("No road alert rules for state '{state}'");
                Self::default()
            },
            |rules| Self::new(LatitudeBandStrategy::new(rules.clone())),
        )
    }

    /// Synthesizes alerts for `hazard` from `cells`.
    #[must_use]
    pub fn synthesize(&self, cells: &[RiskCell], hazard: HazardType) -> Vec<RoadAlert> {
        self.strategy.synthesize(cells, hazard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use hazard_map_risk_models::CellBounds;

    fn cell(min_lat: f64, pct: u8) -> RiskCell {
        let bounds = CellBounds::new(min_lat, 93.91, min_lat + 0.05, 93.96).unwrap();
        RiskCell::new(bounds, HazardType::Landslide, pct, DateTime::<Utc>::UNIX_EPOCH).unwrap()
    }

    #[test]
    fn configured_state_uses_latitude_bands() {
        let synth = AlertSynthesizer::for_state("manipur");
        let alerts = synth.synthesize(&[cell(24.78, 72)], HazardType::Landslide);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "landslide-central");
    }

    #[test]
    fn unconfigured_state_yields_no_alerts() {
        let synth = AlertSynthesizer::for_state("nagaland");
        assert!(
            synth
                .synthesize(&[cell(24.78, 95)], HazardType::Landslide)
                .is_empty()
        );
    }

    #[test]
    fn custom_strategies_plug_in() {
        struct Echo;
        impl AlertStrategy for Echo {
            fn synthesize(&self, cells: &[RiskCell], _hazard: HazardType) -> Vec<RoadAlert> {
                cells
                    .iter()
                    .map(|c| RoadAlert {
                        id: "echo".to_string(),
                        road_label: "test".to_string(),
                        severity: c.risk_percentage(),
                        contributing_cells: vec![c.clone()],
                        message: String::new(),
                        recommendation: String::new(),
                    })
                    .collect()
            }
        }

        let synth = AlertSynthesizer::new(Echo);
        let alerts = synth.synthesize(&[cell(24.0, 5)], HazardType::Flood);
        assert_eq!(alerts[0].severity, 5);
    }
}
