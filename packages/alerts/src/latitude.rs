//! Latitude-band road alert heuristic.
//!
//! An approximation standing in for real road/rectangle intersection:
//! cells at or above the minimum risk are bucketed into north/central/south
//! bands by their southern edge, and each configured hazard/band rule whose
//! band is non-empty emits one alert. Alerts come out in rule order, not
//! severity order.

use hazard_map_risk_models::{HazardType, RiskCell, RoadAlert};

use crate::AlertStrategy;
use crate::rules::{AlertRule, BandRules};

/// [`AlertStrategy`] that clusters cells into fixed latitude bands.
#[derive(Debug, Clone)]
pub struct LatitudeBandStrategy {
    rules: BandRules,
}

impl LatitudeBandStrategy {
    /// Creates a strategy from a state's rule set.
    #[must_use]
    pub const fn new(rules: BandRules) -> Self {
        Self { rules }
    }

    fn build_alert(rule: &AlertRule, cells: Vec<RiskCell>) -> Option<RoadAlert> {
        let severity = cells.iter().map(RiskCell::risk_percentage).max()?;
        let count = cells.len();

        Some(RoadAlert {
            id: format!("{}-{}", rule.hazard, rule.band),
            road_label: rule.road_label.clone(),
            severity,
            message: render(&rule.message, &rule.road_label, count, severity),
            recommendation: render(&rule.recommendation, &rule.road_label, count, severity),
            contributing_cells: cells,
        })
    }
}

impl AlertStrategy for LatitudeBandStrategy {
    fn synthesize(&self, cells: &[RiskCell], hazard: HazardType) -> Vec<RoadAlert> {
        let eligible: Vec<&RiskCell> = cells
            .iter()
            .filter(|c| c.hazard_type() == hazard && c.risk_percentage() >= self.rules.min_risk)
            .collect();

        if eligible.is_empty() {
            return Vec::new();
        }

        let alerts: Vec<RoadAlert> = self
            .rules
            .rules
            .iter()
            .filter(|rule| rule.hazard == hazard)
            .filter_map(|rule| {
                let band_cells: Vec<RiskCell> = eligible
                    .iter()
                    .filter(|c| self.rules.band_of(c.bounds().min_lat()) == rule.band)
                    .map(|&c| c.clone())
                    .collect();
                log::debug!(
                    "{} band has {} eligible {hazard} cells",
                    rule.band,
                    band_cells.len()
                );
                Self::build_alert(rule, band_cells)
            })
            .collect();

        log::debug!(
            "Synthesized {} {hazard} alerts from {} eligible cells",
            alerts.len(),
            eligible.len()
        );
        alerts
    }
}

fn render(template: &str, road: &str, count: usize, severity: u8) -> String {
    template
        .replace("{count}", &count.to_string())
        .replace("{severity}", &severity.to_string())
        .replace("{road}", road)
}
