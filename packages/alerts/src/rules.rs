//! Compile-time registry of per-state road alert rules.
//!
//! Each state with road alerts has a TOML file under `rules/` giving its
//! latitude band thresholds, the minimum risk for a cell to count, and the
//! ordered list of hazard/band rules. The registry embeds these at compile
//! time and exposes them via [`all_rule_sets`] and [`rule_set_for_state`].

use std::sync::LazyLock;

use hazard_map_risk_models::HazardType;
use serde::Deserialize;
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

/// Errors raised while loading a rule table.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The TOML document could not be parsed.
    #[error("Failed to parse alert rules: {0}")]
    Parse(#[from] toml::de::Error),

    /// The table parsed but is inconsistent.
    #[error("Invalid alert rules for '{state}': {message}")]
    Invalid {
        /// State the rule set belongs to.
        state: String,
        /// Description of the problem.
        message: String,
    },
}

/// Latitude band a cell falls into, judged by its southern edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Band {
    /// `min_lat > north_above`.
    North,
    /// `south_below <= min_lat <= north_above`.
    Central,
    /// `min_lat < south_below`.
    South,
}

/// One "hazard in band -> alert on road" rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlertRule {
    /// Hazard mode this rule applies to.
    pub hazard: HazardType,
    /// Band whose cells trigger the rule.
    pub band: Band,
    /// Road or area named in the alert.
    pub road_label: String,
    /// Message template; `{count}`, `{severity}` and `{road}` are filled in.
    pub message: String,
    /// Recommendation template, same placeholders as `message`.
    pub recommendation: String,
}

/// Thresholds and rules for one state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BandRules {
    /// Catalog id of the state (e.g. `"manipur"`).
    pub state: String,
    /// Cells below this risk percentage are ignored.
    pub min_risk: u8,
    /// Southern edges strictly above this latitude are `North`.
    pub north_above: f64,
    /// Southern edges strictly below this latitude are `South`.
    pub south_below: f64,
    /// Rules in emission order.
    pub rules: Vec<AlertRule>,
}

impl BandRules {
    /// Parses and validates a rule table.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if the TOML is malformed, the thresholds are
    /// inverted, `min_risk` exceeds 100, or a hazard/band pair repeats.
    pub fn from_toml(source: &str) -> Result<Self, RuleError> {
        let rules: Self = toml::de::from_str(source)?;
        rules.validate()?;
        Ok(rules)
    }

    fn validate(&self) -> Result<(), RuleError> {
        let invalid = |message: String| RuleError::Invalid {
            state: self.state.clone(),
            message,
        };

        if self.south_below.is_nan()
            || self.north_above.is_nan()
            || self.south_below > self.north_above
        {
            return Err(invalid(format!(
                "south_below ({}) must not exceed north_above ({})",
                self.south_below, self.north_above
            )));
        }
        if self.min_risk > 100 {
            return Err(invalid(format!("min_risk {} exceeds 100", self.min_risk)));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if self.rules[..i]
                .iter()
                .any(|r| r.hazard == rule.hazard && r.band == rule.band)
            {
                return Err(invalid(format!(
                    "duplicate rule for {} in {} band",
                    rule.hazard, rule.band
                )));
            }
        }
        Ok(())
    }

    /// Classifies a southern edge into a band.
    #[must_use]
    pub fn band_of(&self, min_lat: f64) -> Band {
        if min_lat > self.north_above {
            Band::North
        } else if min_lat < self.south_below {
            Band::South
        } else {
            Band::Central
        }
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const RULE_TOMLS: &[(&str, &str)] = &[("manipur", include_str!("../rules/manipur.toml"))];

#[cfg(test)]
const EXPECTED_RULE_SET_COUNT: usize = 1;

static RULE_SETS: LazyLock<Vec<BandRules>> = LazyLock::new(|| {
    RULE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            BandRules::from_toml(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse alert rules '{name}': {e}"))
        })
        .collect()
});

/// Returns every embedded rule set, parsed once on first use.
///
/// # Panics
///
/// Panics if any embedded TOML file is malformed. These are compile-time
/// constants, so a failure indicates a development error caught by tests.
#[must_use]
pub fn all_rule_sets() -> &'static [BandRules] {
    &RULE_SETS
}

/// Returns the rule set for `state`, if one is configured.
#[must_use]
pub fn rule_set_for_state(state: &str) -> Option<&'static BandRules> {
    all_rule_sets()
        .iter()
        .find(|r| r.state.eq_ignore_ascii_case(state.trim()))
}
