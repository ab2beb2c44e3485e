#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Hazard taxonomy, risk cell, and road alert types.
//!
//! This crate defines the canonical hazard types and the validated
//! [`RiskCell`] every gateway response is normalized into, along with the
//! derived [`RoadAlert`] advisories and the [`RiskLevel`] banding shared by
//! the dashboard and its presentation layer.

use chrono::{DateTime, Utc};
use hazard_map_geography_models::LatLon;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Risk percentage below which a cell is [`RiskLevel::Low`].
pub const MODERATE_THRESHOLD: u8 = 30;

/// Risk percentage at or above which a cell is [`RiskLevel::High`].
pub const HIGH_THRESHOLD: u8 = 60;

/// Natural hazard a risk cell describes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HazardType {
    /// Slope failure / landslide.
    Landslide,
    /// Riverine or waterlogging flood.
    Flood,
}

impl HazardType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Landslide, Self::Flood]
    }

    /// Human-readable label (e.g. `"Landslide"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Landslide => "Landslide",
            Self::Flood => "Flood",
        }
    }
}

/// Three-way banding of a risk percentage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Below 30%.
    Low,
    /// 30% up to (not including) 60%.
    Moderate,
    /// 60% and above.
    High,
}

impl RiskLevel {
    /// Classifies a risk percentage. Values above 100 are treated as 100.
    #[must_use]
    pub const fn from_percentage(percentage: u8) -> Self {
        if percentage < MODERATE_THRESHOLD {
            Self::Low
        } else if percentage < HIGH_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Display color for map rendering, as a CSS hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#22c55e",
            Self::Moderate => "#f59e0b",
            Self::High => "#ef4444",
        }
    }
}

/// Error returned when raw values cannot form a valid [`RiskCell`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidCellError {
    /// `min_lat >= max_lat` or `min_lon >= max_lon`, or a non-finite value.
    Bounds {
        /// Southern edge.
        min_lat: f64,
        /// Western edge.
        min_lon: f64,
        /// Northern edge.
        max_lat: f64,
        /// Eastern edge.
        max_lon: f64,
    },
    /// Risk percentage above 100.
    Percentage {
        /// The out-of-range value.
        value: u8,
    },
}

impl std::fmt::Display for InvalidCellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bounds {
                min_lat,
                min_lon,
                max_lat,
                max_lon,
            } => write!(
                f,
                "invalid bounds ({min_lat}, {min_lon}) -> ({max_lat}, {max_lon}): \
                 min must be strictly less than max"
            ),
            Self::Percentage { value } => {
                write!(f, "invalid risk percentage {value}: expected 0-100")
            }
        }
    }
}

impl std::error::Error for InvalidCellError {}

/// A lat/lon rectangle. Always satisfies `min < max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellBounds {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl CellBounds {
    /// Creates a bounds rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCellError::Bounds`] unless every value is finite and
    /// each minimum is strictly below its maximum.
    pub fn new(
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    ) -> Result<Self, InvalidCellError> {
        let finite = [min_lat, min_lon, max_lat, max_lon]
            .iter()
            .all(|v| v.is_finite());
        if !finite || min_lat >= max_lat || min_lon >= max_lon {
            return Err(InvalidCellError::Bounds {
                min_lat,
                min_lon,
                max_lat,
                max_lon,
            });
        }
        Ok(Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })
    }

    /// Southern edge.
    #[must_use]
    pub const fn min_lat(&self) -> f64 {
        self.min_lat
    }

    /// Western edge.
    #[must_use]
    pub const fn min_lon(&self) -> f64 {
        self.min_lon
    }

    /// Northern edge.
    #[must_use]
    pub const fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Eastern edge.
    #[must_use]
    pub const fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn midpoint(&self) -> LatLon {
        LatLon::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// A rectangular area tagged with a hazard probability for one hazard type.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskCell {
    bounds: CellBounds,
    hazard_type: HazardType,
    risk_percentage: u8,
    updated_at: DateTime<Utc>,
}

impl RiskCell {
    /// Creates a risk cell.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCellError::Percentage`] if `risk_percentage > 100`.
    pub fn new(
        bounds: CellBounds,
        hazard_type: HazardType,
        risk_percentage: u8,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, InvalidCellError> {
        if risk_percentage > 100 {
            return Err(InvalidCellError::Percentage {
                value: risk_percentage,
            });
        }
        Ok(Self {
            bounds,
            hazard_type,
            risk_percentage,
            updated_at,
        })
    }

    /// Area covered by this cell.
    #[must_use]
    pub const fn bounds(&self) -> &CellBounds {
        &self.bounds
    }

    /// Hazard this cell describes.
    #[must_use]
    pub const fn hazard_type(&self) -> HazardType {
        self.hazard_type
    }

    /// Hazard probability, 0-100.
    #[must_use]
    pub const fn risk_percentage(&self) -> u8 {
        self.risk_percentage
    }

    /// When the upstream model last computed this cell.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Banding of [`Self::risk_percentage`].
    #[must_use]
    pub const fn level(&self) -> RiskLevel {
        RiskLevel::from_percentage(self.risk_percentage)
    }
}

/// Aggregate cell counts by [`RiskLevel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskCounts {
    /// Number of cells.
    pub total: usize,
    /// Cells at [`RiskLevel::High`].
    pub high: usize,
    /// Cells at [`RiskLevel::Moderate`].
    pub moderate: usize,
    /// Cells at [`RiskLevel::Low`].
    pub low: usize,
}

impl RiskCounts {
    /// Counts `cells` by risk level.
    #[must_use]
    pub fn from_cells(cells: &[RiskCell]) -> Self {
        cells.iter().fold(Self::default(), |mut counts, cell| {
            counts.total += 1;
            match cell.level() {
                RiskLevel::High => counts.high += 1,
                RiskLevel::Moderate => counts.moderate += 1,
                RiskLevel::Low => counts.low += 1,
            }
            counts
        })
    }
}

/// A synthesized advisory that a named road or area is affected by
/// clustered high-risk cells.
///
/// Derived data: recomputed in full whenever the filtered cells or hazard
/// mode change, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadAlert {
    /// Stable identifier (e.g. `"landslide-central"`).
    pub id: String,
    /// Road or area name shown to the user.
    pub road_label: String,
    /// Maximum risk percentage among contributing cells.
    pub severity: u8,
    /// Cells that triggered this alert, in input order. Never empty.
    pub contributing_cells: Vec<RiskCell>,
    /// Advisory text.
    pub message: String,
    /// Suggested action.
    pub recommendation: String,
}

impl RoadAlert {
    /// Banding of [`Self::severity`].
    #[must_use]
    pub const fn level(&self) -> RiskLevel {
        RiskLevel::from_percentage(self.severity)
    }
}
