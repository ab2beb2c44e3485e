#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic region, navigation, and map view types.
//!
//! These types describe the world -> country -> state -> district hierarchy
//! the dashboard navigates, the user's position in that hierarchy, and the
//! map focus (center + zoom) derived from it. They carry no behavior beyond
//! keeping the selection a strict prefix chain.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLon {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl LatLon {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Depth of a node in the navigation hierarchy.
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
#[strum(serialize_all = "snake_case")]
pub enum RegionLevel {
    /// The whole-world overview.
    World,
    /// A country (e.g. India).
    Country,
    /// A state within a country (e.g. Manipur).
    State,
    /// A district within a state (e.g. Imphal West).
    District,
}

impl RegionLevel {
    /// Returns the level directly above this one, or `None` for
    /// [`RegionLevel::World`].
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::World => None,
            Self::Country => Some(Self::World),
            Self::State => Some(Self::Country),
            Self::District => Some(Self::State),
        }
    }
}

/// A navigable node in the region catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicRegion {
    /// Catalog key (e.g. `"imphal_west"`).
    pub id: String,
    /// Human-readable name (e.g. `"Imphal West"`).
    pub name: String,
    /// Hierarchy depth.
    pub level: RegionLevel,
    /// Catalog key of the enclosing region; `None` only for the world.
    #[serde(default)]
    pub parent: Option<String>,
    /// Map center when this region is focused.
    pub center: LatLon,
    /// Map zoom level when this region is focused.
    pub zoom: u8,
}

/// The map focus: what the presentation layer should be looking at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Map center.
    pub center: LatLon,
    /// Map zoom level.
    pub zoom: u8,
}

impl From<&GeographicRegion> for ViewState {
    fn from(region: &GeographicRegion) -> Self {
        Self {
            center: region.center,
            zoom: region.zoom,
        }
    }
}

/// Error returned when a selection would break the country -> state ->
/// district prefix chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingParentError {
    /// The level that was being set.
    pub level: RegionLevel,
}

impl std::fmt::Display for MissingParentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot select a {} before its parent", self.level)
    }
}

impl std::error::Error for MissingParentError {}

/// The user's position in the country -> state -> district hierarchy.
///
/// Always a strict prefix chain: `state` is only set when `country` is,
/// and `district` only when `state` is. Setting or clearing a level clears
/// every level below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSelection {
    country: Option<String>,
    state: Option<String>,
    district: Option<String>,
}

impl NavigationSelection {
    /// Selected country id, if any.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Selected state id, if any.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Selected district id, if any.
    #[must_use]
    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    /// The deepest populated level (`World` when nothing is selected).
    #[must_use]
    pub const fn level(&self) -> RegionLevel {
        if self.district.is_some() {
            RegionLevel::District
        } else if self.state.is_some() {
            RegionLevel::State
        } else if self.country.is_some() {
            RegionLevel::Country
        } else {
            RegionLevel::World
        }
    }

    /// The id selected at `level`, or `None` for `World` or an unset level.
    #[must_use]
    pub fn at(&self, level: RegionLevel) -> Option<&str> {
        match level {
            RegionLevel::World => None,
            RegionLevel::Country => self.country(),
            RegionLevel::State => self.state(),
            RegionLevel::District => self.district(),
        }
    }

    /// Sets (or clears, with `None`) the country. Always clears state and
    /// district.
    pub fn set_country(&mut self, country: Option<String>) {
        self.country = country;
        self.state = None;
        self.district = None;
    }

    /// Sets (or clears) the state. Always clears the district.
    ///
    /// # Errors
    ///
    /// Returns [`MissingParentError`] when setting a state with no country
    /// selected. Clearing never fails.
    pub fn set_state(&mut self, state: Option<String>) -> Result<(), MissingParentError> {
        if state.is_some() && self.country.is_none() {
            return Err(MissingParentError {
                level: RegionLevel::State,
            });
        }
        self.state = state;
        self.district = None;
        Ok(())
    }

    /// Sets (or clears) the district.
    ///
    /// # Errors
    ///
    /// Returns [`MissingParentError`] when setting a district with no state
    /// selected. Clearing never fails.
    pub fn set_district(&mut self, district: Option<String>) -> Result<(), MissingParentError> {
        if district.is_some() && self.state.is_none() {
            return Err(MissingParentError {
                level: RegionLevel::District,
            });
        }
        self.district = district;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_is_world() {
        assert_eq!(NavigationSelection::default().level(), RegionLevel::World);
    }

    #[test]
    fn clearing_country_clears_descendants() {
        let mut sel = NavigationSelection::default();
        sel.set_country(Some("india".into()));
        sel.set_state(Some("manipur".into())).unwrap();
        sel.set_district(Some("imphal_west".into())).unwrap();
        assert_eq!(sel.level(), RegionLevel::District);

        sel.set_country(None);
        assert_eq!(sel, NavigationSelection::default());
    }

    #[test]
    fn changing_state_clears_district() {
        let mut sel = NavigationSelection::default();
        sel.set_country(Some("india".into()));
        sel.set_state(Some("manipur".into())).unwrap();
        sel.set_district(Some("bishnupur".into())).unwrap();

        sel.set_state(Some("assam".into())).unwrap();
        assert_eq!(sel.district(), None);
        assert_eq!(sel.level(), RegionLevel::State);
    }

    #[test]
    fn rejects_orphan_levels() {
        let mut sel = NavigationSelection::default();
        assert_eq!(
            sel.set_state(Some("manipur".into())),
            Err(MissingParentError {
                level: RegionLevel::State
            })
        );
        assert!(sel.set_district(Some("imphal_west".into())).is_err());
        assert!(sel.set_district(None).is_ok());
    }

    #[test]
    fn region_level_parents() {
        assert_eq!(RegionLevel::District.parent(), Some(RegionLevel::State));
        assert_eq!(RegionLevel::Country.parent(), Some(RegionLevel::World));
        assert_eq!(RegionLevel::World.parent(), None);
        assert_eq!(RegionLevel::State.to_string(), "state");
    }
}
