#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static region catalog for hazard map navigation.
//!
//! The catalog maps every navigable world/country/state/district node to a
//! map center and zoom level. Entries live in `regions.toml`, embedded at
//! compile time, so adding a region is a data edit rather than a code
//! change.
//!
//! Lookups never fail hard: an unknown key yields `None`, which callers
//! treat as "no navigation effect".

use std::collections::BTreeMap;
use std::sync::LazyLock;

use hazard_map_geography_models::{GeographicRegion, RegionLevel};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a region table.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The TOML document could not be parsed.
    #[error("Failed to parse region table: {0}")]
    Parse(#[from] toml::de::Error),

    /// The table parsed but violates a structural rule.
    #[error("Invalid region table: {message}")]
    Invalid {
        /// Description of the violation.
        message: String,
    },
}

#[derive(Deserialize)]
struct RegionTable {
    regions: Vec<GeographicRegion>,
}

const REGIONS_TOML: &str = include_str!("../regions.toml");

static CATALOG: LazyLock<GeoCatalog> = LazyLock::new(|| {
    GeoCatalog::from_toml(REGIONS_TOML)
        .unwrap_or_else(|e| panic!("Failed to load embedded region catalog: {e}"))
});

/// Returns the process-wide catalog built from the embedded region table.
///
/// # Panics
///
/// Panics on first use if the embedded `regions.toml` is malformed. The
/// table is a compile-time constant validated by tests, so this indicates a
/// development error.
#[must_use]
pub fn catalog() -> &'static GeoCatalog {
    &CATALOG
}

/// Read-only lookup table of navigable regions.
#[derive(Debug, Clone)]
pub struct GeoCatalog {
    regions: Vec<GeographicRegion>,
    /// normalized key -> index into `regions`
    index: BTreeMap<String, usize>,
}

impl GeoCatalog {
    /// Parses and validates a region table.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the TOML is malformed, an id repeats,
    /// there is not exactly one world entry, or a region's parent is missing
    /// or sits at the wrong level.
    pub fn from_toml(source: &str) -> Result<Self, CatalogError> {
        let table: RegionTable = toml::de::from_str(source)?;
        Self::new(table.regions)
    }

    /// Builds a catalog from already-parsed regions.
    ///
    /// # Errors
    ///
    /// See [`GeoCatalog::from_toml`].
    pub fn new(mut regions: Vec<GeographicRegion>) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (i, region) in regions.iter().enumerate() {
            if index.insert(normalize_key(&region.id), i).is_some() {
                return Err(CatalogError::Invalid {
                    message: format!("duplicate region id '{}'", region.id),
                });
            }
        }

        let worlds = regions
            .iter()
            .filter(|r| r.level == RegionLevel::World)
            .count();
        if worlds != 1 {
            return Err(CatalogError::Invalid {
                message: format!("expected exactly one world region, found {worlds}"),
            });
        }

        let mut parents = Vec::with_capacity(regions.len());
        for region in &regions {
            let expected = region.level.parent();
            let resolved = region
                .parent
                .as_deref()
                .and_then(|p| index.get(&normalize_key(p)))
                .map(|&i| &regions[i]);

            if expected != resolved.map(|r| r.level) {
                return Err(CatalogError::Invalid {
                    message: format!(
                        "region '{}' ({}) has parent {:?}, expected a {}",
                        region.id,
                        region.level,
                        region.parent,
                        expected.map_or_else(|| "none".to_string(), |l| l.to_string()),
                    ),
                });
            }
            parents.push(resolved.map(|r| r.id.clone()));
        }

        // Parents are matched by exact id from here on.
        for (region, parent) in regions.iter_mut().zip(parents) {
            region.parent = parent;
        }

        log::debug!("Loaded {} regions into catalog", regions.len());

        Ok(Self { regions, index })
    }

    /// Finds a region by id or display name.
    ///
    /// Matching ignores case, whitespace, and punctuation, so
    /// `"Imphal West"`, `"imphal_west"`, and `"ImphalWest"` all resolve to
    /// the same entry.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&GeographicRegion> {
        let key = normalize_key(key);
        if key.is_empty() {
            return None;
        }
        self.index
            .get(&key)
            .map(|&i| &self.regions[i])
            .or_else(|| {
                self.regions
                    .iter()
                    .find(|r| normalize_key(&r.name) == key)
            })
    }

    /// Finds a region by key, but only if it sits at `level`.
    #[must_use]
    pub fn lookup_at(&self, key: &str, level: RegionLevel) -> Option<&GeographicRegion> {
        self.lookup(key).filter(|r| r.level == level)
    }

    /// The world overview region.
    ///
    /// # Panics
    ///
    /// Never in practice: construction guarantees exactly one world entry.
    #[must_use]
    pub fn world(&self) -> &GeographicRegion {
        self.regions
            .iter()
            .find(|r| r.level == RegionLevel::World)
            .unwrap_or_else(|| unreachable!("catalog validated with one world region"))
    }

    /// Direct children of `parent`, in table order.
    #[must_use]
    pub fn children(&self, parent: &str) -> Vec<&GeographicRegion> {
        let Some(parent) = self.lookup(parent) else {
            return Vec::new();
        };
        self.regions
            .iter()
            .filter(|r| r.parent.as_deref() == Some(parent.id.as_str()))
            .collect()
    }

    /// All country entries, in table order.
    #[must_use]
    pub fn countries(&self) -> Vec<&GeographicRegion> {
        self.regions
            .iter()
            .filter(|r| r.level == RegionLevel::Country)
            .collect()
    }

    /// Every region, in table order.
    #[must_use]
    pub fn regions(&self) -> &[GeographicRegion] {
        &self.regions
    }
}

/// Lowercases and strips everything but letters and digits.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Number of districts in the embedded table. Enforced by a test.
    const EXPECTED_DISTRICT_COUNT: usize = 16;

    #[test]
    fn loads_embedded_catalog() {
        let districts = catalog().children("manipur");
        assert_eq!(
            districts.len(),
            EXPECTED_DISTRICT_COUNT,
            "Expected {EXPECTED_DISTRICT_COUNT} districts, found {}. \
             Update EXPECTED_DISTRICT_COUNT after adding/removing districts.",
            districts.len()
        );
        assert!(
            districts
                .iter()
                .all(|d| d.level == RegionLevel::District)
        );
    }

    #[test]
    fn region_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for region in catalog().regions() {
            assert!(seen.insert(&region.id), "Duplicate region ID: {}", region.id);
        }
    }

    #[test]
    fn india_center_and_zoom() {
        let india = catalog().lookup("India").unwrap();
        assert_eq!(india.level, RegionLevel::Country);
        assert!((india.center.latitude - 22.5).abs() < f64::EPSILON);
        assert!((india.center.longitude - 79.0).abs() < f64::EPSILON);
        assert_eq!(india.zoom, 5);
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let a = catalog().lookup("Imphal West").unwrap();
        let b = catalog().lookup("imphal_west").unwrap();
        let c = catalog().lookup("  IMPHALWEST ").unwrap();
        assert_eq!(a.id, "imphal_west");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn unknown_key_is_none() {
        assert!(catalog().lookup("atlantis").is_none());
        assert!(catalog().lookup("").is_none());
        assert!(
            catalog()
                .lookup_at("manipur", RegionLevel::District)
                .is_none()
        );
    }

    #[test]
    fn world_has_no_parent() {
        let world = catalog().world();
        assert_eq!(world.id, "world");
        assert!(world.parent.is_none());
        assert_eq!(catalog().countries().len(), 1);
    }

    #[test]
    fn rejects_orphaned_region() {
        let toml = r#"
            [[regions]]
            id = "world"
            name = "World"
            level = "world"
            center = { latitude = 0.0, longitude = 0.0 }
            zoom = 2

            [[regions]]
            id = "manipur"
            name = "Manipur"
            level = "state"
            parent = "world"
            center = { latitude = 24.6, longitude = 93.9 }
            zoom = 8
        "#;
        let err = GeoCatalog::from_toml(toml).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { .. }), "{err}");
    }

    #[test]
    fn parent_keys_resolve_to_canonical_ids() {
        let toml = r#"
            [[regions]]
            id = "world"
            name = "World"
            level = "world"
            center = { latitude = 0.0, longitude = 0.0 }
            zoom = 2

            [[regions]]
            id = "india"
            name = "India"
            level = "country"
            parent = "World"
            center = { latitude = 22.5, longitude = 79.0 }
            zoom = 5

            [[regions]]
            id = "manipur"
            name = "Manipur"
            level = "state"
            parent = " INDIA "
            center = { latitude = 24.66, longitude = 93.91 }
            zoom = 8
        "#;
        let cat = GeoCatalog::from_toml(toml).unwrap();

        let countries: Vec<&str> = cat
            .children("world")
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(countries, vec!["india"]);
        let states = cat.children("india");
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].parent.as_deref(), Some("india"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let toml = r#"
            [[regions]]
            id = "world"
            name = "World"
            level = "world"
            center = { latitude = 0.0, longitude = 0.0 }
            zoom = 2

            [[regions]]
            id = "World"
            name = "Earth"
            level = "country"
            parent = "world"
            center = { latitude = 0.0, longitude = 0.0 }
            zoom = 3
        "#;
        assert!(GeoCatalog::from_toml(toml).is_err());
    }
}
