//! Risk cells for the active district.

use hazard_map_risk_models::{HazardType, RiskCell};

/// Holds the normalized risk cells for the active district.
///
/// Mutations are wholesale: cells are replaced or cleared, never edited
/// one at a time.
#[derive(Debug, Clone, Default)]
pub struct RiskCellStore {
    cells: Vec<RiskCell>,
}

impl RiskCellStore {
    /// Replaces every cell.
    pub fn set_cells(&mut self, cells: Vec<RiskCell>) {
        self.cells = cells;
    }

    /// Empties the store.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Cells of `hazard`, in original order.
    #[must_use]
    pub fn filter_by_hazard(&self, hazard: HazardType) -> Vec<RiskCell> {
        self.cells
            .iter()
            .filter(|c| c.hazard_type() == hazard)
            .cloned()
            .collect()
    }

    /// Every cell, in original order.
    #[must_use]
    pub fn cells(&self) -> &[RiskCell] {
        &self.cells
    }

    /// Whether the store holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
