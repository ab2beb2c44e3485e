use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hazard_map_gateway::{GatewayError, RiskSource};
use hazard_map_risk_models::{CellBounds, HazardType, RiskCell};
use tokio::sync::Notify;

pub fn cell(hazard: HazardType, min_lat: f64, pct: u8) -> RiskCell {
    let bounds = CellBounds::new(min_lat, 93.91, min_lat + 0.05, 93.96).unwrap();
    RiskCell::new(bounds, hazard, pct, DateTime::<Utc>::UNIX_EPOCH).unwrap()
}

pub fn landslide_cell(min_lat: f64, pct: u8) -> RiskCell {
    cell(HazardType::Landslide, min_lat, pct)
}

pub fn flood_cell(min_lat: f64, pct: u8) -> RiskCell {
    cell(HazardType::Flood, min_lat, pct)
}

/// In-memory [`RiskSource`] keyed by district display name.
///
/// Districts without canned cells or a status answer with an empty list.
/// A gated district blocks until its [`Notify`] is signalled.
#[derive(Default)]
pub struct FakeSource {
    cells: BTreeMap<String, Vec<RiskCell>>,
    statuses: BTreeMap<String, u16>,
    gates: BTreeMap<String, Arc<Notify>>,
    requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cells(mut self, district: &str, cells: Vec<RiskCell>) -> Self {
        self.cells.insert(district.to_string(), cells);
        self
    }

    pub fn with_status(mut self, district: &str, status: u16) -> Self {
        self.statuses.insert(district.to_string(), status);
        self
    }

    pub fn with_gate(mut self, district: &str, gate: Arc<Notify>) -> Self {
        self.gates.insert(district.to_string(), gate);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RiskSource for FakeSource {
    async fn fetch_risk_cells(&self, district: &str) -> Result<Vec<RiskCell>, GatewayError> {
        self.requests.lock().unwrap().push(district.to_string());

        if let Some(gate) = self.gates.get(district) {
            gate.notified().await;
        }
        if let Some(status) = self.statuses.get(district) {
            return Err(GatewayError::Http { status: *status });
        }
        Ok(self.cells.get(district).cloned().unwrap_or_default())
    }
}
