//! Event loop that drives a [`Dashboard`] on a tokio task.
//!
//! User events arrive over an `mpsc` channel and are processed one at a
//! time. District fetches run on their own spawned tasks and report back
//! through a second channel, so navigation stays responsive while a fetch
//! is in flight. After every processed message a fresh
//! [`DashboardSnapshot`] is published on a `watch` channel.

use std::sync::Arc;

use hazard_map_gateway::{GatewayError, RiskSource};
use hazard_map_risk_models::{HazardType, RiskCell};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::DashboardSnapshot;
use crate::orchestrator::{Dashboard, FetchTicket};

/// A user-initiated dashboard change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Select or clear the country.
    SelectCountry(Option<String>),
    /// Select or clear the state.
    SelectState(Option<String>),
    /// Select or clear the district. Re-selecting retries the fetch.
    SelectDistrict(Option<String>),
    /// Switch hazard mode.
    SetHazardMode(HazardType),
    /// Focus the map on an alert by id.
    FocusAlert(String),
}

/// Errors from talking to a [`DashboardRuntime`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The runtime task is no longer processing events.
    #[error("Dashboard runtime has stopped")]
    Closed,
}

type FetchOutcome = (FetchTicket, Result<Vec<RiskCell>, GatewayError>);

/// Client side of a running dashboard.
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    events: mpsc::UnboundedSender<DashboardEvent>,
    snapshots: watch::Receiver<DashboardSnapshot>,
}

impl DashboardHandle {
    /// Queues `event` for processing.
    ///
    /// # Errors
    ///
    /// * If the runtime task has stopped
    pub fn send(&self, event: DashboardEvent) -> Result<(), RuntimeError> {
        self.events.send(event).map_err(|_| RuntimeError::Closed)
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshots.clone()
    }
}

/// Spawns dashboards onto the current tokio runtime.
pub struct DashboardRuntime;

impl DashboardRuntime {
    /// Starts processing events for `dashboard`, fetching from `source`.
    ///
    /// The task runs until every [`DashboardHandle`] is dropped, then
    /// yields the final dashboard state.
    ///
    /// # Panics
    ///
    /// * If called outside a tokio runtime
    #[must_use]
    pub fn spawn(
        dashboard: Dashboard,
        source: Arc<dyn RiskSource>,
    ) -> (DashboardHandle, JoinHandle<Dashboard>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshots_tx, snapshots_rx) = watch::channel(dashboard.snapshot());

        let task = tokio::spawn(run(dashboard, source, events_rx, snapshots_tx));

        (
            DashboardHandle {
                events: events_tx,
                snapshots: snapshots_rx,
            },
            task,
        )
    }
}

async fn run(
    mut dashboard: Dashboard,
    source: Arc<dyn RiskSource>,
    mut events: mpsc::UnboundedReceiver<DashboardEvent>,
    snapshots: watch::Sender<DashboardSnapshot>,
) -> Dashboard {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<FetchOutcome>();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    log::debug!("All dashboard handles dropped, stopping");
                    break;
                };
                if let Some(ticket) = handle_event(&mut dashboard, event) {
                    spawn_fetch(Arc::clone(&source), ticket, done_tx.clone());
                }
            }
            Some((ticket, result)) = done_rx.recv() => {
                dashboard.apply_fetch(&ticket, result);
            }
        }

        snapshots.send_replace(dashboard.snapshot());
    }

    dashboard
}

fn handle_event(dashboard: &mut Dashboard, event: DashboardEvent) -> Option<FetchTicket> {
    log::debug!("Processing {event:?}");
    match event {
        DashboardEvent::SelectCountry(key) => {
            dashboard.select_country(key.as_deref());
            None
        }
        DashboardEvent::SelectState(key) => {
            dashboard.select_state(key.as_deref());
            None
        }
        DashboardEvent::SelectDistrict(key) => dashboard.select_district(key.as_deref()),
        DashboardEvent::SetHazardMode(hazard) => {
            dashboard.set_hazard_mode(hazard);
            None
        }
        DashboardEvent::FocusAlert(id) => {
            dashboard.focus_alert(&id);
            None
        }
    }
}

fn spawn_fetch(
    source: Arc<dyn RiskSource>,
    ticket: FetchTicket,
    done: mpsc::UnboundedSender<FetchOutcome>,
) {
    tokio::spawn(async move {
        log::debug!("Spawning fetch #{} for {}", ticket.generation, ticket.district_name);
        let result = source.fetch_risk_cells(&ticket.district_name).await;
        if done.send((ticket, result)).is_err() {
            log::debug!("Dashboard stopped before fetch completed");
        }
    });
}
