//! Map focus controller.
//!
//! Owns the current [`ViewState`] and moves it in response to navigation
//! changes or alert focus requests. Every move is recorded as a
//! [`Transition`] for the presentation layer to animate; only the
//! transition's `to` value is authoritative.

use hazard_map_geography::GeoCatalog;
use hazard_map_geography_models::{GeographicRegion, NavigationSelection, RegionLevel, ViewState};
use hazard_map_risk_models::RoadAlert;
use serde::Serialize;

/// Zoom level used when focusing a road alert.
pub const ALERT_FOCUS_ZOOM: u8 = 13;

/// Duration of every view transition.
pub const TRANSITION_DURATION_MS: u32 = 1500;

/// Easing curve applied to view transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Cubic ease-in/ease-out.
    EaseInOutCubic,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// An animated move from one view to another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// View before the move.
    pub from: ViewState,
    /// View after the move.
    pub to: ViewState,
    /// Animation length.
    pub duration_ms: u32,
    /// Animation curve.
    pub easing: Easing,
}

impl Transition {
    /// Interpolated view at linear progress `t` in `[0, 1]`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::suboptimal_flops
    )]
    pub fn sample(&self, t: f64) -> ViewState {
        let k = self.easing.apply(t);
        let lerp = |a: f64, b: f64| a + (b - a) * k;
        ViewState {
            center: hazard_map_geography_models::LatLon::new(
                lerp(self.from.center.latitude, self.to.center.latitude),
                lerp(self.from.center.longitude, self.to.center.longitude),
            ),
            zoom: lerp(f64::from(self.from.zoom), f64::from(self.to.zoom)).round() as u8,
        }
    }
}

/// Owns the map focus.
#[derive(Debug, Clone)]
pub struct ViewStateController {
    view: ViewState,
    last_transition: Option<Transition>,
}

impl ViewStateController {
    /// Starts focused on `initial` with no transition recorded.
    #[must_use]
    pub fn new(initial: &GeographicRegion) -> Self {
        Self {
            view: initial.into(),
            last_transition: None,
        }
    }

    /// Current map focus.
    #[must_use]
    pub const fn view(&self) -> ViewState {
        self.view
    }

    /// The most recent move, if any.
    #[must_use]
    pub const fn last_transition(&self) -> Option<Transition> {
        self.last_transition
    }

    /// Focuses the deepest selected level that resolves in `catalog`,
    /// falling back to the world view.
    pub fn focus_selection(&mut self, selection: &NavigationSelection, catalog: &GeoCatalog) {
        let target = [RegionLevel::District, RegionLevel::State, RegionLevel::Country]
            .into_iter()
            .find_map(|level| {
                selection
                    .at(level)
                    .and_then(|id| catalog.lookup_at(id, level))
            })
            .unwrap_or_else(|| catalog.world());

        log::debug!("Focusing {} ({})", target.name, target.level);
        self.move_to(target.into());
    }

    /// Centers on the first contributing cell of `alert` at
    /// [`ALERT_FOCUS_ZOOM`]. Returns `false` (no move) if the alert has no
    /// cells.
    pub fn focus_alert(&mut self, alert: &RoadAlert) -> bool {
        let Some(cell) = alert.contributing_cells.first() else {
            return false;
        };
        self.move_to(ViewState {
            center: cell.bounds().midpoint(),
            zoom: ALERT_FOCUS_ZOOM,
        });
        true
    }

    fn move_to(&mut self, to: ViewState) {
        self.last_transition = Some(Transition {
            from: self.view,
            to,
            duration_ms: TRANSITION_DURATION_MS,
            easing: Easing::EaseInOutCubic,
        });
        self.view = to;
    }
}
