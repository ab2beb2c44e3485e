#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Risk data gateway for the hazard map.
//!
//! Fetches precomputed landslide/flood risk cells for a district from the
//! upstream status API and normalizes the response into a flat list of
//! [`RiskCell`]s:
//!
//! - `GET <base>/status/info?area=<district without whitespace>`
//! - body is either `{ "status": [...] }` or a bare array
//! - each record may carry a `flood` and/or `landslide` sub-record, and
//!   every present sub-record becomes its own cell sharing the record's
//!   bounds
//!
//! Malformed records are dropped rather than failing the whole fetch.
//! There is no retry policy: a failed fetch is surfaced once and the user
//! re-triggers it.

pub mod config;
pub mod http;
pub mod payload;

use async_trait::async_trait;
use hazard_map_risk_models::RiskCell;
use thiserror::Error;

pub use config::{ConfigError, GatewayConfig};
pub use http::HttpRiskGateway;
pub use payload::normalize_payload;

/// Errors from fetching district risk cells.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure (DNS, connection refused, reset, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error: status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not valid JSON.
    #[error("Malformed payload: {message}")]
    MalformedPayload {
        /// Description of the parsing failure.
        message: String,
    },
}

impl GatewayError {
    /// A single human-readable message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Unable to reach the risk data service. Check your connection and try again."
                    .to_string()
            }
            Self::Http { status } => {
                format!("The risk data service responded with an error (HTTP {status}).")
            }
            Self::MalformedPayload { .. } => {
                "The risk data service returned data that could not be read.".to_string()
            }
        }
    }
}

/// A source of district risk cells.
///
/// [`HttpRiskGateway`] is the production implementation; tests substitute
/// in-memory sources.
#[async_trait]
pub trait RiskSource: Send + Sync {
    /// Fetches every risk cell for `district`, in payload order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure, a non-success HTTP
    /// status, or an unparseable body. Individually malformed records are
    /// not errors.
    async fn fetch_risk_cells(&self, district: &str) -> Result<Vec<RiskCell>, GatewayError>;
}

/// Strips all whitespace from a district name for use as the `area`
/// query value (`"Imphal West"` -> `"ImphalWest"`).
#[must_use]
pub fn area_param(district: &str) -> String {
    district.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_param_strips_whitespace() {
        assert_eq!(area_param("Imphal West"), "ImphalWest");
        assert_eq!(area_param("  Bishnupur \t"), "Bishnupur");
        assert_eq!(area_param("A  B\nC"), "ABC");
    }

    #[test]
    fn user_messages_mention_status() {
        let err = GatewayError::Http { status: 500 };
        assert!(err.user_message().contains("500"));
        let err = GatewayError::MalformedPayload {
            message: "EOF".to_string(),
        };
        assert!(!err.user_message().is_empty());
    }
}
