//! `reqwest`-backed [`RiskSource`] talking to the status API.

use async_trait::async_trait;
use chrono::Utc;
use hazard_map_risk_models::RiskCell;

use crate::{GatewayConfig, GatewayError, RiskSource, area_param, payload::normalize_payload};

/// Fetches district risk cells over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRiskGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpRiskGateway {
    /// Creates a gateway with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Network`] if the HTTP client cannot be
    /// initialized (e.g. TLS backend failure).
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a gateway sharing an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, config: GatewayConfig) -> Self {
        Self { client, config }
    }

    /// The configured endpoint.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[async_trait]
impl RiskSource for HttpRiskGateway {
    async fn fetch_risk_cells(&self, district: &str) -> Result<Vec<RiskCell>, GatewayError> {
        let area = area_param(district);
        log::info!("Fetching risk cells for area={area}");

        let resp = self
            .client
            .get(self.config.endpoint.clone())
            .query(&[("area", area.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("Risk status request for area={area} failed with HTTP {status}");
            return Err(GatewayError::Http {
                status: status.as_u16(),
            });
        }

        let text = resp.text().await?;
        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| GatewayError::MalformedPayload {
                message: e.to_string(),
            })?;

        let cells = normalize_payload(&body, Utc::now());
        log::info!("Fetched {} risk cells for area={area}", cells.len());
        Ok(cells)
    }
}
