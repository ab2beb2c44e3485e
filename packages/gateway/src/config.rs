//! Environment-driven gateway configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `HAZARD_MAP_API_URL` | `http://localhost:8000` |
//! | `HAZARD_MAP_STATUS_PATH` | `/status/info` |
//! | `HAZARD_MAP_USER_AGENT` | `hazard-map/<version>` |

use reqwest::Url;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_STATUS_PATH: &str = "/status/info";

/// Invalid gateway configuration.
#[derive(Debug, Error)]
#[error("Configuration error: {message}")]
pub struct ConfigError {
    /// Description of the problem.
    pub message: String,
}

/// Where and how to reach the risk status API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Full URL of the status endpoint, without query string.
    pub endpoint: Url,
    /// `User-Agent` header sent with each request.
    pub user_agent: String,
}

impl GatewayConfig {
    /// Builds a config from a base URL and endpoint path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, status_path: &str) -> Result<Self, ConfigError> {
        let base = Url::parse(base_url).map_err(|e| ConfigError {
            message: format!("invalid API URL '{base_url}': {e}"),
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError {
                message: format!("API URL '{base_url}' must use http or https"),
            });
        }

        let path = format!(
            "{}/{}",
            base.path().trim_end_matches('/'),
            status_path.trim_start_matches('/')
        );
        let mut endpoint = base;
        endpoint.set_path(&path);
        endpoint.set_query(None);

        Ok(Self {
            endpoint,
            user_agent: default_user_agent(),
        })
    }

    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `HAZARD_MAP_API_URL` is set to an invalid
    /// URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`GatewayConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("HAZARD_MAP_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let status_path = lookup("HAZARD_MAP_STATUS_PATH")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS_PATH.to_string());

        let mut config = Self::new(base_url.trim(), status_path.trim())?;
        if let Some(agent) = lookup("HAZARD_MAP_USER_AGENT").filter(|s| !s.trim().is_empty()) {
            config.user_agent = agent;
        }

        log::debug!("Risk gateway endpoint: {}", config.endpoint);
        Ok(config)
    }
}

fn default_user_agent() -> String {
    format!("hazard-map/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = GatewayConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(
            config.endpoint.as_str(),
            "http://localhost:8000/status/info"
        );
        assert!(config.user_agent.starts_with("hazard-map/"));
    }

    #[test]
    fn joins_base_path_and_status_path() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("HAZARD_MAP_API_URL", "https://risk.example.org/api/"),
            ("HAZARD_MAP_STATUS_PATH", "status/info"),
            ("HAZARD_MAP_USER_AGENT", "dashboard-test"),
        ]))
        .unwrap();
        assert_eq!(
            config.endpoint.as_str(),
            "https://risk.example.org/api/status/info"
        );
        assert_eq!(config.user_agent, "dashboard-test");
    }

    #[test]
    fn rejects_invalid_urls() {
        assert!(GatewayConfig::new("not a url", "/status/info").is_err());
        assert!(GatewayConfig::new("ftp://example.org", "/status/info").is_err());
    }
}
