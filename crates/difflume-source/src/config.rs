//! Source configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Settings shared by the HTTP-backed sources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Per-request timeout. Zero disables the timeout.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("difflume/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Build the HTTP client every source opened with this config shares.
    pub fn client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SourceConfig::default();
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert!(config.user_agent.starts_with("difflume/"));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = SourceConfig {
            timeout_secs: 0,
            ..SourceConfig::default()
        };
        assert_eq!(config.timeout(), None);
        assert!(config.client().is_ok());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: SourceConfig = serde_json::from_str(r#"{"timeout_secs": 3}"#).unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.user_agent, SourceConfig::default().user_agent);
    }
}
