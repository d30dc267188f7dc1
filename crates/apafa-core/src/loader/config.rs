use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Host serving the fixtures when nothing else is configured
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";

/// Path under the origin where fixture files live
pub const DEFAULT_BASE_PATH: &str = "/apafa-web/data/";

/// Per-attempt timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Extra attempts after the first one.
pub const DEFAULT_RETRIES: u32 = 2;

/// Backoff unit; the wait before attempt k+1 is `k * step`.
pub const DEFAULT_BACKOFF_STEP_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub origin: String,
    pub base_path: String,
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_step_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retries: DEFAULT_RETRIES,
            backoff_step_ms: DEFAULT_BACKOFF_STEP_MS,
        }
    }
}

impl LoaderConfig {
    /// Full URL of a resource: origin + base path + name + ".json".
    pub fn resource_url(&self, name: &str) -> String {
        format!("{}{}{}.json", self.origin.trim_end_matches('/'), self.base_path, name)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries + 1
    }

    /// Delay after the given 1-indexed attempt has failed
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_step_ms * u64::from(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url() {
        let config = LoaderConfig::default();
        assert_eq!(
            config.resource_url("stats"),
            "http://localhost:8000/apafa-web/data/stats.json"
        );

        let config = LoaderConfig {
            origin: "https://example.org/".to_string(),
            ..LoaderConfig::default()
        };
        assert_eq!(
            config.resource_url("resumen_financiero"),
            "https://example.org/apafa-web/data/resumen_financiero.json"
        );
    }

    #[test]
    fn test_linear_backoff() {
        let config = LoaderConfig::default();
        assert_eq!(config.max_attempts(), 3);
        assert_eq!(config.backoff_after(1), Duration::from_millis(1000));
        assert_eq!(config.backoff_after(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: LoaderConfig = serde_json::from_str(r#"{"retries": 0}"#).unwrap();
        assert_eq!(config.retries, 0);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.base_path, DEFAULT_BASE_PATH);
    }
}
