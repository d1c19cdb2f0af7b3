//! Configuration for the revq CLI.
//!
//! Settings are read from `revq.toml` in the revq config directory and
//! layered: file -> environment -> CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! url = "http://localhost:8000/api"
//! timeout_secs = 30
//!
//! [polling]
//! interval_ms = 2000
//! max_attempts = 30
//! budget_ms = 300000
//! ```
//!
//! Environment overrides: `REVQ_API_URL` beats the file's `api.url`, and
//! `REVQ_CONFIG_DIR` relocates the whole config directory (used by tests).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::PollConfig;

pub const CONFIG_FILE: &str = "revq.toml";

/// API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// Base URL of the review service, including any path prefix.
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Review status polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSection {
    /// Fixed delay between poll attempts, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Maximum number of fetch attempts before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Absolute wall-clock budget for one polling sequence, in milliseconds.
    #[serde(default = "default_budget_ms")]
    pub budget_ms: u64,
}

fn default_interval_ms() -> u64 {
    2_000
}

fn default_max_attempts() -> u32 {
    30
}

fn default_budget_ms() -> u64 {
    300_000
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
            budget_ms: default_budget_ms(),
        }
    }
}

/// The complete revq.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevqToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub polling: PollingSection,
}

impl RevqToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse revq.toml")
    }

    /// Load from the config directory, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize revq.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.api.url.starts_with("http://") && !self.api.url.starts_with("https://") {
            warnings.push(format!(
                "api.url '{}' does not look like an HTTP URL",
                self.api.url
            ));
        }
        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs must be greater than zero".to_string());
        }
        if self.polling.interval_ms == 0 {
            warnings.push("polling.interval_ms must be greater than zero".to_string());
        }
        if self.polling.max_attempts == 0 {
            warnings.push("polling.max_attempts must be greater than zero".to_string());
        }
        if self.polling.budget_ms < self.polling.interval_ms {
            warnings.push(format!(
                "polling.budget_ms ({}) is shorter than a single interval ({})",
                self.polling.budget_ms, self.polling.interval_ms
            ));
        }
        warnings
    }
}

/// Runtime configuration: parsed file plus environment and CLI overrides.
#[derive(Debug, Clone)]
pub struct RevqConfig {
    /// Directory holding revq.toml and credentials.json.
    pub config_dir: PathBuf,
    /// Parsed revq.toml.
    pub toml: RevqToml,
    /// CLI override for the API base URL.
    pub cli_api_url: Option<String>,
}

impl RevqConfig {
    /// Resolve the config directory: `REVQ_CONFIG_DIR` env override, else
    /// the platform config dir plus `revq/`.
    pub fn default_config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("REVQ_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }
        let base = dirs::config_dir().context("Could not determine the user config directory")?;
        Ok(base.join("revq"))
    }

    /// Load configuration from the resolved config directory.
    pub fn load(cli_api_url: Option<String>) -> Result<Self> {
        let config_dir = Self::default_config_dir()?;
        let toml = RevqToml::load_or_default(&config_dir)?;
        Ok(Self {
            config_dir,
            toml,
            cli_api_url,
        })
    }

    /// Effective API base URL (CLI -> env -> file), trailing slash trimmed.
    pub fn api_url(&self) -> String {
        let url = self
            .cli_api_url
            .clone()
            .or_else(|| std::env::var("REVQ_API_URL").ok())
            .unwrap_or_else(|| self.toml.api.url.clone());
        url.trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.toml.api.timeout_secs)
    }

    /// Polling parameters for a `ReviewSession`.
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            max_attempts: self.toml.polling.max_attempts,
            interval: Duration::from_millis(self.toml.polling.interval_ms),
            budget: Duration::from_millis(self.toml.polling.budget_ms),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_empty_uses_defaults() {
        let toml = RevqToml::parse("").unwrap();
        assert_eq!(toml.api.url, "http://localhost:8000/api");
        assert_eq!(toml.api.timeout_secs, 30);
        assert_eq!(toml.polling.interval_ms, 2_000);
        assert_eq!(toml.polling.max_attempts, 30);
        assert_eq!(toml.polling.budget_ms, 300_000);
    }

    #[test]
    fn parse_partial_sections() {
        let content = r#"
[api]
url = "https://review.example.com/api"

[polling]
max_attempts = 10
"#;
        let toml = RevqToml::parse(content).unwrap();
        assert_eq!(toml.api.url, "https://review.example.com/api");
        // Unspecified fields keep defaults
        assert_eq!(toml.api.timeout_secs, 30);
        assert_eq!(toml.polling.max_attempts, 10);
        assert_eq!(toml.polling.interval_ms, 2_000);
    }

    #[test]
    fn load_and_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut toml = RevqToml::default();
        toml.api.url = "https://review.internal/api".to_string();
        toml.polling.interval_ms = 500;
        toml.save(&path).unwrap();

        let loaded = RevqToml::load(&path).unwrap();
        assert_eq!(loaded.api.url, "https://review.internal/api");
        assert_eq!(loaded.polling.interval_ms, 500);
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let toml = RevqToml::load_or_default(dir.path()).unwrap();
        assert_eq!(toml.polling.max_attempts, 30);
    }

    #[test]
    fn validate_flags_bad_values() {
        let content = r#"
[api]
url = "review.example.com"
timeout_secs = 0

[polling]
interval_ms = 5000
budget_ms = 1000
"#;
        let toml = RevqToml::parse(content).unwrap();
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.contains("HTTP URL")));
        assert!(warnings.iter().any(|w| w.contains("timeout_secs")));
        assert!(warnings.iter().any(|w| w.contains("budget_ms")));
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(RevqToml::default().validate().is_empty());
    }

    #[test]
    fn cli_url_override_wins_and_is_normalized() {
        let config = RevqConfig {
            config_dir: PathBuf::from("/tmp/revq-test"),
            toml: RevqToml::default(),
            cli_api_url: Some("https://cli.example.com/api/".to_string()),
        };
        assert_eq!(config.api_url(), "https://cli.example.com/api");
    }

    #[test]
    fn poll_config_reflects_file_values() {
        let mut toml = RevqToml::default();
        toml.polling.interval_ms = 250;
        toml.polling.max_attempts = 4;
        toml.polling.budget_ms = 10_000;
        let config = RevqConfig {
            config_dir: PathBuf::from("/tmp/revq-test"),
            toml,
            cli_api_url: None,
        };
        let poll = config.poll_config();
        assert_eq!(poll.max_attempts, 4);
        assert_eq!(poll.interval, Duration::from_millis(250));
        assert_eq!(poll.budget, Duration::from_secs(10));
    }
}
