//! Nudge configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NudgeError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NudgeConfig {
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl NudgeConfig {
    /// Load config from the default path (~/.nudge/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NudgeError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| NudgeError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".nudge")
            .join("config.toml")
    }
}

/// Extraction (LLM) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Transport timeout for one extraction attempt, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String { "https://api.openai.com/v1".into() }
fn default_model() -> String { "gpt-4o-mini".into() }
fn default_temperature() -> f32 { 0.5 }
fn default_request_timeout() -> u64 { 30 }

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ExtractorConfig {
    /// Resolve the API key: config value first, then OPENAI_API_KEY.
    pub fn resolve_api_key(&self) -> Result<String> {
        if !self.api_key.is_empty() {
            return Ok(self.api_key.clone());
        }
        std::env::var("OPENAI_API_KEY")
            .map_err(|_| NudgeError::Config("OPENAI_API_KEY is required".into()))
    }
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Scheduler sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// How often the sweep checks for due notifications, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_sweep_interval() -> u64 { 30 }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { sweep_interval_secs: default_sweep_interval() }
    }
}

/// Notification provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

/// Console provider — always on unless explicitly disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
}

fn bool_true() -> bool { true }

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Outbound webhook provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default = "bool_true")]
    pub enabled: bool,
}

/// SMTP email provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// From address, e.g. "Nudge <nudge@example.com>".
    pub from: String,
    #[serde(default = "bool_true")]
    pub enabled: bool,
}

fn default_smtp_port() -> u16 { 587 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = NudgeConfig::default();
        assert_eq!(config.extractor.model, "gpt-4o-mini");
        assert_eq!(config.extractor.temperature, 0.5);
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.scheduler.sweep_interval_secs, 30);
        assert!(config.notify.console.enabled);
        assert!(config.notify.webhook.is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let config: NudgeConfig = toml::from_str(
            r#"
            [extractor]
            model = "gpt-4o"

            [notify.webhook]
            url = "https://hooks.example.com/nudge"
            "#,
        )
        .unwrap();
        assert_eq!(config.extractor.model, "gpt-4o");
        assert_eq!(config.extractor.base_url, "https://api.openai.com/v1");
        let webhook = config.notify.webhook.unwrap();
        assert_eq!(webhook.url, "https://hooks.example.com/nudge");
        assert!(webhook.enabled);
    }
}
