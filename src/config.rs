//! Configuration management for Shopchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from a YAML file, environment variables, and CLI overrides.

use crate::cli::Cli;
use crate::error::{Result, ShopchatError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Shopchat
///
/// Holds everything the client needs: where the recommendation backend
/// lives, chat session defaults, and the evaluation polling budget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Chat session settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Evaluation dashboard settings
    #[serde(default)]
    pub eval: EvalConfig,
}

/// Recommendation backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the recommendation backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// How many products to request per chat turn
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_top_k() -> u32 {
    8
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            top_k: default_top_k(),
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Greeting the assistant shows before the first user turn
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_greeting() -> String {
    "Hi! I can help you find products. Tell me what you're looking for, \
     attach a photo, or set a few filters."
        .to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
        }
    }
}

/// Evaluation job polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Seconds between status polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,

    /// Attempt budget before a job is treated as timed out client-side
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

fn default_poll_interval() -> u64 {
    2
}

fn default_max_poll_attempts() -> u32 {
    300
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file with CLI overrides applied
    ///
    /// A missing file is not an error: defaults are used so the client
    /// works out of the box against a local backend.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed CLI arguments (base URL override, if any)
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&contents)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path);
            Config::default()
        };

        // CLI/env base URL wins over the file
        if let Some(base_url) = &cli.base_url {
            config.backend.base_url = base_url.clone();
        }

        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a `ShopchatError::Config` if the base URL does not parse,
    /// `top_k` is outside the backend's accepted 2..=24 range, or the
    /// polling budget is degenerate.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.backend.base_url).map_err(|e| {
            ShopchatError::Config(format!(
                "invalid base URL '{}': {}",
                self.backend.base_url, e
            ))
        })?;

        if !(2..=24).contains(&self.backend.top_k) {
            return Err(ShopchatError::Config(format!(
                "top_k must be between 2 and 24, got {}",
                self.backend.top_k
            ))
            .into());
        }

        if self.backend.timeout_seconds == 0 {
            return Err(ShopchatError::Config("timeout_seconds must be at least 1".into()).into());
        }

        if self.eval.poll_interval_seconds == 0 {
            return Err(
                ShopchatError::Config("poll_interval_seconds must be at least 1".into()).into(),
            );
        }

        if self.eval.max_poll_attempts == 0 {
            return Err(
                ShopchatError::Config("max_poll_attempts must be at least 1".into()).into(),
            );
        }

        Ok(())
    }
}
