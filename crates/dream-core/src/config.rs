//! Planner configuration
//!
//! Loaded from TOML with environment overrides:
//! - `DREAM_PLANNER_MODEL` - generator model name
//! - `DREAM_PLANNER_CURRENCY` - allocation currency code
//! - `DREAM_PLANNER_LOG` - tracing filter directive

use crate::confidence::ConfidenceModel;
use crate::error::ConfigError;
use crate::types::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the generator model
pub const ENV_MODEL: &str = "DREAM_PLANNER_MODEL";
/// Environment variable overriding the currency
pub const ENV_CURRENCY: &str = "DREAM_PLANNER_CURRENCY";
/// Environment variable overriding the log filter
pub const ENV_LOG: &str = "DREAM_PLANNER_LOG";

/// Planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Confidence scoring model
    pub confidence_model: ConfidenceModel,
    /// Currency code reported with budget allocations
    pub currency: String,
    /// Options applied when the caller passes none
    pub default_options: GenerationOptions,
    /// Logging setup
    pub logging: LoggingConfig,
    /// External generator setup
    pub generation: GenerationConfig,
}

impl PlannerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With confidence model
    #[inline]
    #[must_use]
    pub fn with_confidence_model(mut self, model: ConfidenceModel) -> Self {
        self.confidence_model = model;
        self
    }

    /// With currency
    #[inline]
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// With default options
    #[inline]
    #[must_use]
    pub fn with_default_options(mut self, options: GenerationOptions) -> Self {
        self.default_options = options;
        self
    }

    /// Parse from TOML text and validate
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, apply environment overrides, validate
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        let config = config.with_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    #[must_use]
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup(ENV_MODEL) {
            self.generation.model = model;
        }
        if let Some(currency) = lookup(ENV_CURRENCY) {
            self.currency = currency;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.logging.filter = filter;
        }
        self
    }

    /// Check value consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency must not be empty".to_string()));
        }
        self.generation.validate()
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            confidence_model: ConfidenceModel::Extended,
            currency: "USD".to_string(),
            default_options: GenerationOptions::default(),
            logging: LoggingConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// External generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model name sent with every request
    pub model: String,
    /// Response token limit
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 1.0)
    pub temperature: f32,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// API base URL
    pub api_base: String,
}

impl GenerationConfig {
    /// Check value consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("generation.model must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "generation.request_timeout_secs must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "generation.temperature {} outside 0.0..=1.0",
                self.temperature
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 2048,
            temperature: 0.3,
            request_timeout_secs: 30,
            api_base: "https://api.anthropic.com".to_string(),
        }
    }
}
