//! Front end configuration management
//!
//! Handles loading configuration from a TOML file, environment variables,
//! and CLI arguments.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use forms_client::{EndpointConfig, EndpointError};
use forms_core::selection::MissingSelectionPolicy;
use serde::Deserialize;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Log level name not recognised
    #[error("Unknown log level '{0}', expected trace, debug, info, warn or error")]
    InvalidLogLevel(String),

    /// Missing selection policy not recognised
    #[error("{0}")]
    InvalidPolicy(String),

    /// Bad script root or endpoint path
    #[error("Endpoint error: {0}")]
    Endpoint(#[from] EndpointError),

    /// Config file could not be read or parsed
    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Verbosity of the front end's own log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every request and reply
    Trace,
    /// Dispatch and key handling details
    Debug,
    /// Startup and activation outcomes
    #[default]
    Info,
    /// Failed pricing requests only
    Warn,
    /// Nothing short of errors
    Error,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Directive handed to `EnvFilter` when `RUST_LOG` is unset
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_filter_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

/// Front end configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// Endpoint locations (`script_root`, `option_endpoint`, `bond_endpoint`)
    #[serde(flatten)]
    pub endpoints: EndpointConfig,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Log file for the TUI; the TUI does not log when unset
    pub log_file: Option<PathBuf>,
    /// Behaviour when a radio group has no selection
    pub missing_selection: MissingSelectionPolicy,
    /// Placeholder overrides keyed by input id
    pub placeholders: BTreeMap<String, String>,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            log_level: LogLevel::Info,
            log_file: None,
            missing_selection: MissingSelectionPolicy::Submit,
            placeholders: BTreeMap::new(),
        }
    }
}

impl GuiConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = var("PRICING_FORMS_BASE_URL") {
            self.endpoints.script_root = root;
        }
        if let Some(path) = var("PRICING_FORMS_OPTION_PATH") {
            self.endpoints.option_endpoint = path;
        }
        if let Some(path) = var("PRICING_FORMS_BOND_PATH") {
            self.endpoints.bond_endpoint = path;
        }
        if let Some(level) = var("PRICING_FORMS_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(file) = var("PRICING_FORMS_LOG_FILE") {
            self.log_file = Some(PathBuf::from(file));
        }
        if let Some(policy) = var("PRICING_FORMS_MISSING_SELECTION") {
            self.missing_selection =
                MissingSelectionPolicy::from_str(&policy).map_err(ConfigError::InvalidPolicy)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoints.validate()?;
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(root) = &cli.script_root {
            self.endpoints.script_root = root.clone();
        }
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(file) = &cli.log_file {
            self.log_file = Some(file.clone());
        }
        if let Some(policy) = &cli.missing_selection {
            self.missing_selection =
                MissingSelectionPolicy::from_str(policy).map_err(ConfigError::InvalidPolicy)?;
        }
        Ok(())
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Script root override
    pub script_root: Option<String>,
    /// Log level override
    pub log_level: Option<String>,
    /// Log file override
    pub log_file: Option<PathBuf>,
    /// Missing selection policy override
    pub missing_selection: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<GuiConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => GuiConfig::from_file(path)?,
        None => GuiConfig::default(),
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}
