// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Pipeline configuration.

use crate::plugin::PluginConfig;
use alertrelay_core::Alert;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_PLUGINS: &str = "ALERTRELAY_PLUGINS";
pub const ENV_RAISE_ON_ERROR: &str = "ALERTRELAY_PLUGINS_RAISE_ON_ERROR";

/// How a pipeline treats a plugin failure that is not a control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort with an error naming the plugin and stage.
    #[default]
    Strict,
    /// Log the failure and continue with the next plugin.
    Lenient,
}

impl FailurePolicy {
    pub fn from_raise_on_error(raise_on_error: bool) -> Self {
        if raise_on_error {
            FailurePolicy::Strict
        } else {
            FailurePolicy::Lenient
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Strict => f.write_str("strict"),
            FailurePolicy::Lenient => f.write_str("lenient"),
        }
    }
}

/// Configuration for the plugin pipelines.
///
/// # Example TOML Configuration
///
/// ```toml
/// plugins = ["reject", "blackout", "heartbeat", "acked_by"]
/// raise_on_error = true
///
/// [plugin_config]
/// login = "ops"
///
/// [reject]
/// origin_blacklist = ["^foo/bar$", "^qux/"]
/// allowed_environments = ["Production", "Development"]
///
/// [blackout]
/// notification_blackout = false
///
/// [[blackout.windows]]
/// environment = "Production"
/// service = ["Web"]
/// start = "2025-01-01T00:00:00Z"
/// end = "2025-01-01T02:00:00Z"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Enabled plugins in execution order.
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Abort on plugin failure (strict) or log and continue (lenient).
    #[serde(default = "default_raise_on_error")]
    pub raise_on_error: bool,

    /// Opaque value handed to every plugin.
    #[serde(default)]
    pub plugin_config: PluginConfig,

    #[serde(default)]
    pub reject: RejectConfig,

    #[serde(default)]
    pub blackout: BlackoutConfig,
}

fn default_raise_on_error() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            plugins: Vec::new(),
            raise_on_error: default_raise_on_error(),
            plugin_config: PluginConfig::Null,
            reject: RejectConfig::default(),
            blackout: BlackoutConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn policy(&self) -> FailurePolicy {
        FailurePolicy::from_raise_on_error(self.raise_on_error)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load from a file; `.json` files are read as JSON, anything else as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - ALERTRELAY_PLUGINS: Comma-separated plugin names in execution order
    /// - ALERTRELAY_PLUGINS_RAISE_ON_ERROR: Abort on plugin failure (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load configuration with priority: env > file > defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_file {
            Some(path) if path.exists() => {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            }
            Some(path) => {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(plugins) = std::env::var(ENV_PLUGINS) {
            self.plugins = parse_plugin_list(&plugins);
        }

        if let Ok(raise) = std::env::var(ENV_RAISE_ON_ERROR) {
            self.raise_on_error = parse_bool(&raise).unwrap_or(default_raise_on_error());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for name in &self.plugins {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyPluginName);
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicatePlugin(name.clone()));
            }
        }

        for pattern in &self.reject.origin_blacklist {
            regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        }

        for (index, window) in self.blackout.windows.iter().enumerate() {
            window
                .validate()
                .map_err(|reason| ConfigError::InvalidBlackout { index, reason })?;
        }

        Ok(())
    }
}

fn parse_plugin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings for the `reject` plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectConfig {
    /// Regular expressions matched against the alert origin.
    #[serde(default)]
    pub origin_blacklist: Vec<String>,

    #[serde(default = "default_allowed_environments")]
    pub allowed_environments: Vec<String>,
}

fn default_allowed_environments() -> Vec<String> {
    vec!["Production".to_string(), "Development".to_string()]
}

impl Default for RejectConfig {
    fn default() -> Self {
        Self {
            origin_blacklist: Vec::new(),
            allowed_environments: default_allowed_environments(),
        }
    }
}

/// Settings for the `blackout` plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlackoutConfig {
    /// Accept blacked-out alerts with status `blackout` instead of refusing them.
    #[serde(default)]
    pub notification_blackout: bool,

    #[serde(default)]
    pub windows: Vec<BlackoutWindow>,
}

/// A scheduled blackout. Every field that is set must match the alert;
/// `service` and `tags` must all be present on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackoutWindow {
    pub environment: String,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub service: Vec<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Open-ended when unset.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl BlackoutWindow {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            resource: None,
            service: Vec::new(),
            event: None,
            group: None,
            tags: Vec::new(),
            start: None,
            end: None,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service.push(service.into());
        self
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| start <= now) && self.end.map_or(true, |end| now < end)
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        if alert.environment != self.environment {
            return false;
        }
        if self.resource.as_ref().is_some_and(|r| *r != alert.resource) {
            return false;
        }
        if self.event.as_ref().is_some_and(|e| *e != alert.event) {
            return false;
        }
        if self.group.as_ref().is_some_and(|g| *g != alert.group) {
            return false;
        }
        self.service.iter().all(|s| alert.service.contains(s))
            && self.tags.iter().all(|t| alert.tags.contains(t))
    }

    fn validate(&self) -> Result<(), String> {
        if self.environment.is_empty() {
            return Err("environment cannot be empty".to_string());
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if end <= start {
                return Err(format!("end {} is not after start {}", end, start));
            }
        }
        Ok(())
    }
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Plugin listed more than once: {0}")]
    DuplicatePlugin(String),

    #[error("Plugin name cannot be empty")]
    EmptyPluginName,

    #[error("Invalid plugin: {0}")]
    InvalidPlugin(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid blackout window at index {index}: {reason}")]
    InvalidBlackout { index: usize, reason: String },
}
