//! # Configuration Module
//!
//! Dispatch behavior is configured from a YAML file, environment variables, or
//! both (environment wins).
//!
//! ## File
//!
//! ```yaml
//! namespace: shop          # modules are looked up as shop::<segment>
//! script_path: /api.php    # stripped from the URI path before routing
//! clear_request: true      # clear query/body data after a successful dispatch
//! ```
//!
//! ## Environment Variables
//!
//! - `BRRTRPC_NAMESPACE` - namespace prefix (empty string disables it)
//! - `BRRTRPC_SCRIPT_PATH` - script path prefix
//! - `BRRTRPC_CLEAR_REQUEST` - `true`/`false` (also `1`/`0`, `yes`/`no`, `on`/`off`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use brrtrpc::config::DispatchConfig;
//!
//! let config = DispatchConfig::load("config/dispatch.yaml")
//!     .expect("load config")
//!     .apply_env();
//! println!("namespace: {:?}", config.namespace);
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::warn;

pub const ENV_NAMESPACE: &str = "BRRTRPC_NAMESPACE";
pub const ENV_SCRIPT_PATH: &str = "BRRTRPC_SCRIPT_PATH";
pub const ENV_CLEAR_REQUEST: &str = "BRRTRPC_CLEAR_REQUEST";

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Namespace prefix for module names (normalized to end with `::`)
    pub namespace: Option<String>,
    /// Script path stripped from request URIs to obtain the resource path
    pub script_path: Option<String>,
    /// Clear request data after a successful dispatch (default: true)
    pub clear_request: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            script_path: None,
            clear_request: true,
        }
    }
}

impl DispatchConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed YAML or unknown keys.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Defaults overridden by environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Override fields from the process environment.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_vars(|key| env::var(key).ok())
    }

    /// Override fields from an arbitrary variable lookup.
    #[must_use]
    pub fn apply_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ns) = lookup(ENV_NAMESPACE) {
            self.namespace = Some(ns).filter(|s| !s.is_empty());
        }
        if let Some(script) = lookup(ENV_SCRIPT_PATH) {
            self.script_path = Some(script).filter(|s| !s.is_empty());
        }
        if let Some(raw) = lookup(ENV_CLEAR_REQUEST) {
            match parse_bool(&raw) {
                Some(v) => self.clear_request = v,
                None => warn!(
                    variable = ENV_CLEAR_REQUEST,
                    value = %raw,
                    "Ignoring invalid boolean"
                ),
            }
        }
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
