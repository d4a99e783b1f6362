//! Extension configuration from the global settings file.
//!
//! The settings file is the host's user-level JSON settings; this crate
//! only reads the `extra.local-repositories` namespace inside it:
//!
//! ```json
//! {
//!     "extra": {
//!         "local-repositories": {
//!             "trigger-commands": ["install", "update"],
//!             "ignore-options": ["no-dev", "prefer-source"],
//!             "force-dev": true
//!         }
//!     }
//! }
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::runtime::Runtime;

/// Key under `extra` holding this extension's settings.
pub const NAMESPACE: &str = "local-repositories";

const DEFAULT_TRIGGER_COMMANDS: [&str; 2] = ["install", "update"];
const DEFAULT_IGNORE_OPTIONS: [&str; 2] = ["no-dev", "prefer-source"];

/// Resolved extension configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Host commands the pipeline runs for
    pub trigger_commands: BTreeSet<String>,
    /// Host options that suppress the pipeline when active
    pub ignore_options: BTreeSet<String>,
    /// Rewrite matching dependency constraints to `@dev`
    pub force_dev: bool,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            trigger_commands: DEFAULT_TRIGGER_COMMANDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignore_options: DEFAULT_IGNORE_OPTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            force_dev: true,
        }
    }
}

impl ExtensionConfig {
    /// Parse the content of a global settings file.
    ///
    /// A missing `extra` or namespace yields the default configuration;
    /// each absent field keeps its own default.
    pub fn from_settings(content: &str) -> std::result::Result<Self, String> {
        let settings: serde_json::Value =
            serde_json::from_str(content).map_err(|e| e.to_string())?;

        let Some(namespace) = settings.get("extra").and_then(|extra| extra.get(NAMESPACE)) else {
            return Ok(Self::default());
        };

        let raw: RawConfig =
            serde_json::from_value(namespace.clone()).map_err(|e| e.to_string())?;
        Ok(raw.into_config())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawConfig {
    trigger_commands: Option<OneOrMany>,
    ignore_options: Option<OneOrMany>,
    force_dev: Option<bool>,
}

/// A single string is accepted wherever a list of strings is.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_set(self) -> BTreeSet<String> {
        match self {
            OneOrMany::One(value) => BTreeSet::from([value]),
            OneOrMany::Many(values) => values.into_iter().collect(),
        }
    }
}

impl RawConfig {
    fn into_config(self) -> ExtensionConfig {
        let defaults = ExtensionConfig::default();
        ExtensionConfig {
            trigger_commands: self
                .trigger_commands
                .map(OneOrMany::into_set)
                .unwrap_or(defaults.trigger_commands),
            ignore_options: self
                .ignore_options
                .map(OneOrMany::into_set)
                .unwrap_or(defaults.ignore_options),
            force_dev: self.force_dev.unwrap_or(defaults.force_dev),
        }
    }
}

/// Loads the [`ExtensionConfig`] at most once per invocation.
pub struct ConfigResolver<'a, R: Runtime> {
    runtime: &'a R,
    settings_path: PathBuf,
    cached: OnceLock<ExtensionConfig>,
}

impl<'a, R: Runtime> ConfigResolver<'a, R> {
    pub fn new(runtime: &'a R, settings_path: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            settings_path: settings_path.into(),
            cached: OnceLock::new(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Get the configuration, reading the settings file on first use.
    ///
    /// Never fails: an unreadable or invalid settings file only disables
    /// customization.
    pub fn resolve(&self) -> &ExtensionConfig {
        self.cached.get_or_init(|| match self.load() {
            Ok(config) => config,
            Err(e) => {
                debug!("Using default configuration: {}", e);
                ExtensionConfig::default()
            }
        })
    }

    /// Forget the cached configuration so the next [`resolve`](Self::resolve) reads again.
    pub fn reset(&mut self) {
        self.cached.take();
    }

    /// Read and parse the settings file, bypassing the cache.
    ///
    /// Returns the default configuration when the file does not exist.
    pub fn load(&self) -> Result<ExtensionConfig> {
        if !self.runtime.exists(&self.settings_path) {
            debug!(
                "No global settings at {:?}, using defaults",
                self.settings_path
            );
            return Ok(ExtensionConfig::default());
        }

        let content =
            self.runtime
                .read_to_string(&self.settings_path)
                .map_err(|e| Error::ConfigParse {
                    path: self.settings_path.clone(),
                    reason: format!("{:#}", e),
                })?;

        ExtensionConfig::from_settings(&content).map_err(|reason| Error::ConfigParse {
            path: self.settings_path.clone(),
            reason,
        })
    }
}
