//! Layered settings: defaults, optional TOML file, then `PROBEWATCH_*`
//! environment variables. Command-line flags are applied on top by the
//! binary.
//!
//! ```toml
//! [api]
//! base_url = "https://status.example.com"
//! timeout_secs = 10
//!
//! [refresh]
//! poll_interval_secs = 30
//!
//! [ui]
//! color_mode = "hashed"
//! default_range = "6h"
//!
//! [log]
//! level = "debug"
//! file = "/tmp/probewatch.log"
//! ```
//!
//! Nested keys map to environment variables with a double underscore, e.g.
//! `PROBEWATCH_API__BASE_URL`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use probewatch_types::TimeRange;
use serde::Deserialize;

use crate::ui::palette::ColorMode;

pub const ENV_PREFIX: &str = "PROBEWATCH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Pre-issued session token, sent as a bearer token.
    pub token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
            token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Poll interval for monitor detail, agent stats and the monitor list.
    pub poll_interval_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub color_mode: ColorMode,
    pub default_range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub refresh: RefreshSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Load from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let settings: Settings = builder
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            bail!("api.base_url must not be empty");
        }
        if self.refresh.poll_interval_secs == 0 {
            bail!("refresh.poll_interval_secs must be at least 1");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
