//! # Configuration Persistence
//!
//! Manages user configuration stored in `~/.config/clipdeck/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is serialized to / deserialized from a JSON file in
//! the user's XDG config directory. Every field has a default, so a missing
//! file or a partial file both load cleanly.
//!
//! ```json
//! {
//!   "server_url": "http://localhost:8000",
//!   "timeout_secs": 300,
//!   "theme": "Catppuccin Mocha",
//!   "default_layout": "landscape",
//!   "default_font_size": 48,
//!   "default_font_family": "Arial",
//!   "player": "mpv"
//! }
//! ```
//!
//! The server URL is resolved as: CLI flag, then `CLIPDECK_SERVER`, then this
//! file, then the built-in default.

use crate::clip::{GenerationOptions, Layout};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the configured server URL.
pub const SERVER_ENV_VAR: &str = "CLIPDECK_SERVER";

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the clip backend.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// HTTP timeout. Rendering can take minutes.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// The name of the selected theme (must match a built-in theme name).
    #[serde(default = "default_theme_name")]
    pub theme: String,

    #[serde(default)]
    pub default_layout: Layout,

    #[serde(default = "default_font_size")]
    pub default_font_size: u32,

    #[serde(default = "default_font_family")]
    pub default_font_family: String,

    /// Command used to play clips and rendered videos.
    #[serde(default = "default_player")]
    pub player: String,
}

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_theme_name() -> String {
    "Catppuccin Mocha".to_string()
}

fn default_font_size() -> u32 {
    48
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_player() -> String {
    "mpv".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
            theme: default_theme_name(),
            default_layout: Layout::default(),
            default_font_size: default_font_size(),
            default_font_family: default_font_family(),
            player: default_player(),
        }
    }
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Falling back to default config: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Pick the server URL: explicit override, then environment, then file.
    pub fn resolve_server_url(&self, cli_override: Option<&str>) -> String {
        let from_env = std::env::var(SERVER_ENV_VAR).ok();
        pick_server_url(cli_override, from_env.as_deref(), &self.server_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Initial values for the option fields.
    pub fn generation_defaults(&self) -> GenerationOptions {
        GenerationOptions {
            layout: self.default_layout,
            script: String::new(),
            font_size: self.default_font_size.max(1),
            font_family: self.default_font_family.clone(),
        }
    }

    /// Return the path to the config file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "clipdeck")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}

fn pick_server_url(cli: Option<&str>, env: Option<&str>, file: &str) -> String {
    [cli, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(file)
        .to_string()
}
