//! Dashboard configuration.
//!
//! Settings are layered: built-in defaults, then the optional YAML file,
//! then command-line flags and their environment variables.
//!
//! ```yaml
//! base_url: http://127.0.0.1:5000
//! audio_dir: ./audio
//! player: mpv --no-video
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::error::Error;
use tracing::{info, instrument};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_AUDIO_DIR: &str = "./audio";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Root URL of the dashboard backend.
    pub base_url: String,
    /// Where generated audio is downloaded to before playback.
    pub audio_dir: String,
    /// Player command line; the audio file path is appended as the last argument.
    pub player: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            audio_dir: DEFAULT_AUDIO_DIR.to_string(),
            player: None,
        }
    }
}

impl DashboardConfig {
    /// Parse a YAML config document. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build the effective configuration for a parsed command line.
    #[instrument(level = "info", skip_all, fields(config = ?cli.config))]
    pub fn resolve(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let mut config = match &cli.config {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read config file {path}: {e}"))?;
                let config = Self::from_yaml(&yaml)?;
                info!(%path, "Loaded configuration");
                config
            }
            None => Self::default(),
        };

        if let Some(base_url) = &cli.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(audio_dir) = &cli.audio_dir {
            config.audio_dir = audio_dir.clone();
        }
        if let Some(player) = &cli.player {
            config.player = Some(player.clone());
        }
        Ok(config)
    }

    /// The player program and its leading arguments, if a player is set.
    pub fn player_command(&self) -> Option<(String, Vec<String>)> {
        let mut parts = self.player.as_deref()?.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}
