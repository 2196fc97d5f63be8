//! Audio player for spoken summaries.
//!
//! The backend stores generated audio and serves it under `/audio/{name}`.
//! Playing it from the terminal means downloading it into the audio
//! directory and handing the file to an external player program.

use crate::api::DashboardBackend;
use crate::config::DashboardConfig;
use crate::utils::audio_file_name;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// State of the audio player widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioPlayer {
    visible: bool,
    src: Option<String>,
    local_file: Option<PathBuf>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Playable URL path, `/audio/{name}`.
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    /// Where the last played file was downloaded to.
    pub fn local_file(&self) -> Option<&Path> {
        self.local_file.as_deref()
    }

    /// Point the player at the audio the backend referenced and reveal it.
    ///
    /// # Returns
    ///
    /// The served file name, or `None` if the reference names no file. The
    /// player is left untouched in that case.
    pub fn load(&mut self, reference: &str) -> Option<String> {
        let name = audio_file_name(reference)?.to_string();
        self.src = Some(format!("/audio/{name}"));
        self.visible = true;
        Some(name)
    }

    /// Download the audio and start the configured player on it.
    ///
    /// The player runs detached; this returns once it has been spawned.
    /// Without a configured player the file is only downloaded.
    #[instrument(level = "info", skip_all, fields(%name))]
    pub async fn play<B: DashboardBackend>(
        &mut self,
        backend: &B,
        name: &str,
        config: &DashboardConfig,
    ) -> Result<(), Box<dyn Error>> {
        let bytes = backend.fetch_audio(name).await?;

        fs::create_dir_all(&config.audio_dir).await?;
        let path = Path::new(&config.audio_dir).join(name);
        fs::write(&path, &bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "Saved audio");
        self.local_file = Some(path.clone());

        match config.player_command() {
            Some((program, args)) => {
                let child = Command::new(&program).args(&args).arg(&path).spawn()?;
                info!(%program, pid = ?child.id(), "Started audio player");
            }
            None => warn!("No audio player configured; audio saved only"),
        }
        Ok(())
    }
}
