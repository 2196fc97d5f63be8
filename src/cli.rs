//! Command-line interface definitions for the news dashboard.
//!
//! Connection and playback options can come from flags, environment
//! variables, or a YAML config file (see [`crate::config`]).

use clap::{Parser, Subcommand};

/// Command-line arguments for the news dashboard.
///
/// # Examples
///
/// ```sh
/// # Interactive session against a local backend
/// news_dashboard --base-url http://127.0.0.1:5000
///
/// # Harvest once and print the overview
/// news_dashboard harvest
///
/// # Summarize a saved file and play the summary
/// news_dashboard --player "mpv --no-video" summarize --file fiji_news_20250506_101500.json --speak
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL of the dashboard backend
    #[arg(short, long, env = "NEWS_DASHBOARD_URL")]
    pub base_url: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory generated audio is downloaded into
    #[arg(long, env = "NEWS_DASHBOARD_AUDIO_DIR")]
    pub audio_dir: Option<String>,

    /// Command that plays an audio file, e.g. "mpv --no-video"
    #[arg(long, env = "NEWS_DASHBOARD_PLAYER")]
    pub player: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive session that keeps the loaded data between commands (default)
    Shell,
    /// List saved news files
    Files,
    /// Harvest fresh articles and show the overview
    Harvest,
    /// Load a saved news file and show the overview
    Load {
        /// Name of a saved news file
        filename: String,
    },
    /// Generate a summary of a saved file, or of a fresh harvest
    Summarize {
        /// Saved news file to summarize instead of harvesting
        #[arg(short, long)]
        file: Option<String>,
        /// Convert the summary to speech and play it
        #[arg(long)]
        speak: bool,
    },
    /// Analyze trends in a saved file, or in a fresh harvest
    Analyze {
        /// Saved news file to analyze instead of harvesting
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Show one article of a saved file in full
    Show {
        /// Name of a saved news file
        file: String,
        /// Category the article is listed under
        category: String,
        /// Position in the category list, starting at 1
        position: usize,
    },
}
