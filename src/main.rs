//! # News Dashboard
//!
//! A terminal front end for the news harvesting backend. It collects
//! articles from the backend's sources, loads previously saved harvests,
//! and shows them grouped by category with distribution charts. A loaded
//! dataset can be summarized, analyzed for trends and threats, and the
//! summary spoken aloud through a local audio player.
//!
//! ## Usage
//!
//! ```sh
//! news_dashboard --base-url http://127.0.0.1:5000
//! news_dashboard analyze --file fiji_news_20250506_101500.json
//! ```
//!
//! Without a subcommand an interactive session starts; it keeps the loaded
//! dataset and summary between commands. Subcommands run one action and
//! exit non-zero when it fails.

use clap::Parser;
use std::error::Error;
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod audio;
mod cli;
mod config;
mod dashboard;
mod models;
mod outputs;
mod shell;
mod status;
mod utils;

use api::{DashboardBackend, HttpBackend};
use cli::{Cli, Command};
use config::DashboardConfig;
use dashboard::{Action, Dashboard, DashboardError};
use outputs::markdown::{analysis_to_markdown, modal_to_markdown};

/// Filter used when `RUST_LOG` is unset.
///
/// Status entries are already printed on stdout, so their `status` target
/// mirror stays off unless `RUST_LOG` asks for it.
const DEFAULT_LOG_FILTER: &str = "warn,status=off";

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    // Diagnostics go to stderr so they never interleave with rendered views.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args.command, ?args.config, "Parsed CLI arguments");

    let config = DashboardConfig::resolve(&args)?;
    info!(base_url = %config.base_url, audio_dir = %config.audio_dir, "news_dashboard starting up");

    let backend = HttpBackend::new(&config.base_url)?;
    let mut dashboard = Dashboard::new(backend, config);

    let outcome: Result<(), Box<dyn Error>> = match args.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut out = std::io::stdout().lock();
            shell::run(&mut dashboard, input, &mut out).await?;
            Ok(())
        }
        command => run_once(&mut dashboard, command).await,
    };

    info!(elapsed_ms = start_time.elapsed().as_millis(), "news_dashboard finished");

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Already printed as a status entry.
        Err(e) if e.is::<DashboardError>() => {
            debug!(error = %e, "Command failed");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e),
    }
}

/// Run a single subcommand, printing the status log and the resulting view.
///
/// # Returns
///
/// The action's [`DashboardError`] when it failed, or the I/O error when
/// stdout could not be written.
#[instrument(level = "info", skip(dashboard))]
async fn run_once<B: DashboardBackend>(
    dashboard: &mut Dashboard<B>,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    let result = execute(dashboard, command).await;

    let mut out = std::io::stdout().lock();
    for entry in dashboard.log().entries() {
        writeln!(out, "{entry}")?;
    }
    if let Ok(Some(view)) = &result {
        writeln!(out, "\n{}", view.trim_end())?;
    }
    result?;
    Ok(())
}

/// Dispatch the actions behind `command` and render what it asks to see.
async fn execute<B: DashboardBackend>(
    dashboard: &mut Dashboard<B>,
    command: Command,
) -> Result<Option<String>, DashboardError> {
    let view = match command {
        Command::Shell => None,
        Command::Files => {
            dashboard.dispatch(Action::RefreshFiles).await?;
            Some(shell::render_files(dashboard))
        }
        Command::Harvest => {
            dashboard.dispatch(Action::Harvest).await?;
            Some(overview_with_panels(dashboard))
        }
        Command::Load { filename } => {
            dashboard.dispatch(Action::LoadFile(filename)).await?;
            Some(overview_with_panels(dashboard))
        }
        Command::Summarize { file, speak } => {
            acquire(dashboard, file).await?;
            dashboard.dispatch(Action::GenerateSummary).await?;
            if speak {
                dashboard.dispatch(Action::ConvertToSpeech).await?;
            }
            dashboard.summary().map(|s| format!("{s}\n"))
        }
        Command::Analyze { file } => {
            acquire(dashboard, file).await?;
            dashboard.dispatch(Action::AnalyzeTrends).await?;
            dashboard.analysis().map(analysis_to_markdown)
        }
        Command::Show {
            file,
            category,
            position,
        } => {
            dashboard.dispatch(Action::LoadFile(file)).await?;
            let action = Action::ShowArticle {
                category: category.to_lowercase(),
                position,
            };
            dashboard.dispatch(action).await?;
            dashboard.modal().map(modal_to_markdown)
        }
    };
    Ok(view)
}

/// Load `file` when given, otherwise harvest fresh articles.
async fn acquire<B: DashboardBackend>(
    dashboard: &mut Dashboard<B>,
    file: Option<String>,
) -> Result<(), DashboardError> {
    match file {
        Some(filename) => dashboard.dispatch(Action::LoadFile(filename)).await,
        None => dashboard.dispatch(Action::Harvest).await,
    }
}

fn overview_with_panels<B: DashboardBackend>(dashboard: &Dashboard<B>) -> String {
    format!(
        "{}\n{}",
        shell::render_overview(dashboard),
        shell::render_panels(dashboard, None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_silences_status_mirror() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let directives = filter.to_string();
        assert!(directives.contains("status=off"));
        assert!(directives.contains("warn"));
    }
}
