//! Interactive dashboard session.
//!
//! Reads one command per line, dispatches it to the [`Dashboard`], then
//! prints the status entries the command produced followed by the view it
//! changed. The dashboard keeps its data between commands, so a harvest
//! can be followed by `summary`, `speak`, `show`, and so on.

use crate::api::DashboardBackend;
use crate::dashboard::{Action, Dashboard};
use crate::outputs::markdown::{
    analysis_to_markdown, chart_to_markdown, files_to_markdown, modal_to_markdown,
    panel_to_markdown, stats_to_markdown,
};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, instrument};

pub const HELP: &str = "\
Commands:
  files                 refresh and list saved news files
  select <n>            select saved file n (0 clears the selection)
  harvest               harvest fresh news
  load [file]           load the named or selected saved file
  overview              show counters and charts
  list [category]       show article cards (all categories by default)
  show <category> <n>   show article n of a category in full
  close                 close the article view
  summary               generate a summary of the loaded news
  analyze               analyze trends in the loaded news
  speak                 convert the summary to speech and play it
  status                show which actions are available
  help                  show this help
  quit                  end the session";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Files,
    Select(usize),
    Harvest,
    Load(Option<String>),
    Overview,
    List(Option<String>),
    /// Category and 1-based position.
    Show(String, usize),
    Close,
    Summary,
    Analyze,
    Speak,
    Status,
    Help,
    Quit,
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (verb.to_lowercase().as_str(), rest.as_slice()) {
        ("files", []) => ShellCommand::Files,
        ("select", [n]) => ShellCommand::Select(parse_number(n)?),
        ("harvest", []) => ShellCommand::Harvest,
        ("load", []) => ShellCommand::Load(None),
        ("load", [file]) => ShellCommand::Load(Some(file.to_string())),
        ("overview", []) => ShellCommand::Overview,
        ("list", []) => ShellCommand::List(None),
        ("list", [category]) => ShellCommand::List(Some(category.to_lowercase())),
        ("show", [category, n]) => {
            ShellCommand::Show(category.to_lowercase(), parse_number(n)?)
        }
        ("close", []) => ShellCommand::Close,
        ("summary" | "summarize", []) => ShellCommand::Summary,
        ("analyze" | "analyse", []) => ShellCommand::Analyze,
        ("speak", []) => ShellCommand::Speak,
        ("status", []) => ShellCommand::Status,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit", []) => ShellCommand::Quit,
        _ => return Err(format!("Unrecognized command: {}. Type 'help'.", line.trim())),
    };
    Ok(Some(command))
}

fn parse_number(word: &str) -> Result<usize, String> {
    word.parse()
        .map_err(|_| format!("Expected a number, got '{word}'."))
}

/// Counters and both charts.
pub fn render_overview<B: DashboardBackend>(dashboard: &Dashboard<B>) -> String {
    let mut md = String::new();
    md.push_str(&stats_to_markdown(&dashboard.view().stats));
    md.push('\n');
    md.push_str(&chart_to_markdown("Categories", dashboard.category_chart()));
    md.push('\n');
    md.push_str(&chart_to_markdown("Top Sources", dashboard.source_chart()));
    md
}

/// Article cards of one category, or of every panel.
pub fn render_panels<B: DashboardBackend>(
    dashboard: &Dashboard<B>,
    category: Option<&str>,
) -> String {
    dashboard
        .view()
        .panels
        .iter()
        .filter(|panel| category.is_none_or(|c| panel.category == c))
        .map(panel_to_markdown)
        .collect()
}

/// The saved-file selector, numbered for `select`.
pub fn render_files<B: DashboardBackend>(dashboard: &Dashboard<B>) -> String {
    let files = dashboard.files();
    let numbered: Vec<String> = files
        .options()
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let marker = if file == files.value() { " (selected)" } else { "" };
            format!("{}. {file}{marker}", i + 1)
        })
        .collect();
    files_to_markdown(&format!("0. {}", files.placeholder()), &numbered)
}

pub fn render_status<B: DashboardBackend>(dashboard: &Dashboard<B>) -> String {
    let controls = dashboard.controls();
    let flag = |enabled: bool| if enabled { "enabled" } else { "disabled" };
    let audio = match (dashboard.audio().is_visible(), dashboard.audio().src()) {
        (true, Some(src)) => match dashboard.audio().local_file() {
            Some(path) => format!("{src} (saved to {})", path.display()),
            None => src.to_string(),
        },
        _ => "hidden".to_string(),
    };
    let mut status = format!(
        "- summary: {}\n- analyze: {}\n- speak: {}\n- loading: {}\n- audio player: {audio}\n",
        flag(controls.generate_summary),
        flag(controls.analyze_trends),
        flag(controls.convert_to_speech),
        if dashboard.loading().is_visible() { "yes" } else { "no" },
    );
    if let Some(entry) = dashboard.log().last() {
        status.push_str(&format!("- last message: {entry}\n"));
    }
    status
}

/// Print status entries appended since `cursor` and advance it.
fn flush_log<B: DashboardBackend>(
    dashboard: &Dashboard<B>,
    cursor: &mut usize,
    out: &mut impl Write,
) -> std::io::Result<()> {
    for entry in dashboard.log().since(*cursor) {
        writeln!(out, "{entry}")?;
    }
    *cursor = dashboard.log().len();
    Ok(())
}

/// Run a session until `quit` or end of input.
#[instrument(level = "info", skip_all)]
pub async fn run<B, R, W>(
    dashboard: &mut Dashboard<B>,
    input: R,
    out: &mut W,
) -> std::io::Result<()>
where
    B: DashboardBackend,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut cursor = 0;
    dashboard.start().await;
    writeln!(
        out,
        "News dashboard at {}. Type 'help' for commands.",
        dashboard.config().base_url
    )?;
    flush_log(dashboard, &mut cursor, out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        debug!(?command, "Shell command");

        let view = match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => Some(HELP.to_string()),
            ShellCommand::Status => Some(render_status(dashboard)),
            ShellCommand::Overview => Some(render_overview(dashboard)),
            ShellCommand::List(category) => Some(render_panels(dashboard, category.as_deref())),
            ShellCommand::Close => {
                dashboard.close_modal();
                None
            }
            ShellCommand::Select(position) => {
                dashboard.files_mut().select(position);
                Some(render_files(dashboard))
            }
            ShellCommand::Files => {
                let ok = dashboard.dispatch(Action::RefreshFiles).await.is_ok();
                ok.then(|| render_files(dashboard))
            }
            ShellCommand::Harvest => {
                let ok = dashboard.dispatch(Action::Harvest).await.is_ok();
                ok.then(|| render_overview(dashboard))
            }
            ShellCommand::Load(file) => {
                let file = file.unwrap_or_else(|| dashboard.files().value().to_string());
                let ok = dashboard.dispatch(Action::LoadFile(file)).await.is_ok();
                ok.then(|| render_overview(dashboard))
            }
            ShellCommand::Show(category, position) => {
                let action = Action::ShowArticle { category, position };
                let ok = dashboard.dispatch(action).await.is_ok();
                ok.then(|| dashboard.modal().map(modal_to_markdown))
                    .flatten()
            }
            ShellCommand::Summary => {
                let ok = dashboard.dispatch(Action::GenerateSummary).await.is_ok();
                ok.then(|| dashboard.summary().map(|s| format!("{s}\n")))
                    .flatten()
            }
            ShellCommand::Analyze => {
                let ok = dashboard.dispatch(Action::AnalyzeTrends).await.is_ok();
                ok.then(|| dashboard.analysis().map(analysis_to_markdown))
                    .flatten()
            }
            ShellCommand::Speak => {
                let ok = dashboard.dispatch(Action::ConvertToSpeech).await.is_ok();
                ok.then(|| render_status(dashboard))
            }
        };

        flush_log(dashboard, &mut cursor, out)?;
        if let Some(view) = view {
            writeln!(out, "\n{}", view.trim_end())?;
        }
    }
    Ok(())
}
