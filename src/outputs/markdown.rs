//! Markdown rendering of the dashboard views for the terminal.
//!
//! Each function turns one view model into a Markdown block. The shell and
//! the one-shot commands print these blocks to stdout.

use crate::outputs::analysis::{AnalysisReport, ThreatSection};
use crate::outputs::article::ArticleModal;
use crate::outputs::charts::{Chart, ChartKind};
use crate::outputs::dataset::{CategoryPanel, DatasetStats, PanelContent};
use crate::utils::upcase;
use std::fmt::Write;

/// Width of the longest bar in a bar chart, in characters.
const BAR_WIDTH: usize = 30;

/// The three counters as a one-line table.
pub fn stats_to_markdown(stats: &DatasetStats) -> String {
    let mut md = String::new();
    writeln!(md, "| Total Articles | Categories | Sources |").unwrap();
    writeln!(md, "|---:|---:|---:|").unwrap();
    writeln!(
        md,
        "| {} | {} | {} |",
        stats.total_articles, stats.categories, stats.sources
    )
    .unwrap();
    md
}

/// Render a chart as text: bars for bar charts, shares for pies.
pub fn chart_to_markdown(heading: &str, chart: &Chart) -> String {
    let mut md = String::new();
    writeln!(md, "### {heading}\n").unwrap();
    if chart.is_empty() {
        writeln!(md, "_No data._").unwrap();
        return md;
    }
    if let Some(title) = &chart.title {
        writeln!(md, "_{title}_\n").unwrap();
    }

    let total: usize = chart.values.iter().sum();
    let max = chart.values.iter().copied().max().unwrap_or(0);
    let label_width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    writeln!(md, "```text").unwrap();
    for (label, value) in chart.points() {
        match chart.kind {
            ChartKind::Bar => {
                let len = if max == 0 { 0 } else { value * BAR_WIDTH / max };
                writeln!(md, "{label:<label_width$} {} {value}", "█".repeat(len)).unwrap();
            }
            ChartKind::Pie => {
                let share = if total == 0 {
                    0.0
                } else {
                    value as f64 * 100.0 / total as f64
                };
                writeln!(md, "{label:<label_width$} {value:>4} ({share:5.1}%)").unwrap();
            }
        }
    }
    writeln!(md, "```").unwrap();
    md
}

/// One category panel with its cards.
pub fn panel_to_markdown(panel: &CategoryPanel) -> String {
    let mut md = String::new();
    writeln!(md, "## {}\n", upcase(&panel.category)).unwrap();
    match &panel.content {
        PanelContent::Cleared => {}
        PanelContent::Placeholder(text) => writeln!(md, "_{text}_\n").unwrap(),
        PanelContent::Cards(cards) => {
            for card in cards {
                writeln!(
                    md,
                    "{}. `{}` **{}** · {} · {}",
                    card.index + 1,
                    card.category,
                    card.source,
                    card.published_date,
                    card.title
                )
                .unwrap();
                if !card.summary.is_empty() {
                    writeln!(md, "   > {}", card.summary).unwrap();
                }
            }
            md.push('\n');
        }
    }
    md
}

pub fn analysis_to_markdown(report: &AnalysisReport) -> String {
    let mut md = String::new();
    writeln!(md, "# {}\n", report.heading).unwrap();

    writeln!(md, "## Overview\n").unwrap();
    writeln!(md, "Total Articles: {}\n", report.total_articles).unwrap();

    writeln!(md, "## Top Topics\n").unwrap();
    for topic in &report.top_topics {
        writeln!(md, "- {topic}").unwrap();
    }
    md.push('\n');

    writeln!(md, "## Common Phrases\n").unwrap();
    for phrase in &report.common_phrases {
        writeln!(md, "- {phrase}").unwrap();
    }
    md.push('\n');

    writeln!(md, "## Emerging Threats\n").unwrap();
    match &report.threats {
        ThreatSection::Empty(text) => writeln!(md, "{text}\n").unwrap(),
        ThreatSection::Threats(cards) => {
            for threat in cards {
                writeln!(md, "### {}\n", threat.title).unwrap();
                writeln!(md, "{}\n", threat.byline).unwrap();
                writeln!(md, "**Keywords:** {}\n", threat.keywords).unwrap();
                writeln!(md, "**Summary:** {}\n", threat.summary).unwrap();
            }
        }
    }

    writeln!(md, "## Mitigation Strategies\n").unwrap();
    for strategy in &report.mitigations {
        writeln!(md, "### {}\n", strategy.kind).unwrap();
        writeln!(md, "{}\n", strategy.description).unwrap();
        if let Some(footnote) = &strategy.footnote {
            writeln!(md, "<small>{footnote}</small>\n").unwrap();
        }
    }
    md
}

/// The article detail view. Body lines become hard line breaks.
pub fn modal_to_markdown(modal: &ArticleModal) -> String {
    let mut md = String::new();
    writeln!(md, "# {}\n", modal.heading).unwrap();
    writeln!(
        md,
        "`{}` `{}` `{}`\n",
        modal.badges[0], modal.badges[1], modal.badges[2]
    )
    .unwrap();
    writeln!(md, "{}\n", modal.body_lines.join("  \n")).unwrap();
    writeln!(md, "**Keywords:** {}\n", modal.keywords).unwrap();
    writeln!(md, "[Read at source]({})", modal.source_link).unwrap();
    md
}

/// The saved-file selector; the placeholder is always the first option.
pub fn files_to_markdown(placeholder: &str, files: &[String]) -> String {
    let mut md = String::new();
    writeln!(md, "- {placeholder}").unwrap();
    for file in files {
        writeln!(md, "- {file}").unwrap();
    }
    md
}
