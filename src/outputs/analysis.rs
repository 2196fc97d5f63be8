//! Trend analysis report view.

use crate::models::AnalysisResult;
use crate::utils::upcase;
use itertools::Itertools;

/// Shown in place of threat cards when the backend found none.
pub const NO_THREATS: &str = "No significant threats detected.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatCard {
    pub title: String,
    /// `"{source} - {date}"`
    pub byline: String,
    /// Keywords joined by `", "`.
    pub keywords: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyCard {
    /// Strategy type with its first letter capitalized.
    pub kind: String,
    pub description: String,
    /// `"Based on N articles"`, only when the backend gave a non-zero count.
    pub footnote: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreatSection {
    Empty(String),
    Threats(Vec<ThreatCard>),
}

/// A rendered analysis report.
///
/// Mitigations have no empty-state placeholder; an empty list renders as
/// just the section heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    /// `"Analysis Generated on {timestamp}"`
    pub heading: String,
    pub total_articles: u64,
    pub top_topics: Vec<String>,
    pub common_phrases: Vec<String>,
    pub threats: ThreatSection,
    pub mitigations: Vec<StrategyCard>,
}

pub fn render_analysis(analysis: &AnalysisResult) -> AnalysisReport {
    let threats = if analysis.emerging_threats.is_empty() {
        ThreatSection::Empty(NO_THREATS.to_string())
    } else {
        ThreatSection::Threats(
            analysis
                .emerging_threats
                .iter()
                .map(|threat| ThreatCard {
                    title: threat.title.clone(),
                    byline: format!("{} - {}", threat.source, threat.date),
                    keywords: threat.keywords.iter().join(", "),
                    summary: threat.summary.clone(),
                })
                .collect(),
        )
    };

    let mitigations = analysis
        .mitigation_strategies
        .iter()
        .map(|strategy| StrategyCard {
            kind: upcase(&strategy.kind),
            description: strategy.description.clone(),
            footnote: strategy
                .articles
                .filter(|&n| n > 0)
                .map(|n| format!("Based on {n} articles")),
        })
        .collect();

    AnalysisReport {
        heading: format!("Analysis Generated on {}", analysis.timestamp),
        total_articles: analysis.overview.total_articles,
        top_topics: analysis.trends.top_topics.clone(),
        common_phrases: analysis.trends.common_phrases.clone(),
        threats,
        mitigations,
    }
}
