//! Chart models for the dataset overview.
//!
//! Charts are owned by the dashboard and replaced wholesale on every
//! render. Each keeps its labels and values as parallel series, the way a
//! chart widget consumes them.

use itertools::Itertools;

/// Maximum number of bars in the source chart.
pub const TOP_SOURCES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
}

/// A single-series chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    /// Series label shown in the legend, if any.
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    /// Incremented on every update so front-ends can tell a redraw is due.
    pub revision: u64,
}

impl Chart {
    /// The category distribution pie.
    pub fn category_distribution() -> Self {
        Self {
            kind: ChartKind::Pie,
            title: None,
            labels: Vec::new(),
            values: Vec::new(),
            revision: 0,
        }
    }

    /// The articles-per-source bar chart.
    pub fn top_sources() -> Self {
        Self {
            kind: ChartKind::Bar,
            title: Some("Articles per Source".to_string()),
            labels: Vec::new(),
            values: Vec::new(),
            revision: 0,
        }
    }

    /// Replace both series and mark the chart for redraw.
    pub fn update(&mut self, labels: Vec<String>, values: Vec<usize>) {
        debug_assert_eq!(labels.len(), values.len());
        self.labels = labels;
        self.values = values;
        self.revision += 1;
    }

    /// Label/value pairs in display order.
    pub fn points(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Per-source article counter that remembers first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTally {
    counts: Vec<(String, usize)>,
}

impl SourceTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: &str) {
        match self.counts.iter_mut().find(|(name, _)| name == source) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((source.to_string(), 1)),
        }
    }

    /// Number of distinct sources seen.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// The `n` sources with the most articles, descending.
    ///
    /// The sort is stable, so equal counts keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        self.counts
            .iter()
            .cloned()
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(n)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(counts: &[(&str, usize)]) -> SourceTally {
        let mut tally = SourceTally::new();
        for (source, count) in counts {
            for _ in 0..*count {
                tally.add(source);
            }
        }
        tally
    }

    #[test]
    fn test_top_sources_descending_with_stable_ties() {
        let tally = tally(&[("A", 3), ("B", 5), ("C", 1), ("D", 5), ("E", 2), ("F", 4)]);
        let top = tally.top(TOP_SOURCES);
        let names: Vec<&str> = top.iter().map(|(n, _)| n.as_str()).collect();
        let counts: Vec<usize> = top.iter().map(|(_, c)| *c).collect();
        assert_eq!(names, vec!["B", "D", "F", "A", "E"]);
        assert_eq!(counts, vec![5, 5, 4, 3, 2]);
    }

    #[test]
    fn test_top_sources_fewer_than_limit() {
        let tally = tally(&[("FBC", 2), ("Fiji Village", 1)]);
        assert_eq!(tally.top(TOP_SOURCES).len(), 2);
        assert_eq!(tally.distinct(), 2);
    }

    #[test]
    fn test_interleaved_counting_keeps_first_seen_order() {
        let mut tally = SourceTally::new();
        for source in ["X", "Y", "Y", "X", "Z"] {
            tally.add(source);
        }
        let top = tally.top(3);
        assert_eq!(top[0], ("X".to_string(), 2));
        assert_eq!(top[1], ("Y".to_string(), 2));
        assert_eq!(top[2], ("Z".to_string(), 1));
    }

    #[test]
    fn test_update_bumps_revision() {
        let mut chart = Chart::category_distribution();
        assert!(chart.is_empty());
        chart.update(vec!["Politics".to_string()], vec![3]);
        chart.update(vec!["Sports".to_string()], vec![1]);
        assert_eq!(chart.revision, 2);
        assert_eq!(chart.points().collect::<Vec<_>>(), vec![("Sports", 1)]);
    }
}
