//! Dataset rendering: article panels, counters and chart series.
//!
//! [`render_dataset`] walks a [`NewsDataset`] once, in category order, and
//! produces everything the overview shows. Cards point back into the
//! dataset by position rather than carrying a copy of the article.

use crate::models::{KNOWN_CATEGORIES, NewsDataset};
use crate::outputs::charts::{SourceTally, TOP_SOURCES};
use crate::utils::upcase;
use tracing::{debug, instrument};

/// One article card in a category panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    pub category: String,
    /// Position of the article within its category.
    pub index: usize,
    pub source: String,
    pub published_date: String,
    pub title: String,
    pub summary: String,
}

/// Contents of one category panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelContent {
    /// Nothing rendered; the category is absent from the dataset.
    #[default]
    Cleared,
    /// The category is present but has no articles.
    Placeholder(String),
    Cards(Vec<ArticleCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPanel {
    pub category: String,
    pub content: PanelContent,
}

/// The scalar counters above the panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetStats {
    pub total_articles: usize,
    pub categories: usize,
    pub sources: usize,
}

/// Everything a render of the dataset produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetView {
    pub panels: Vec<CategoryPanel>,
    pub stats: DatasetStats,
    pub category_labels: Vec<String>,
    pub category_counts: Vec<usize>,
    pub source_labels: Vec<String>,
    pub source_counts: Vec<usize>,
}

impl Default for DatasetView {
    /// Empty panels for every known category, as shown before any load.
    fn default() -> Self {
        Self {
            panels: KNOWN_CATEGORIES
                .iter()
                .map(|category| CategoryPanel {
                    category: category.to_string(),
                    content: PanelContent::Cleared,
                })
                .collect(),
            stats: DatasetStats::default(),
            category_labels: Vec::new(),
            category_counts: Vec::new(),
            source_labels: Vec::new(),
            source_counts: Vec::new(),
        }
    }
}

impl DatasetView {
    pub fn panel(&self, category: &str) -> Option<&CategoryPanel> {
        self.panels.iter().find(|p| p.category == category)
    }
}

/// Placeholder shown for a category without articles.
pub fn empty_placeholder(category: &str) -> String {
    format!("No {category} news available.")
}

/// Build the view of a dataset.
///
/// Panels for the known categories always exist, in their fixed order;
/// categories the backend invents get extra panels after them.
#[instrument(level = "debug", skip_all, fields(categories = dataset.category_count()))]
pub fn render_dataset(dataset: &NewsDataset) -> DatasetView {
    let mut view = DatasetView::default();
    let mut tally = SourceTally::new();

    for (category, articles) in dataset.iter() {
        view.stats.total_articles += articles.len();
        view.category_labels.push(upcase(category));
        view.category_counts.push(articles.len());

        for article in articles {
            tally.add(&article.source);
        }

        let content = if articles.is_empty() {
            PanelContent::Placeholder(empty_placeholder(category))
        } else {
            PanelContent::Cards(
                articles
                    .iter()
                    .enumerate()
                    .map(|(index, article)| ArticleCard {
                        category: category.to_string(),
                        index,
                        source: article.source.clone(),
                        published_date: article.published_date.clone(),
                        title: article.title.clone(),
                        summary: article.summary.clone(),
                    })
                    .collect(),
            )
        };

        match view.panels.iter_mut().find(|p| p.category == category) {
            Some(panel) => panel.content = content,
            None => view.panels.push(CategoryPanel {
                category: category.to_string(),
                content,
            }),
        }
    }

    view.stats.categories = dataset.category_count();
    view.stats.sources = tally.distinct();

    let (source_labels, source_counts): (Vec<String>, Vec<usize>) =
        tally.top(TOP_SOURCES).into_iter().unzip();
    view.source_labels = source_labels;
    view.source_counts = source_counts;

    debug!(
        total = view.stats.total_articles,
        sources = view.stats.sources,
        "Rendered dataset"
    );
    view
}
