//! Article detail view.

use crate::models::Article;
use itertools::Itertools;

/// The article detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleModal {
    pub heading: String,
    /// Source, published date and category, in that order.
    pub badges: [String; 3],
    /// Body text, one entry per line of the original.
    pub body_lines: Vec<String>,
    /// Keywords joined by `", "`.
    pub keywords: String,
    /// Target of the "read at source" link.
    pub source_link: String,
}

impl ArticleModal {
    pub fn from_article(article: &Article) -> Self {
        Self {
            heading: article.title.clone(),
            badges: [
                article.source.clone(),
                article.published_date.clone(),
                article.category.clone(),
            ],
            body_lines: article.text.split('\n').map(str::to_string).collect(),
            keywords: article.keywords.iter().join(", "),
            source_link: article.url.clone(),
        }
    }
}
