//! Data models exchanged with the dashboard backend.
//!
//! This module defines the structures decoded from the backend's JSON:
//! - [`Article`]: a single classified news article
//! - [`NewsDataset`]: articles grouped by category, in the order received
//! - [`AnalysisResult`]: the trend analysis report and its parts
//!
//! Decoding is tolerant: missing or `null` strings become empty and missing
//! or `null` lists become empty, so a partially filled article still renders.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The categories the backend classifier assigns, in display order.
pub const KNOWN_CATEGORIES: [&str; 5] = ["politics", "community", "sports", "crime", "others"];

/// Decode an explicit `null` as the type's default, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A news article as classified by the backend.
///
/// Articles are immutable once received. They have no stable id; an
/// article is identified by its category and position in the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Article {
    /// Name of the outlet the article was harvested from.
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    /// Publication date as reported by the outlet.
    #[serde(deserialize_with = "null_as_default")]
    pub published_date: String,
    /// The article headline.
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Short summary shown on the article card.
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    /// Full article body; may contain newlines.
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// Category assigned by the backend classifier.
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    /// Keywords extracted by the backend.
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    /// Link to the original article.
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// Articles grouped by category.
///
/// Category order is the key order of the JSON object the backend sent.
/// That order is kept through decoding and encoding, so the dataset posted
/// back for summaries and analysis matches what was received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsDataset {
    categories: Vec<(String, Vec<Article>)>,
}

impl NewsDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category, or replace the articles of an existing one in place.
    pub fn insert(&mut self, category: impl Into<String>, articles: Vec<Article>) {
        let category = category.into();
        match self.categories.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = articles,
            None => self.categories.push((category, articles)),
        }
    }

    /// Iterate categories in received order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Article])> {
        self.categories
            .iter()
            .map(|(name, articles)| (name.as_str(), articles.as_slice()))
    }

    pub fn get(&self, category: &str) -> Option<&[Article]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, articles)| articles.as_slice())
    }

    /// Look up an article by its position.
    pub fn article(&self, category: &str, index: usize) -> Option<&Article> {
        self.get(category).and_then(|articles| articles.get(index))
    }

    /// Number of categories present, empty ones included.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn total_articles(&self) -> usize {
        self.categories.iter().map(|(_, a)| a.len()).sum()
    }
}

impl Serialize for NewsDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (name, articles) in &self.categories {
            map.serialize_entry(name, articles)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NewsDataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DatasetVisitor;

        impl<'de> Visitor<'de> for DatasetVisitor {
            type Value = NewsDataset;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping category names to article lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut dataset = NewsDataset::new();
                while let Some((name, articles)) =
                    access.next_entry::<String, Option<Vec<Article>>>()?
                {
                    dataset.insert(name, articles.unwrap_or_default());
                }
                Ok(dataset)
            }
        }

        deserializer.deserialize_map(DatasetVisitor)
    }
}

/// Trend analysis report computed by the backend over a dataset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisResult {
    /// When the backend produced the report.
    pub timestamp: String,
    pub overview: Overview,
    pub trends: Trends,
    pub emerging_threats: Vec<Threat>,
    pub mitigation_strategies: Vec<MitigationStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Overview {
    pub total_articles: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Trends {
    #[serde(deserialize_with = "null_as_default")]
    pub top_topics: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub common_phrases: Vec<String>,
}

/// An article the backend flagged as a potential threat.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Threat {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

/// A suggested response to the detected trends.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MitigationStrategy {
    /// Strategy kind, e.g. "community" or "awareness".
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// Number of articles the strategy is based on, when the backend knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub articles: Option<u64>,
}
