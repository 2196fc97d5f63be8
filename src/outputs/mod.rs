//! View models and their terminal rendering.
//!
//! # Submodules
//!
//! - [`dataset`]: article panels, counters and chart series for a dataset
//! - [`charts`]: the category pie and top-sources bar chart models
//! - [`analysis`]: the trend analysis report
//! - [`article`]: the article detail view
//! - [`markdown`]: Markdown text for all of the above
//!
//! The view builders are pure functions of the data they are given; the
//! dashboard decides when to call them and owns the results.

pub mod analysis;
pub mod article;
pub mod charts;
pub mod dataset;
pub mod markdown;
