//! The dashboard controller.
//!
//! [`Dashboard`] owns the session: the loaded dataset and summary, every
//! view model, and the backend client. User actions enter through
//! [`Dashboard::dispatch`], which checks preconditions before any request
//! is made. Each action is one backend round trip followed by view updates.
//!
//! All failures end as a status log entry. They are also returned as a
//! [`DashboardError`] so one-shot callers can set an exit code.

use crate::api::{BackendError, DashboardBackend};
use crate::audio::AudioPlayer;
use crate::config::DashboardConfig;
use crate::models::NewsDataset;
use crate::outputs::analysis::{AnalysisReport, render_analysis};
use crate::outputs::article::ArticleModal;
use crate::outputs::charts::Chart;
use crate::outputs::dataset::{DatasetView, render_dataset};
use crate::status::{LoadingIndicator, StatusLog};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// Text of the selector's always-present first option.
pub const FILE_PLACEHOLDER: &str = "Select a saved news file";

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RefreshFiles,
    Harvest,
    LoadFile(String),
    GenerateSummary,
    AnalyzeTrends,
    ConvertToSpeech,
    /// Open the detail view of the article at 1-based `position` within
    /// `category`, the number its card is listed under.
    ShowArticle { category: String, position: usize },
}

/// A missing prerequisite for an action. No request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("Please select a news file to load.")]
    NoFileSelected,
    #[error("No news data loaded. Please harvest or load news first.")]
    NoDataset,
    #[error("No summary available. Please generate a summary first.")]
    NoSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Precondition(#[from] Precondition),
    #[error("{context}: {source}")]
    Backend {
        context: &'static str,
        #[source]
        source: BackendError,
    },
    #[error("No article {position} in {category}")]
    ArticleNotFound { category: String, position: usize },
    #[error("Error playing audio: {0}")]
    Playback(String),
}

/// Session data. Each successful load replaces it; nothing is merged.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    dataset: Option<Arc<NewsDataset>>,
    summary: Option<String>,
}

/// Which action controls are enabled.
///
/// Everything starts disabled. A dataset enables summary and analysis; a
/// summary enables speech.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub generate_summary: bool,
    pub analyze_trends: bool,
    pub convert_to_speech: bool,
}

/// The saved-file selector: a placeholder option followed by file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelector {
    placeholder: String,
    options: Vec<String>,
    selected: Option<String>,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self {
            placeholder: FILE_PLACEHOLDER.to_string(),
            options: Vec::new(),
            selected: None,
        }
    }
}

impl FileSelector {
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Replace every option after the placeholder. A selection survives
    /// only if its file is still listed.
    pub fn replace_options(&mut self, files: Vec<String>) {
        self.options = files;
        if let Some(selected) = &self.selected {
            if !self.options.contains(selected) {
                self.selected = None;
            }
        }
    }

    /// Select the option at 1-based `position`; 0 selects the placeholder.
    pub fn select(&mut self, position: usize) -> Option<&str> {
        self.selected = position
            .checked_sub(1)
            .and_then(|i| self.options.get(i))
            .cloned();
        self.selected.as_deref()
    }

    /// The selected file name, or `""` when the placeholder is selected.
    pub fn value(&self) -> &str {
        self.selected.as_deref().unwrap_or("")
    }
}

/// The dashboard controller.
pub struct Dashboard<B> {
    backend: B,
    config: DashboardConfig,
    state: AppState,
    log: StatusLog,
    loading: LoadingIndicator,
    controls: Controls,
    files: FileSelector,
    view: DatasetView,
    category_chart: Chart,
    source_chart: Chart,
    analysis: Option<AnalysisReport>,
    audio: AudioPlayer,
    modal: Option<ArticleModal>,
}

impl<B: DashboardBackend> Dashboard<B> {
    /// Create a dashboard with nothing loaded and every control disabled.
    ///
    /// # Arguments
    ///
    /// * `backend` - Client for the news backend
    /// * `config` - Resolved settings; the audio directory and player are
    ///   read when a summary is spoken
    pub fn new(backend: B, config: DashboardConfig) -> Self {
        Self {
            backend,
            config,
            state: AppState::default(),
            log: StatusLog::new(),
            loading: LoadingIndicator::new(),
            controls: Controls::default(),
            files: FileSelector::default(),
            view: DatasetView::default(),
            category_chart: Chart::category_distribution(),
            source_chart: Chart::top_sources(),
            analysis: None,
            audio: AudioPlayer::new(),
            modal: None,
        }
    }

    /// Announce readiness and fetch the saved-file list.
    pub async fn start(&mut self) {
        self.log.info("Application initialized. Ready to harvest news.");
        // A failed listing is already in the status log.
        let _ = self.refresh_file_list().await;
    }

    /// Run an action after checking its preconditions.
    ///
    /// A missing prerequisite is logged and returned without contacting the
    /// backend. Otherwise the action makes its request and updates the views.
    ///
    /// # Returns
    ///
    /// `Ok(())` when the action completed. Every error has already been
    /// appended to the status log when it is returned.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// dashboard.dispatch(Action::Harvest).await?;
    /// dashboard.dispatch(Action::ShowArticle { category: "sports".into(), position: 1 }).await?;
    /// assert!(dashboard.modal().is_some());
    /// ```
    #[instrument(level = "info", skip(self))]
    pub async fn dispatch(&mut self, action: Action) -> Result<(), DashboardError> {
        match action {
            Action::RefreshFiles => self.refresh_file_list().await,
            Action::Harvest => self.harvest().await,
            Action::LoadFile(filename) => {
                if filename.is_empty() {
                    return Err(self.reject(Precondition::NoFileSelected));
                }
                self.load_file(&filename).await
            }
            Action::GenerateSummary => {
                let dataset = self.require_dataset()?;
                self.generate_summary(&dataset).await
            }
            Action::AnalyzeTrends => {
                let dataset = self.require_dataset()?;
                self.analyze_trends(&dataset).await
            }
            Action::ConvertToSpeech => {
                let text = self.require_summary()?;
                self.convert_to_speech(&text).await
            }
            Action::ShowArticle { category, position } => match position.checked_sub(1) {
                Some(index) => self.show_article(&category, index),
                None => Err(self.missing_article(&category, position)),
            },
        }
    }

    fn reject(&mut self, precondition: Precondition) -> DashboardError {
        self.log.error(precondition.to_string());
        precondition.into()
    }

    fn fail(&mut self, context: &'static str, source: BackendError) -> DashboardError {
        let error = DashboardError::Backend { context, source };
        self.log.error(error.to_string());
        error
    }

    fn require_dataset(&mut self) -> Result<Arc<NewsDataset>, DashboardError> {
        if let Some(dataset) = &self.state.dataset {
            return Ok(Arc::clone(dataset));
        }
        Err(self.reject(Precondition::NoDataset))
    }

    fn require_summary(&mut self) -> Result<String, DashboardError> {
        if let Some(summary) = &self.state.summary {
            return Ok(summary.clone());
        }
        Err(self.reject(Precondition::NoSummary))
    }

    #[instrument(level = "info", skip_all)]
    async fn refresh_file_list(&mut self) -> Result<(), DashboardError> {
        match self.backend.list_files().await {
            Ok(files) => {
                let count = files.len();
                self.files.replace_options(files);
                if count > 0 {
                    self.log.info(format!("Found {count} saved news files."));
                } else {
                    self.log.info("No saved news files found.");
                }
                Ok(())
            }
            Err(e) => Err(self.fail("Error loading news files", e)),
        }
    }

    #[instrument(level = "info", skip_all)]
    async fn harvest(&mut self) -> Result<(), DashboardError> {
        self.log.info("Harvesting news from sources...");
        let result = {
            let _loading = self.loading.show();
            self.backend.harvest().await
        };

        match result {
            Ok(harvested) => {
                self.log
                    .info(format!("Successfully harvested {}", harvested.message));
                self.set_dataset(harvested.dataset);
                // A failed refresh is logged and does not undo the harvest.
                let _ = self.refresh_file_list().await;
                Ok(())
            }
            Err(e) => Err(self.fail("Error harvesting news", e)),
        }
    }

    #[instrument(level = "info", skip(self))]
    async fn load_file(&mut self, filename: &str) -> Result<(), DashboardError> {
        self.log.info(format!("Loading news file: {filename}"));
        let result = {
            let _loading = self.loading.show();
            self.backend.load_news(filename).await
        };

        match result {
            Ok(dataset) => {
                self.log
                    .info(format!("Successfully loaded news file: {filename}"));
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => Err(self.fail("Error loading news", e)),
        }
    }

    /// Make `dataset` current, render it, and enable the controls that need it.
    fn set_dataset(&mut self, dataset: NewsDataset) {
        let view = render_dataset(&dataset);
        self.category_chart
            .update(view.category_labels.clone(), view.category_counts.clone());
        self.source_chart
            .update(view.source_labels.clone(), view.source_counts.clone());
        self.view = view;
        self.state.dataset = Some(Arc::new(dataset));
        self.controls.generate_summary = true;
        self.controls.analyze_trends = true;
        debug!(stats = ?self.view.stats, "Dataset is now current");
    }

    #[instrument(level = "info", skip_all)]
    async fn generate_summary(&mut self, dataset: &NewsDataset) -> Result<(), DashboardError> {
        self.log.info("Generating news summary...");
        let result = {
            let _loading = self.loading.show();
            self.backend.generate_summary(dataset).await
        };

        match result {
            Ok(summary) => {
                self.log.info("Summary generated successfully.");
                self.state.summary = Some(summary);
                self.controls.convert_to_speech = true;
                Ok(())
            }
            Err(e) => Err(self.fail("Error generating summary", e)),
        }
    }

    #[instrument(level = "info", skip_all)]
    async fn analyze_trends(&mut self, dataset: &NewsDataset) -> Result<(), DashboardError> {
        self.log.info("Analyzing news trends and threats...");
        let result = {
            let _loading = self.loading.show();
            self.backend.analyze_trends(dataset).await
        };

        match result {
            Ok(analysis) => {
                self.log.info("Trend analysis completed successfully.");
                self.analysis = Some(render_analysis(&analysis));
                Ok(())
            }
            Err(e) => Err(self.fail("Error analyzing trends", e)),
        }
    }

    #[instrument(level = "info", skip_all)]
    async fn convert_to_speech(&mut self, text: &str) -> Result<(), DashboardError> {
        self.log.info("Converting summary to speech...");
        let result = {
            let _loading = self.loading.show();
            self.backend.text_to_speech(text).await
        };

        let reference = match result {
            Ok(reference) => reference,
            Err(e) => return Err(self.fail("Error converting to speech", e)),
        };
        self.log.info("Speech conversion completed successfully.");

        let Some(name) = self.audio.load(&reference) else {
            let error = DashboardError::Playback(format!("no audio file in {reference:?}"));
            self.log.error(error.to_string());
            return Err(error);
        };
        if let Err(e) = self.audio.play(&self.backend, &name, &self.config).await {
            let error = DashboardError::Playback(e.to_string());
            self.log.error(error.to_string());
            return Err(error);
        }
        Ok(())
    }

    fn show_article(&mut self, category: &str, index: usize) -> Result<(), DashboardError> {
        let article = self
            .state
            .dataset
            .as_deref()
            .and_then(|dataset| dataset.article(category, index));

        match article {
            Some(article) => {
                self.modal = Some(ArticleModal::from_article(article));
                Ok(())
            }
            None => Err(self.missing_article(category, index + 1)),
        }
    }

    fn missing_article(&mut self, category: &str, position: usize) -> DashboardError {
        let error = DashboardError::ArticleNotFound {
            category: category.to_string(),
            position,
        };
        self.log.error(error.to_string());
        error
    }

    /// The settings this dashboard was created with.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Every status entry of the session, oldest first.
    pub fn log(&self) -> &StatusLog {
        &self.log
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    /// Which actions are currently enabled.
    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn files(&self) -> &FileSelector {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut FileSelector {
        &mut self.files
    }

    /// The dataset from the last successful harvest or load.
    pub fn dataset(&self) -> Option<&NewsDataset> {
        self.state.dataset.as_deref()
    }

    /// The current summary, exactly as the backend returned it.
    pub fn summary(&self) -> Option<&str> {
        self.state.summary.as_deref()
    }

    /// Panels and counters for the current dataset.
    ///
    /// Before any dataset is loaded this is the five known categories,
    /// each cleared, with zeroed counters.
    pub fn view(&self) -> &DatasetView {
        &self.view
    }

    pub fn category_chart(&self) -> &Chart {
        &self.category_chart
    }

    pub fn source_chart(&self) -> &Chart {
        &self.source_chart
    }

    /// The last analysis report. It is not cleared when a new dataset loads.
    pub fn analysis(&self) -> Option<&AnalysisReport> {
        self.analysis.as_ref()
    }

    pub fn audio(&self) -> &AudioPlayer {
        &self.audio
    }

    /// The open article detail view, if any.
    pub fn modal(&self) -> Option<&ArticleModal> {
        self.modal.as_ref()
    }

    /// Close the article detail view.
    pub fn close_modal(&mut self) {
        self.modal = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Harvested;
    use crate::models::{AnalysisResult, Article, Overview};
    use crate::outputs::dataset::PanelContent;
    use crate::status::Severity;
    use std::cell::RefCell;

    struct FakeBackend {
        files: Result<Vec<String>, BackendError>,
        harvest: Result<Harvested, BackendError>,
        load: Result<NewsDataset, BackendError>,
        summary: Result<String, BackendError>,
        analysis: Result<AnalysisResult, BackendError>,
        speech: Result<String, BackendError>,
        audio: Result<Vec<u8>, BackendError>,
        calls: RefCell<Vec<String>>,
        indicator: RefCell<Option<LoadingIndicator>>,
        loading_seen: RefCell<Vec<bool>>,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                files: Ok(vec!["fiji_news_20250506_101500.json".to_string()]),
                harvest: Ok(Harvested {
                    dataset: dataset(&[("politics", 3), ("sports", 9)]),
                    message: "12 articles".to_string(),
                }),
                load: Ok(dataset(&[("crime", 1), ("community", 0)])),
                summary: Ok("Today in Fiji:\n- rugby".to_string()),
                analysis: Ok(AnalysisResult {
                    timestamp: "2025-05-06 10:15:00".to_string(),
                    overview: Overview { total_articles: 12 },
                    ..Default::default()
                }),
                speech: Ok("data/summary_20250506.mp3".to_string()),
                audio: Ok(b"ID3audio".to_vec()),
                calls: RefCell::new(Vec::new()),
                indicator: RefCell::new(None),
                loading_seen: RefCell::new(Vec::new()),
            }
        }

        fn record(&self, call: &str) {
            self.calls.borrow_mut().push(call.to_string());
            if let Some(indicator) = self.indicator.borrow().as_ref() {
                self.loading_seen.borrow_mut().push(indicator.is_visible());
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl DashboardBackend for FakeBackend {
        async fn list_files(&self) -> Result<Vec<String>, BackendError> {
            self.record("list_files");
            self.files.clone()
        }

        async fn harvest(&self) -> Result<Harvested, BackendError> {
            self.record("harvest");
            self.harvest.clone()
        }

        async fn load_news(&self, filename: &str) -> Result<NewsDataset, BackendError> {
            self.record(&format!("load_news {filename}"));
            self.load.clone()
        }

        async fn generate_summary(&self, _dataset: &NewsDataset) -> Result<String, BackendError> {
            self.record("generate_summary");
            self.summary.clone()
        }

        async fn analyze_trends(
            &self,
            _dataset: &NewsDataset,
        ) -> Result<AnalysisResult, BackendError> {
            self.record("analyze_trends");
            self.analysis.clone()
        }

        async fn text_to_speech(&self, text: &str) -> Result<String, BackendError> {
            self.record(&format!("text_to_speech {}", text.len()));
            self.speech.clone()
        }

        async fn fetch_audio(&self, name: &str) -> Result<Vec<u8>, BackendError> {
            self.record(&format!("fetch_audio {name}"));
            self.audio.clone()
        }
    }

    fn dataset(counts: &[(&str, usize)]) -> NewsDataset {
        let mut dataset = NewsDataset::new();
        for (category, count) in counts {
            let articles = (0..*count)
                .map(|i| Article {
                    source: format!("Source {}", i % 2),
                    published_date: "2025-05-06".to_string(),
                    title: format!("{category} story {i}"),
                    summary: "Summary".to_string(),
                    text: "Line one\nLine two".to_string(),
                    category: category.to_string(),
                    keywords: vec!["fiji".to_string(), category.to_string()],
                    url: format!("https://example.com/{category}/{i}"),
                })
                .collect();
            dataset.insert(*category, articles);
        }
        dataset
    }

    fn dashboard(backend: FakeBackend) -> Dashboard<FakeBackend> {
        Dashboard::new(backend, DashboardConfig::default())
    }

    fn messages(dashboard: &Dashboard<FakeBackend>) -> Vec<String> {
        dashboard
            .log()
            .entries()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    fn transport(msg: &str) -> BackendError {
        BackendError::Transport(msg.to_string())
    }

    #[tokio::test]
    async fn test_start_logs_and_lists_files() {
        let mut dashboard = dashboard(FakeBackend::new());
        dashboard.start().await;

        assert_eq!(
            messages(&dashboard),
            vec![
                "Application initialized. Ready to harvest news.",
                "Found 1 saved news files.",
            ]
        );
        assert_eq!(dashboard.files().options(), ["fiji_news_20250506_101500.json"]);
    }

    #[tokio::test]
    async fn test_empty_file_list_is_logged() {
        let mut backend = FakeBackend::new();
        backend.files = Ok(vec![]);
        let mut dashboard = dashboard(backend);
        dashboard.dispatch(Action::RefreshFiles).await.unwrap();
        assert_eq!(messages(&dashboard), vec!["No saved news files found."]);
    }

    #[tokio::test]
    async fn test_failed_file_list_keeps_previous_options() {
        let mut backend = FakeBackend::new();
        backend.files = Err(transport("connection refused"));
        let mut dashboard = dashboard(backend);
        dashboard
            .files_mut()
            .replace_options(vec!["old.json".to_string()]);

        let err = dashboard.dispatch(Action::RefreshFiles).await.unwrap_err();
        assert!(matches!(err, DashboardError::Backend { .. }));
        assert_eq!(dashboard.files().options(), ["old.json"]);
        assert_eq!(
            dashboard.log().last().unwrap().message,
            "Error loading news files: connection refused"
        );
    }

    #[tokio::test]
    async fn test_harvest_scenario() {
        let mut dashboard = dashboard(FakeBackend::new());
        dashboard.dispatch(Action::Harvest).await.unwrap();

        let log = messages(&dashboard);
        assert_eq!(log[0], "Harvesting news from sources...");
        assert_eq!(log[1], "Successfully harvested 12 articles");
        assert_eq!(log[2], "Found 1 saved news files.");

        let stats = dashboard.view().stats;
        assert_eq!(stats.total_articles, 12);
        assert_eq!(stats.categories, 2);
        assert_eq!(stats.sources, 2);
        assert_eq!(dashboard.backend.calls(), vec!["harvest", "list_files"]);
        assert_eq!(dashboard.category_chart().labels, vec!["Politics", "Sports"]);
        assert_eq!(dashboard.category_chart().values, vec![3, 9]);
    }

    #[tokio::test]
    async fn test_harvest_failure_leaves_state_unchanged() {
        let mut backend = FakeBackend::new();
        backend.harvest = Err(BackendError::Reported("Scraper blocked".to_string()));
        let mut dashboard = dashboard(backend);

        let err = dashboard.dispatch(Action::Harvest).await.unwrap_err();
        assert_eq!(err.to_string(), "Error harvesting news: Scraper blocked");
        assert!(dashboard.dataset().is_none());
        assert_eq!(dashboard.controls(), Controls::default());
        assert!(!dashboard.loading().is_visible());
        assert_eq!(dashboard.log().last().unwrap().severity, Severity::Error);
        // No registry refresh after a failed harvest.
        assert_eq!(dashboard.backend.calls(), vec!["harvest"]);
    }

    #[tokio::test]
    async fn test_load_with_empty_filename_makes_no_request() {
        let mut dashboard = dashboard(FakeBackend::new());
        let filename = dashboard.files().value().to_string();

        let err = dashboard.dispatch(Action::LoadFile(filename)).await.unwrap_err();
        assert_eq!(err, DashboardError::Precondition(Precondition::NoFileSelected));
        assert_eq!(messages(&dashboard), vec!["Please select a news file to load."]);
        assert!(dashboard.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_file_renders_without_refreshing_registry() {
        let mut dashboard = dashboard(FakeBackend::new());
        dashboard
            .dispatch(Action::LoadFile("news.json".to_string()))
            .await
            .unwrap();

        assert_eq!(
            messages(&dashboard),
            vec![
                "Loading news file: news.json",
                "Successfully loaded news file: news.json",
            ]
        );
        assert_eq!(dashboard.backend.calls(), vec!["load_news news.json"]);
        assert_eq!(
            dashboard.view().panel("community").unwrap().content,
            PanelContent::Placeholder("No community news available.".to_string())
        );
        assert!(dashboard.controls().generate_summary);
        assert!(dashboard.controls().analyze_trends);
        assert!(!dashboard.controls().convert_to_speech);
    }

    #[tokio::test]
    async fn test_new_load_replaces_dataset() {
        let mut dashboard = dashboard(FakeBackend::new());
        dashboard.dispatch(Action::Harvest).await.unwrap();
        dashboard
            .dispatch(Action::LoadFile("news.json".to_string()))
            .await
            .unwrap();

        let dataset = dashboard.dataset().unwrap();
        assert!(dataset.get("politics").is_none());
        assert_eq!(dataset.total_articles(), 1);
        assert_eq!(dashboard.view().stats.total_articles, 1);
        assert_eq!(dashboard.view().panel("politics").unwrap().content, PanelContent::Cleared);
    }

    #[tokio::test]
    async fn test_summary_and_analysis_require_dataset() {
        let mut dashboard = dashboard(FakeBackend::new());

        for action in [Action::GenerateSummary, Action::AnalyzeTrends] {
            let err = dashboard.dispatch(action).await.unwrap_err();
            assert_eq!(err, DashboardError::Precondition(Precondition::NoDataset));
        }
        let err = dashboard.dispatch(Action::ConvertToSpeech).await.unwrap_err();
        assert_eq!(err, DashboardError::Precondition(Precondition::NoSummary));

        assert!(dashboard.backend.calls().is_empty());
        assert_eq!(
            messages(&dashboard),
            vec![
                "No news data loaded. Please harvest or load news first.",
                "No news data loaded. Please harvest or load news first.",
                "No summary available. Please generate a summary first.",
            ]
        );
    }

    #[tokio::test]
    async fn test_summary_enables_speech() {
        let mut dashboard = dashboard(FakeBackend::new());
        dashboard.dispatch(Action::Harvest).await.unwrap();
        dashboard.dispatch(Action::GenerateSummary).await.unwrap();

        assert_eq!(dashboard.summary(), Some("Today in Fiji:\n- rugby"));
        assert!(dashboard.controls().convert_to_speech);
        assert_eq!(
            dashboard.log().last().unwrap().message,
            "Summary generated successfully."
        );
    }

    #[tokio::test]
    async fn test_failed_summary_keeps_previous_summary() {
        let mut backend = FakeBackend::new();
        backend.summary = Err(BackendError::Reported("Model unavailable".to_string()));
        let mut dashboard = dashboard(backend);
        dashboard.dispatch(Action::Harvest).await.unwrap();

        let err = dashboard.dispatch(Action::GenerateSummary).await.unwrap_err();
        assert_eq!(err.to_string(), "Error generating summary: Model unavailable");
        assert_eq!(dashboard.summary(), None);
        assert!(!dashboard.controls().convert_to_speech);
    }

    #[tokio::test]
    async fn test_analysis_report_rendered() {
        let mut dashboard = dashboard(FakeBackend::new());
        dashboard.dispatch(Action::Harvest).await.unwrap();
        dashboard.dispatch(Action::AnalyzeTrends).await.unwrap();

        let report = dashboard.analysis().unwrap();
        assert_eq!(report.heading, "Analysis Generated on 2025-05-06 10:15:00");
        assert_eq!(report.total_articles, 12);
        assert_eq!(
            dashboard.log().last().unwrap().message,
            "Trend analysis completed successfully."
        );
    }

    #[tokio::test]
    async fn test_loading_visible_only_while_pending() {
        let mut backend = FakeBackend::new();
        backend.analysis = Err(transport("connection reset"));
        let mut dashboard = dashboard(backend);
        *dashboard.backend.indicator.borrow_mut() = Some(dashboard.loading().clone());

        assert!(!dashboard.loading().is_visible());
        dashboard.dispatch(Action::Harvest).await.unwrap();
        assert!(!dashboard.loading().is_visible());
        dashboard.dispatch(Action::AnalyzeTrends).await.unwrap_err();
        assert!(!dashboard.loading().is_visible());

        // harvest, list_files, analyze_trends
        assert_eq!(*dashboard.backend.loading_seen.borrow(), vec![true, false, true]);
    }

    #[tokio::test]
    async fn test_speech_downloads_audio_and_reveals_player() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            audio_dir: dir.path().to_str().unwrap().to_string(),
            ..Default::default()
        };
        let mut dashboard = Dashboard::new(FakeBackend::new(), config);
        dashboard.dispatch(Action::Harvest).await.unwrap();
        dashboard.dispatch(Action::GenerateSummary).await.unwrap();
        dashboard.dispatch(Action::ConvertToSpeech).await.unwrap();

        assert!(dashboard.audio().is_visible());
        assert_eq!(dashboard.audio().src(), Some("/audio/summary_20250506.mp3"));
        let saved = dir.path().join("summary_20250506.mp3");
        assert_eq!(std::fs::read(&saved).unwrap(), b"ID3audio");
        assert_eq!(dashboard.audio().local_file(), Some(saved.as_path()));

        let calls = dashboard.backend.calls();
        assert_eq!(calls[calls.len() - 1], "fetch_audio summary_20250506.mp3");
    }

    #[tokio::test]
    async fn test_failed_speech_leaves_player_hidden() {
        let mut backend = FakeBackend::new();
        backend.speech = Err(BackendError::Reported("No text provided".to_string()));
        let mut dashboard = dashboard(backend);
        dashboard.dispatch(Action::Harvest).await.unwrap();
        dashboard.dispatch(Action::GenerateSummary).await.unwrap();

        let err = dashboard.dispatch(Action::ConvertToSpeech).await.unwrap_err();
        assert_eq!(err.to_string(), "Error converting to speech: No text provided");
        assert!(!dashboard.audio().is_visible());
        assert_eq!(dashboard.audio().src(), None);
    }

    #[tokio::test]
    async fn test_speech_reference_without_file_name() {
        let mut backend = FakeBackend::new();
        backend.speech = Ok("data/".to_string());
        let mut dashboard = dashboard(backend);
        dashboard.dispatch(Action::Harvest).await.unwrap();
        dashboard.dispatch(Action::GenerateSummary).await.unwrap();

        let err = dashboard.dispatch(Action::ConvertToSpeech).await.unwrap_err();
        assert!(matches!(err, DashboardError::Playback(_)));
        assert_eq!(
            dashboard.log().last().unwrap().message,
            "Error playing audio: no audio file in \"data/\""
        );
        assert!(!dashboard.audio().is_visible());
        assert!(!dashboard.backend.calls().iter().any(|c| c.starts_with("fetch_audio")));
    }

    #[tokio::test]
    async fn test_show_article_round_trip() {
        let mut dashboard = dashboard(FakeBackend::new());
        dashboard.dispatch(Action::Harvest).await.unwrap();

        let PanelContent::Cards(cards) = &dashboard.view().panel("sports").unwrap().content else {
            panic!("sports should have cards");
        };
        let card = cards[4].clone();
        dashboard
            .dispatch(Action::ShowArticle {
                category: card.category.clone(),
                position: card.index + 1,
            })
            .await
            .unwrap();

        let article = dashboard.dataset().unwrap().article("sports", 4).unwrap().clone();
        let modal = dashboard.modal().unwrap();
        assert_eq!(modal.heading, article.title);
        assert_eq!(
            modal.badges,
            [article.source.clone(), article.published_date.clone(), article.category.clone()]
        );
        assert_eq!(modal.body_lines, vec!["Line one", "Line two"]);
        assert_eq!(modal.keywords, "fiji, sports");
        assert_eq!(modal.source_link, "https://example.com/sports/4");
    }

    #[tokio::test]
    async fn test_show_unknown_article() {
        let mut dashboard = dashboard(FakeBackend::new());
        dashboard.dispatch(Action::Harvest).await.unwrap();
        let err = dashboard
            .dispatch(Action::ShowArticle {
                category: "crime".to_string(),
                position: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::ArticleNotFound { .. }));
        assert!(dashboard.modal().is_none());
    }

    #[tokio::test]
    async fn test_show_position_zero_is_not_an_article() {
        let mut dashboard = dashboard(FakeBackend::new());
        dashboard.dispatch(Action::Harvest).await.unwrap();
        let err = dashboard
            .dispatch(Action::ShowArticle {
                category: "sports".to_string(),
                position: 0,
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DashboardError::ArticleNotFound {
                category: "sports".to_string(),
                position: 0,
            }
        );
        assert_eq!(dashboard.log().last().unwrap().message, "No article 0 in sports");
        assert!(dashboard.modal().is_none());
    }

    #[test]
    fn test_file_selector_selection() {
        let mut selector = FileSelector::default();
        selector.replace_options(vec!["a.json".to_string(), "b.json".to_string()]);
        assert_eq!(selector.value(), "");
        assert_eq!(selector.select(2), Some("b.json"));
        assert_eq!(selector.value(), "b.json");

        selector.replace_options(vec!["b.json".to_string()]);
        assert_eq!(selector.value(), "b.json");
        selector.replace_options(vec!["c.json".to_string()]);
        assert_eq!(selector.value(), "");
        assert_eq!(selector.select(0), None);
    }
}
