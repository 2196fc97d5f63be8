//! HTTP access to the dashboard backend.
//!
//! Every backend endpoint answers with a JSON envelope:
//!
//! ```text
//! {"status": "success" | "error", "message": "...", ...payload}
//! ```
//!
//! Only the envelope decides success. HTTP status codes are never
//! inspected, since the backend reports failures with a 4xx/5xx code *and*
//! an error envelope, and the envelope carries the message worth showing.
//!
//! # Architecture
//!
//! - [`DashboardBackend`]: the async operations the dashboard needs
//! - [`HttpBackend`]: the `reqwest` implementation used in production
//! - [`BackendError`]: the two failure tiers (reported vs transport)

use crate::models::{AnalysisResult, NewsDataset};
use crate::utils::truncate_for_log;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend answered with a non-success envelope. The message is
    /// shown to the user verbatim.
    #[error("{0}")]
    Reported(String),
    /// The request never produced a usable envelope: connection failure,
    /// unreadable body, or JSON of the wrong shape.
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Transport(e.to_string())
    }
}

/// A successful envelope with its decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    /// Optional human-readable text sent alongside the payload.
    pub message: Option<String>,
    /// Every envelope field other than `status` and `message`.
    pub payload: T,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    status: Option<String>,
    message: Option<Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// Whether a missing `status` field counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// `status` must be present and equal to `"success"`.
    Required,
    /// Only an explicit non-success `status` is a failure. The file listing
    /// endpoint answers without any status field.
    Lenient,
}

/// Decode a response body into an envelope.
///
/// # Arguments
///
/// * `body` - The raw response text
/// * `policy` - How to treat an envelope without a `status` field
///
/// # Returns
///
/// The envelope's message and its payload decoded as `T`. A non-success
/// status gives [`BackendError::Reported`] with the backend's message, or
/// `"Unknown error"` when it sent none. A body that is not JSON, or whose
/// payload does not fit `T`, gives [`BackendError::Transport`].
///
/// # Examples
///
/// ```ignore
/// let body = r#"{"status": "error", "message": "No text provided"}"#;
/// let err = decode_envelope::<SpeechPayload>(body, StatusPolicy::Required).unwrap_err();
/// assert_eq!(err, BackendError::Reported("No text provided".into()));
/// ```
pub fn decode_envelope<T: DeserializeOwned>(
    body: &str,
    policy: StatusPolicy,
) -> Result<Envelope<T>, BackendError> {
    let raw: RawEnvelope = serde_json::from_str(body).map_err(|e| {
        BackendError::Transport(format!(
            "invalid JSON response ({e}): {}",
            truncate_for_log(body, 120)
        ))
    })?;

    let message = raw.message.map(|m| match m {
        Value::String(s) => s,
        other => other.to_string(),
    });

    let succeeded = match (raw.status.as_deref(), policy) {
        (Some("success"), _) => true,
        (None, StatusPolicy::Lenient) => true,
        _ => false,
    };
    if !succeeded {
        return Err(BackendError::Reported(
            message.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    let payload = serde_json::from_value::<T>(Value::Object(raw.rest))
        .map_err(|e| BackendError::Transport(format!("unexpected response payload: {e}")))?;

    Ok(Envelope { message, payload })
}

/// A freshly harvested dataset with the backend's description of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Harvested {
    pub dataset: NewsDataset,
    /// Backend text such as "Harvested 12 articles".
    pub message: String,
}

/// Operations the dashboard performs against its backend.
///
/// Each call is a single request with no retry. [`HttpBackend`] is the
/// production implementation; tests substitute in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait DashboardBackend {
    /// `GET /get_news_files`
    async fn list_files(&self) -> Result<Vec<String>, BackendError>;

    /// `POST /harvest_news`
    async fn harvest(&self) -> Result<Harvested, BackendError>;

    /// `POST /load_news`
    async fn load_news(&self, filename: &str) -> Result<NewsDataset, BackendError>;

    /// `POST /generate_summary`
    async fn generate_summary(&self, dataset: &NewsDataset) -> Result<String, BackendError>;

    /// `POST /analyze_trends`
    async fn analyze_trends(&self, dataset: &NewsDataset) -> Result<AnalysisResult, BackendError>;

    /// `POST /text_to_speech`; returns the backend's reference to the audio file.
    async fn text_to_speech(&self, text: &str) -> Result<String, BackendError>;

    /// `GET /audio/{name}`; raw audio bytes.
    async fn fetch_audio(&self, name: &str) -> Result<Vec<u8>, BackendError>;
}

#[derive(Debug, Deserialize)]
struct FilesPayload {
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DataPayload {
    data: NewsDataset,
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    analysis: AnalysisResult,
}

#[derive(Debug, Deserialize)]
struct SpeechPayload {
    audio_file: String,
}

#[derive(Debug, Serialize)]
struct LoadRequest<'a> {
    filename: &'a str,
}

#[derive(Debug, Serialize)]
struct NewsDataRequest<'a> {
    news_data: &'a NewsDataset,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
}

/// [`DashboardBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a client for the backend rooted at `base_url`.
    ///
    /// Requests carry no timeout; a call runs until the backend answers or
    /// the connection fails.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root URL of the backend, with or without a trailing `/`.
    ///   A path prefix such as `http://host/dashboard` is kept.
    ///
    /// # Returns
    ///
    /// [`BackendError::Transport`] if the URL does not parse or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)
            .map_err(|e| BackendError::Transport(format!("invalid backend URL {base_url}: {e}")))?;
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let backend = HttpBackend::new("http://localhost:5000/dashboard")?;
    /// assert_eq!(
    ///     backend.endpoint("load_news")?.as_str(),
    ///     "http://localhost:5000/dashboard/load_news"
    /// );
    /// ```
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: Response,
        policy: StatusPolicy,
    ) -> Result<Envelope<T>, BackendError> {
        let http_status = response.status();
        let body = response.text().await?;
        debug!(%http_status, bytes = body.len(), "Received backend response");
        decode_envelope(&body, policy)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        policy: StatusPolicy,
    ) -> Result<Envelope<T>, BackendError> {
        let url = self.endpoint(path)?;
        let t0 = Instant::now();
        let response = self.client.get(url).send().await.inspect_err(|e| {
            warn!(path, elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "GET failed")
        })?;
        Self::read_envelope(response, policy).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<Envelope<T>, BackendError> {
        let url = self.endpoint(path)?;
        let request = self.client.post(url);
        let request = match body {
            Some(body) => request.json(body),
            None => request.header(CONTENT_TYPE, "application/json"),
        };
        let t0 = Instant::now();
        let response = request.send().await.inspect_err(|e| {
            warn!(path, elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "POST failed")
        })?;
        Self::read_envelope(response, StatusPolicy::Required).await
    }
}

impl DashboardBackend for HttpBackend {
    #[instrument(level = "info", skip_all)]
    async fn list_files(&self) -> Result<Vec<String>, BackendError> {
        let envelope: Envelope<FilesPayload> =
            self.get("get_news_files", StatusPolicy::Lenient).await?;
        Ok(envelope.payload.files)
    }

    #[instrument(level = "info", skip_all)]
    async fn harvest(&self) -> Result<Harvested, BackendError> {
        let envelope: Envelope<DataPayload> = self.post::<(), _>("harvest_news", None).await?;
        Ok(Harvested {
            dataset: envelope.payload.data,
            message: envelope.message.unwrap_or_default(),
        })
    }

    #[instrument(level = "info", skip_all, fields(%filename))]
    async fn load_news(&self, filename: &str) -> Result<NewsDataset, BackendError> {
        let envelope: Envelope<DataPayload> =
            self.post("load_news", Some(&LoadRequest { filename })).await?;
        Ok(envelope.payload.data)
    }

    #[instrument(level = "info", skip_all, fields(articles = dataset.total_articles()))]
    async fn generate_summary(&self, dataset: &NewsDataset) -> Result<String, BackendError> {
        let envelope: Envelope<SummaryPayload> = self
            .post("generate_summary", Some(&NewsDataRequest { news_data: dataset }))
            .await?;
        Ok(envelope.payload.summary)
    }

    #[instrument(level = "info", skip_all, fields(articles = dataset.total_articles()))]
    async fn analyze_trends(&self, dataset: &NewsDataset) -> Result<AnalysisResult, BackendError> {
        let envelope: Envelope<AnalysisPayload> = self
            .post("analyze_trends", Some(&NewsDataRequest { news_data: dataset }))
            .await?;
        Ok(envelope.payload.analysis)
    }

    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    async fn text_to_speech(&self, text: &str) -> Result<String, BackendError> {
        let envelope: Envelope<SpeechPayload> =
            self.post("text_to_speech", Some(&SpeechRequest { text })).await?;
        Ok(envelope.payload.audio_file)
    }

    /// Audio is served as a raw stream with no envelope, so this is the one
    /// call where the HTTP status decides success.
    #[instrument(level = "info", skip_all, fields(%name))]
    async fn fetch_audio(&self, name: &str) -> Result<Vec<u8>, BackendError> {
        let url = self.endpoint(&format!("audio/{}", urlencoding::encode(name)))?;
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "Fetched audio");
        Ok(bytes.to_vec())
    }
}
