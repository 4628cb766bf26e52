use std::collections::BTreeMap;
use std::env;
use std::fmt;

use chrono::Utc;
use serde::Serialize;
use tokio::runtime::Handle;

use crate::classifier::{Category, ClassificationResult};

/// Environment variable holding the base URL of the tracking server.
pub const TRACKING_URI_ENV: &str = "DOCSORT_TRACKING_URI";

/// Maximum number of characters of the input text carried in a record.
pub const SNIPPET_CHARS: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("No async runtime available to deliver telemetry")]
    NoRuntime,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Tracking server rejected record with status {0}")]
    Rejected(reqwest::StatusCode),
    #[error("Invalid tracking URI: {0}")]
    InvalidUri(String),
}

/// One classification, as reported to a tracking collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub sample_id: String,
    pub category: String,
    pub confidence: f64,
    pub all_scores: BTreeMap<Category, f64>,
    pub snippet: String,
    pub timestamp: String,
}

impl TelemetryRecord {
    pub fn new(sample_id: &str, text: &str, result: &ClassificationResult) -> Self {
        Self {
            sample_id: sample_id.to_string(),
            category: result.label().to_string(),
            confidence: result.confidence(),
            all_scores: result.all_scores().clone(),
            snippet: text.chars().take(SNIPPET_CHARS).collect(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Receives classification records. Delivery is best-effort: callers log
/// and discard any error.
pub trait TelemetrySink: Send + Sync + fmt::Debug {
    fn record(&self, record: &TelemetryRecord) -> Result<(), TelemetryError>;
}

/// Writes records to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn record(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        log::info!(
            "classification sample={} category={} confidence={:.2} snippet={:?}",
            record.sample_id,
            record.category,
            record.confidence,
            record.snippet
        );
        Ok(())
    }
}

/// Posts records as JSON to `{tracking_uri}/api/classifications`.
///
/// `record` spawns the request on the current Tokio runtime and returns
/// immediately; delivery failures are logged from the spawned task.
#[derive(Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
}

impl fmt::Debug for HttpSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSink")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HttpSink {
    pub fn new(tracking_uri: &str) -> Result<Self, TelemetryError> {
        let base = tracking_uri.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(TelemetryError::InvalidUri(tracking_uri.to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/classifications", base),
        })
    }

    /// Builds a sink from `DOCSORT_TRACKING_URI`, if set.
    pub fn from_env() -> Option<Result<Self, TelemetryError>> {
        env::var(TRACKING_URI_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|uri| Self::new(&uri))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Delivers one record and waits for the server's answer.
    pub async fn send(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        log::debug!("Posting classification {} to {}", record.sample_id, self.endpoint);
        let response = self.client.post(&self.endpoint).json(record).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Rejected(status));
        }
        Ok(())
    }
}

impl TelemetrySink for HttpSink {
    fn record(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        let handle = Handle::try_current().map_err(|_| TelemetryError::NoRuntime)?;
        let sink = self.clone();
        let record = record.clone();
        handle.spawn(async move {
            if let Err(e) = sink.send(&record).await {
                log::warn!("Failed to deliver classification {}: {}", record.sample_id, e);
            }
        });
        Ok(())
    }
}
