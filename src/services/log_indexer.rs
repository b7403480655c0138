//! Search index cleanup for deleted logs.
//!
//! The analyzer service keeps a per-project index of log messages used for
//! auto-analysis. When logs disappear from the database their index entries
//! have to be removed as well.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AnalyzerSettings;
use crate::error::{AppError, AppResult};

/// HTTP connect timeout for analyzer calls.
const ANALYZER_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Removes log entries from the search index.
#[async_trait]
pub trait LogIndexer: Send + Sync {
    async fn clean_index(&self, project_id: i64, log_ids: &[i64]) -> AppResult<()>;
}

/// Body of the analyzer's index delete request.
#[derive(Debug, Serialize)]
struct CleanIndexRequest<'a> {
    project: i64,
    ids: &'a [i64],
}

/// Analyzer-backed index cleaner.
#[derive(Clone)]
pub struct AnalyzerLogIndexer {
    base_url: String,
    http_client: reqwest::Client,
}

impl AnalyzerLogIndexer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(ANALYZER_CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Index(format!("Failed to build analyzer client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn clean_url(&self) -> String {
        format!("{}/_index/delete", self.base_url)
    }
}

#[async_trait]
impl LogIndexer for AnalyzerLogIndexer {
    async fn clean_index(&self, project_id: i64, log_ids: &[i64]) -> AppResult<()> {
        if log_ids.is_empty() {
            return Ok(());
        }

        let response = self
            .http_client
            .post(self.clean_url())
            .json(&CleanIndexRequest {
                project: project_id,
                ids: log_ids,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Index(format!(
                "Analyzer rejected index cleanup for project {}: HTTP {}",
                project_id, status
            )));
        }

        debug!(
            "Removed {} log entries from index of project {}",
            log_ids.len(),
            project_id
        );
        Ok(())
    }
}

/// Indexer used when no analyzer is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogIndexer;

#[async_trait]
impl LogIndexer for NoopLogIndexer {
    async fn clean_index(&self, _project_id: i64, _log_ids: &[i64]) -> AppResult<()> {
        Ok(())
    }
}

/// Build the indexer for the given settings.
pub fn from_settings(settings: &AnalyzerSettings) -> AppResult<Box<dyn LogIndexer>> {
    match &settings.url {
        Some(url) => {
            info!("Analyzer index cleanup enabled: {}", url);
            Ok(Box::new(AnalyzerLogIndexer::new(
                url.clone(),
                Duration::from_secs(settings.timeout_secs),
            )?))
        }
        None => {
            info!("No analyzer configured, index cleanup disabled");
            Ok(Box::new(NoopLogIndexer))
        }
    }
}
