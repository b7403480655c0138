//! Removal of expired project attachments.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::repository::AttachmentRepository;
use crate::services::attachment_cleanup::delete_blobs;
use crate::services::storage::DataStore;

/// Number of attachments loaded per query.
const DEFAULT_BATCH_SIZE: u64 = 500;

/// Counters of one cleanup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovedAttachments {
    pub attachments: u64,
    pub thumbnails: u64,
}

#[derive(Clone)]
pub struct LogCleaner {
    attachments: Arc<dyn AttachmentRepository>,
    store: Arc<dyn DataStore>,
    batch_size: u64,
}

impl LogCleaner {
    pub fn new(attachments: Arc<dyn AttachmentRepository>, store: Arc<dyn DataStore>) -> Self {
        Self {
            attachments,
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Delete attachments of the project older than `period`.
    ///
    /// Attachments whose blobs cannot be removed keep their rows and are
    /// retried on the next run.
    pub async fn remove_project_attachments(
        &self,
        project_id: i64,
        period: Duration,
    ) -> AppResult<RemovedAttachments> {
        let period = chrono::Duration::from_std(period).map_err(|e| {
            AppError::IncorrectRequest(format!("Invalid retention period: {}", e))
        })?;
        let cutoff = Utc::now() - period;

        let mut removed = RemovedAttachments::default();
        let mut after_id = 0;

        loop {
            let batch = self
                .attachments
                .find_created_before(project_id, cutoff, after_id, self.batch_size)
                .await?;
            let Some(last) = batch.last() else {
                break;
            };
            after_id = last.id;

            let deleted_ids = delete_blobs(&batch, self.store.as_ref()).await;
            removed.thumbnails += batch
                .iter()
                .filter(|attachment| deleted_ids.contains(&attachment.id))
                .filter(|attachment| attachment.thumbnail_id.is_some())
                .count() as u64;
            removed.attachments += self.attachments.delete_all_by_id(&deleted_ids).await?;

            debug!(
                "Project {}: removed {} of {} expired attachments in batch",
                project_id,
                deleted_ids.len(),
                batch.len()
            );

            if (batch.len() as u64) < self.batch_size {
                break;
            }
        }

        Ok(removed)
    }
}
