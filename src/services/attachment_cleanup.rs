//! Background listener removing attachments of deleted test items.
//!
//! Reacts to [`DomainEvent::TestItemAttachmentsDeleted`]: blobs are removed
//! from the data store first, then the metadata rows whose blobs are gone.
//! Failures are logged and never reach the publisher.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::AppResult;
use crate::models::{Attachment, DomainEvent};
use crate::repository::AttachmentRepository;
use crate::services::event_bus::EventBus;
use crate::services::storage::DataStore;

/// Start the attachment cleanup listener on `bus`.
///
/// The task ends when every sender of the bus is dropped.
pub fn spawn_attachment_cleanup(
    bus: &EventBus,
    attachments: Arc<dyn AttachmentRepository>,
    store: Arc<dyn DataStore>,
) -> JoinHandle<()> {
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        info!("Attachment cleanup listener started");
        loop {
            match receiver.recv().await {
                Ok(message) => {
                    handle_event(&message.event, attachments.as_ref(), store.as_ref()).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        "Attachment cleanup listener lagged, {} events skipped",
                        skipped
                    );
                }
                Err(RecvError::Closed) => break,
            }
        }
        info!("Attachment cleanup listener stopped");
    })
}

/// Process one event. Events other than attachment deletions are ignored.
pub async fn handle_event(
    event: &DomainEvent,
    attachments: &dyn AttachmentRepository,
    store: &dyn DataStore,
) {
    if let DomainEvent::TestItemAttachmentsDeleted(payload) = event
        && let Err(e) = purge_item_attachments(payload.item_id, attachments, store).await
    {
        error!(
            "Failed to delete attachments of test item {}: {}",
            payload.item_id, e
        );
    }
}

/// Delete every attachment of `item_id`. Returns the number of removed rows.
pub async fn purge_item_attachments(
    item_id: i64,
    attachments: &dyn AttachmentRepository,
    store: &dyn DataStore,
) -> AppResult<u64> {
    let found = attachments.find_by_item_id(item_id).await?;
    if found.is_empty() {
        debug!("Test item {} has no attachments", item_id);
        return Ok(0);
    }

    let removed_ids = delete_blobs(&found, store).await;
    let removed = attachments.delete_all_by_id(&removed_ids).await?;

    info!(
        "Deleted {} of {} attachments of test item {}",
        removed,
        found.len(),
        item_id
    );
    Ok(removed)
}

/// Delete the file and thumbnail of each attachment concurrently.
///
/// Returns ids of attachments whose blobs are all gone.
pub(crate) async fn delete_blobs(attachments: &[Attachment], store: &dyn DataStore) -> Vec<i64> {
    let results = join_all(
        attachments
            .iter()
            .map(|attachment| delete_attachment_blobs(attachment, store)),
    )
    .await;

    attachments
        .iter()
        .zip(results)
        .filter_map(|(attachment, deleted)| deleted.then_some(attachment.id))
        .collect()
}

async fn delete_attachment_blobs(attachment: &Attachment, store: &dyn DataStore) -> bool {
    let keys = std::iter::once(attachment.file_id.as_str())
        .chain(attachment.thumbnail_id.as_deref())
        .filter(|key| !key.is_empty());

    let mut deleted = true;
    for key in keys {
        if let Err(e) = store.delete(key).await {
            warn!(
                "Failed to delete blob {} of attachment {}: {}",
                key, attachment.id, e
            );
            deleted = false;
        }
    }
    deleted
}
