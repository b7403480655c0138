//! Test item deletion with hierarchical cascade.
//!
//! Items form a tree per launch, addressed by materialized paths. Deleting an
//! item removes its whole subtree and the retries of removed items. Afterwards
//! the derived `has_retries` flag of the launch and the `has_children` flag of
//! the surviving parent are recomputed, the analyzer index is purged of the
//! removed logs, and an attachment cleanup event is published.
//!
//! Index purge and event publication are best-effort: once the rows are gone
//! the operation reports success even if the side effects fail.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::{ProjectDetails, ReportingUser, authorize_item_deletion};
use crate::error::{AppError, AppResult};
use crate::models::{DomainEvent, Launch, OperationCompletion, TestItem};
use crate::repository::{LaunchRepository, LogRepository, TestItemRepository};
use crate::services::event_bus::EventPublisher;
use crate::services::log_indexer::LogIndexer;

/// Handler for single and batch test item deletion.
#[derive(Clone)]
pub struct DeleteTestItemHandler {
    items: Arc<dyn TestItemRepository>,
    launches: Arc<dyn LaunchRepository>,
    logs: Arc<dyn LogRepository>,
    indexer: Arc<dyn LogIndexer>,
    events: Arc<dyn EventPublisher>,
}

impl DeleteTestItemHandler {
    pub fn new(
        items: Arc<dyn TestItemRepository>,
        launches: Arc<dyn LaunchRepository>,
        logs: Arc<dyn LogRepository>,
        indexer: Arc<dyn LogIndexer>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            items,
            launches,
            logs,
            indexer,
            events,
        }
    }

    /// Delete one item together with its descendants.
    pub async fn delete_test_item(
        &self,
        item_id: i64,
        project: &ProjectDetails,
        user: &ReportingUser,
    ) -> AppResult<OperationCompletion> {
        let item = self
            .items
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::test_item_not_found(item_id))?;
        let launch = self
            .launches
            .find_by_id(item.launch_id)
            .await?
            .ok_or_else(|| AppError::launch_not_found(item.launch_id))?;

        authorize_item_deletion(user, &item, &launch, project)?;

        let parent = item
            .parent_id
            .zip(item.parent_path().map(str::to_string));

        // Logs cascade with their items, so collect ids before the delete.
        let mut subtree = self.items.descendant_ids(&item.path).await?;
        let mut covered: HashSet<i64> = subtree.iter().copied().collect();
        self.extend_with_retries(&mut covered, &mut subtree).await?;
        let log_ids = self.logs.find_ids_by_item_ids(&subtree).await?;

        self.items.delete_by_id(item.id).await?;

        self.refresh_has_retries(launch.id).await?;
        if let Some((parent_id, parent_path)) = parent {
            let has_children = self.items.has_children(parent_id, &parent_path).await?;
            self.items.set_has_children(parent_id, has_children).await?;
        }

        self.clean_index(project.project_id, &log_ids).await;
        self.events.publish(DomainEvent::attachments_deleted(item.id));

        info!(
            "Test item {} deleted by user {} ({} items in subtree)",
            item.id,
            user.user_id,
            subtree.len()
        );

        Ok(OperationCompletion::test_item_deleted(item.id))
    }

    /// Delete several items at once.
    ///
    /// Every found item is authorized against its own launch before anything
    /// is removed. Requested items that lie inside the subtree of another
    /// requested item are subsumed by it. Returns one confirmation per removed
    /// item, descendants included.
    pub async fn delete_test_items(
        &self,
        item_ids: &[i64],
        project: &ProjectDetails,
        user: &ReportingUser,
    ) -> AppResult<Vec<OperationCompletion>> {
        let items = self.items.find_all_by_id(item_ids).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let launch_ids: Vec<i64> = items
            .iter()
            .map(|item| item.launch_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let launches: HashMap<i64, Launch> = self
            .launches
            .find_all_by_id(&launch_ids)
            .await?
            .into_iter()
            .map(|launch| (launch.id, launch))
            .collect();

        for item in &items {
            let launch = launches
                .get(&item.launch_id)
                .ok_or_else(|| AppError::launch_not_found(item.launch_id))?;
            authorize_item_deletion(user, item, launch, project)?;
        }

        let (roots, cascade) = self.collect_cascade(&items).await?;
        debug!(
            "Batch delete: {} requested, {} roots, {} items in cascade",
            items.len(),
            roots.len(),
            cascade.len()
        );

        let log_ids = self.logs.find_ids_by_item_ids(&cascade).await?;

        self.items.delete_all_by_id(&cascade).await?;

        for launch_id in launches.keys() {
            self.refresh_has_retries(*launch_id).await?;
        }
        self.refresh_parents(&items, &roots, &cascade).await?;

        self.clean_index(project.project_id, &log_ids).await;
        for item in &items {
            self.events.publish(DomainEvent::attachments_deleted(item.id));
        }

        info!(
            "Batch deleted {} test items by user {}",
            cascade.len(),
            user.user_id
        );

        Ok(cascade
            .into_iter()
            .map(OperationCompletion::test_item_deleted)
            .collect())
    }

    /// Walk requested items from the shallowest level down. An item already
    /// covered by a shallower requested ancestor is skipped.
    ///
    /// Returns the subtree roots and every id removed with them (subtrees and
    /// retries), in discovery order and without duplicates.
    async fn collect_cascade(&self, items: &[TestItem]) -> AppResult<(Vec<i64>, Vec<i64>)> {
        let mut by_level: BTreeMap<usize, Vec<&TestItem>> = BTreeMap::new();
        for item in items {
            by_level.entry(item.level()).or_default().push(item);
        }

        let mut roots = Vec::new();
        let mut cascade = Vec::new();
        let mut covered = HashSet::new();

        for level_items in by_level.values() {
            for item in level_items {
                if covered.contains(&item.id) {
                    continue;
                }
                roots.push(item.id);
                for id in self.items.descendant_ids(&item.path).await? {
                    if covered.insert(id) {
                        cascade.push(id);
                    }
                }
                // Storage may not report the root itself once it lost its path.
                if covered.insert(item.id) {
                    cascade.push(item.id);
                }
            }
        }
        self.extend_with_retries(&mut covered, &mut cascade).await?;

        Ok((roots, cascade))
    }

    /// Append retries of anything in `cascade`, with their subtrees, until no
    /// new retry turns up. Storage removes them along with the retried item.
    async fn extend_with_retries(
        &self,
        covered: &mut HashSet<i64>,
        cascade: &mut Vec<i64>,
    ) -> AppResult<()> {
        let mut frontier = cascade.clone();
        while !frontier.is_empty() {
            let mut found = Vec::new();
            for retry in self.items.find_retries_of(&frontier).await? {
                if covered.contains(&retry.id) {
                    continue;
                }
                for id in self.items.descendant_ids(&retry.path).await? {
                    if covered.insert(id) {
                        found.push(id);
                    }
                }
                if covered.insert(retry.id) {
                    found.push(retry.id);
                }
            }
            cascade.extend_from_slice(&found);
            frontier = found;
        }
        Ok(())
    }

    /// Recompute `has_children` of every surviving parent of a removed root.
    async fn refresh_parents(
        &self,
        items: &[TestItem],
        roots: &[i64],
        cascade: &[i64],
    ) -> AppResult<()> {
        let removed: HashSet<i64> = cascade.iter().copied().collect();
        let mut parents: BTreeMap<i64, String> = BTreeMap::new();

        for item in items.iter().filter(|item| roots.contains(&item.id)) {
            if let (Some(parent_id), Some(parent_path)) = (item.parent_id, item.parent_path())
                && !removed.contains(&parent_id)
            {
                parents.insert(parent_id, parent_path.to_string());
            }
        }

        for (parent_id, parent_path) in parents {
            let has_children = self.items.has_children(parent_id, &parent_path).await?;
            self.items.set_has_children(parent_id, has_children).await?;
        }
        Ok(())
    }

    async fn refresh_has_retries(&self, launch_id: i64) -> AppResult<()> {
        let has_retries = self.launches.has_retries(launch_id).await?;
        self.launches.set_has_retries(launch_id, has_retries).await
    }

    async fn clean_index(&self, project_id: i64, log_ids: &[i64]) {
        if log_ids.is_empty() {
            return;
        }
        if let Err(e) = self.indexer.clean_index(project_id, log_ids).await {
            warn!(
                "Failed to remove {} logs from index of project {}: {}",
                log_ids.len(),
                project_id,
                e
            );
        }
    }
}
