//! In-memory implementation of every repository port.
//!
//! Mirrors the cascade rules of the PostgreSQL schema: deleting an item
//! removes its subtree, the retries of removed items and their logs.
//! Used by tests and local dry runs.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AclRepository, AttachmentRepository, LaunchRepository, LogRepository, ProjectRepository,
    TestItemRepository, UserFilterRepository, WidgetRepository,
};
use crate::error::{AppError, AppResult};
use crate::models::test_item::is_path_within;
use crate::models::{
    Attachment, ItemStatus, Launch, LogEntry, NewLaunch, PageRequest, Project, TestItem,
    UserFilter, Widget,
};

#[derive(Default)]
struct State {
    items: BTreeMap<i64, TestItem>,
    launches: BTreeMap<i64, Launch>,
    logs: BTreeMap<i64, LogEntry>,
    projects: BTreeMap<i64, Project>,
    attachments: BTreeMap<i64, Attachment>,
    widgets: BTreeMap<i64, Widget>,
    filters: BTreeMap<i64, UserFilter>,
    widget_acl: HashSet<(i64, i64)>,
    next_launch_id: i64,
}

impl State {
    /// Remove `roots` with their subtrees, retries and logs. Returns removed item count.
    fn cascade_delete(&mut self, roots: &[i64]) -> u64 {
        let mut doomed: HashSet<i64> = HashSet::new();
        let mut paths: Vec<String> = roots
            .iter()
            .filter_map(|root| self.items.get(root))
            .map(|item| item.path.clone())
            .collect();

        // Retries reference the item they retry and go with it, subtree included.
        while !paths.is_empty() {
            for path in &paths {
                doomed.extend(
                    self.items
                        .values()
                        .filter(|candidate| is_path_within(&candidate.path, path))
                        .map(|candidate| candidate.id),
                );
            }
            paths = self
                .items
                .values()
                .filter(|item| !doomed.contains(&item.id))
                .filter(|item| item.retry_of.is_some_and(|of| doomed.contains(&of)))
                .map(|item| item.path.clone())
                .collect();
        }

        self.items.retain(|id, _| !doomed.contains(id));
        self.logs
            .retain(|_, log| !log.item_id.is_some_and(|item_id| doomed.contains(&item_id)));
        doomed.len() as u64
    }
}

/// Repository backend holding all records in memory.
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_launch_id: 1,
                ..State::default()
            }),
        }
    }

    pub async fn insert_item(&self, item: TestItem) {
        self.state.write().await.items.insert(item.id, item);
    }

    pub async fn insert_launch(&self, launch: Launch) {
        let mut state = self.state.write().await;
        state.next_launch_id = state.next_launch_id.max(launch.id + 1);
        state.launches.insert(launch.id, launch);
    }

    pub async fn insert_log(&self, log: LogEntry) {
        self.state.write().await.logs.insert(log.id, log);
    }

    pub async fn insert_project(&self, project: Project) {
        self.state.write().await.projects.insert(project.id, project);
    }

    pub async fn insert_attachment(&self, attachment: Attachment) {
        self.state
            .write()
            .await
            .attachments
            .insert(attachment.id, attachment);
    }

    pub async fn insert_widget(&self, widget: Widget) {
        self.state.write().await.widgets.insert(widget.id, widget);
    }

    pub async fn insert_filter(&self, filter: UserFilter) {
        self.state.write().await.filters.insert(filter.id, filter);
    }

    pub async fn item(&self, id: i64) -> Option<TestItem> {
        self.state.read().await.items.get(&id).cloned()
    }

    pub async fn item_ids(&self) -> Vec<i64> {
        self.state.read().await.items.keys().copied().collect()
    }

    pub async fn launch(&self, id: i64) -> Option<Launch> {
        self.state.read().await.launches.get(&id).cloned()
    }

    pub async fn log_ids(&self) -> Vec<i64> {
        self.state.read().await.logs.keys().copied().collect()
    }

    pub async fn attachment_ids(&self) -> Vec<i64> {
        self.state.read().await.attachments.keys().copied().collect()
    }

    pub async fn is_widget_shared_in(&self, widget_id: i64, project_id: i64) -> bool {
        self.state
            .read()
            .await
            .widget_acl
            .contains(&(widget_id, project_id))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TestItemRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<TestItem>> {
        Ok(self.item(id).await)
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> AppResult<Vec<TestItem>> {
        let state = self.state.read().await;
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| state.items.get(id).cloned())
            .collect())
    }

    async fn has_children(&self, parent_id: i64, parent_path: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .any(|item| item.id != parent_id && is_path_within(&item.path, parent_path)))
    }

    async fn descendant_ids(&self, path: &str) -> AppResult<Vec<i64>> {
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .filter(|item| is_path_within(&item.path, path))
            .map(|item| item.id)
            .collect())
    }

    async fn find_retries_of(&self, ids: &[i64]) -> AppResult<Vec<TestItem>> {
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .filter(|item| item.retry_of.is_some_and(|of| wanted.contains(&of)))
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.state.write().await.cascade_delete(&[id]);
        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[i64]) -> AppResult<u64> {
        Ok(self.state.write().await.cascade_delete(ids))
    }

    async fn set_has_children(&self, id: i64, has_children: bool) -> AppResult<()> {
        if let Some(item) = self.state.write().await.items.get_mut(&id) {
            item.has_children = has_children;
        }
        Ok(())
    }
}

#[async_trait]
impl LaunchRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Launch>> {
        Ok(self.launch(id).await)
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> AppResult<Vec<Launch>> {
        let state = self.state.read().await;
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| state.launches.get(id).cloned())
            .collect())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> AppResult<Option<Launch>> {
        let state = self.state.read().await;
        Ok(state
            .launches
            .values()
            .find(|launch| launch.uuid == uuid)
            .cloned())
    }

    async fn find_latest_by_name(&self, project_id: i64, name: &str) -> AppResult<Option<Launch>> {
        let state = self.state.read().await;
        Ok(state
            .launches
            .values()
            .filter(|launch| launch.project_id == project_id && launch.name == name)
            .max_by_key(|launch| launch.number)
            .cloned())
    }

    async fn last_number(&self, project_id: i64, name: &str) -> AppResult<i64> {
        Ok(self
            .find_latest_by_name(project_id, name)
            .await?
            .map(|launch| launch.number)
            .unwrap_or(0))
    }

    async fn has_retries(&self, launch_id: i64) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .any(|item| item.launch_id == launch_id && item.is_retry()))
    }

    async fn set_has_retries(&self, launch_id: i64, has_retries: bool) -> AppResult<()> {
        if let Some(launch) = self.state.write().await.launches.get_mut(&launch_id) {
            launch.has_retries = has_retries;
        }
        Ok(())
    }

    async fn insert(&self, launch: NewLaunch) -> AppResult<Launch> {
        let mut state = self.state.write().await;
        let id = state.next_launch_id;
        state.next_launch_id += 1;

        let created = Launch {
            id,
            uuid: launch.uuid,
            project_id: launch.project_id,
            user_id: launch.user_id,
            name: launch.name,
            description: launch.description,
            number: launch.number,
            mode: launch.mode,
            status: ItemStatus::InProgress,
            has_retries: false,
            start_time: launch.start_time,
            end_time: None,
        };
        state.launches.insert(id, created.clone());
        Ok(created)
    }

    async fn update_status(&self, launch_id: i64, status: ItemStatus) -> AppResult<Launch> {
        let mut state = self.state.write().await;
        let launch = state
            .launches
            .get_mut(&launch_id)
            .ok_or_else(|| AppError::launch_not_found(launch_id))?;
        launch.status = status;
        if status.is_in_progress() {
            launch.end_time = None;
        }
        Ok(launch.clone())
    }
}

#[async_trait]
impl LogRepository for InMemoryStore {
    async fn find_ids_by_item_id(&self, item_id: i64) -> AppResult<Vec<i64>> {
        self.find_ids_by_item_ids(&[item_id]).await
    }

    async fn find_ids_by_item_ids(&self, item_ids: &[i64]) -> AppResult<Vec<i64>> {
        let wanted: HashSet<i64> = item_ids.iter().copied().collect();
        let state = self.state.read().await;
        Ok(state
            .logs
            .values()
            .filter(|log| log.item_id.is_some_and(|id| wanted.contains(&id)))
            .map(|log| log.id)
            .collect())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn find_with_attribute(
        &self,
        attribute: &str,
        page: PageRequest,
    ) -> AppResult<Vec<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .values()
            .filter(|project| project.attribute(attribute).is_some())
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .map(|project| Project {
                attributes: project
                    .attributes
                    .iter()
                    .filter(|attr| attr.name.eq_ignore_ascii_case(attribute))
                    .cloned()
                    .collect(),
                ..project.clone()
            })
            .collect())
    }
}

#[async_trait]
impl AttachmentRepository for InMemoryStore {
    async fn find_by_item_id(&self, item_id: i64) -> AppResult<Vec<Attachment>> {
        let state = self.state.read().await;
        Ok(state
            .attachments
            .values()
            .filter(|attachment| attachment.item_id == Some(item_id))
            .cloned()
            .collect())
    }

    async fn find_created_before(
        &self,
        project_id: i64,
        cutoff: DateTime<Utc>,
        after_id: i64,
        limit: u64,
    ) -> AppResult<Vec<Attachment>> {
        let state = self.state.read().await;
        Ok(state
            .attachments
            .range(after_id.saturating_add(1)..)
            .map(|(_, attachment)| attachment)
            .filter(|attachment| {
                attachment.project_id == project_id && attachment.creation_date < cutoff
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn delete_all_by_id(&self, ids: &[i64]) -> AppResult<u64> {
        let mut state = self.state.write().await;
        Ok(ids
            .iter()
            .filter(|id| state.attachments.remove(*id).is_some())
            .count() as u64)
    }
}

#[async_trait]
impl WidgetRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Widget>> {
        Ok(self.state.read().await.widgets.get(&id).cloned())
    }

    async fn save(&self, widget: &Widget) -> AppResult<Widget> {
        self.state
            .write()
            .await
            .widgets
            .insert(widget.id, widget.clone());
        Ok(widget.clone())
    }
}

#[async_trait]
impl UserFilterRepository for InMemoryStore {
    async fn find_permitted(
        &self,
        ids: &[i64],
        project_id: i64,
        username: &str,
    ) -> AppResult<Vec<UserFilter>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.filters.get(id))
            .filter(|filter| filter.project_id == project_id)
            .filter(|filter| filter.shared || filter.owner == username)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AclRepository for InMemoryStore {
    async fn update_widget_acl(
        &self,
        widget_id: i64,
        project_id: i64,
        shared: bool,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if shared {
            state.widget_acl.insert((widget_id, project_id));
        } else {
            state.widget_acl.remove(&(widget_id, project_id));
        }
        Ok(())
    }
}
