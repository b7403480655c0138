//! Repository ports consumed by the handlers.
//!
//! Handlers only see these traits. [`crate::db::DbPool`] implements them on
//! PostgreSQL and [`memory::InMemoryStore`] keeps everything in process.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    Attachment, ItemStatus, Launch, NewLaunch, PageRequest, Project, TestItem, UserFilter, Widget,
};

/// Test item storage.
#[async_trait]
pub trait TestItemRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<TestItem>>;

    /// Load every existing item among `ids`; unknown ids are skipped.
    async fn find_all_by_id(&self, ids: &[i64]) -> AppResult<Vec<TestItem>>;

    /// Whether any item other than the parent itself lives under `parent_path`.
    async fn has_children(&self, parent_id: i64, parent_path: &str) -> AppResult<bool>;

    /// Ids of every item under `path`, including the item at `path` itself.
    async fn descendant_ids(&self, path: &str) -> AppResult<Vec<i64>>;

    /// Items whose `retry_of` points at one of `ids`.
    async fn find_retries_of(&self, ids: &[i64]) -> AppResult<Vec<TestItem>>;

    /// Delete one item. Descendants, retries and logs go with it.
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;

    async fn delete_all_by_id(&self, ids: &[i64]) -> AppResult<u64>;

    async fn set_has_children(&self, id: i64, has_children: bool) -> AppResult<()>;
}

/// Launch storage.
#[async_trait]
pub trait LaunchRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Launch>>;

    async fn find_all_by_id(&self, ids: &[i64]) -> AppResult<Vec<Launch>>;

    async fn find_by_uuid(&self, uuid: Uuid) -> AppResult<Option<Launch>>;

    /// Launch with the highest number for `name` within the project.
    async fn find_latest_by_name(&self, project_id: i64, name: &str) -> AppResult<Option<Launch>>;

    /// Highest launch number used for `name` within the project (0 when none).
    async fn last_number(&self, project_id: i64, name: &str) -> AppResult<i64>;

    /// Whether any item of the launch is a retry.
    async fn has_retries(&self, launch_id: i64) -> AppResult<bool>;

    async fn set_has_retries(&self, launch_id: i64, has_retries: bool) -> AppResult<()>;

    async fn insert(&self, launch: NewLaunch) -> AppResult<Launch>;

    async fn update_status(&self, launch_id: i64, status: ItemStatus) -> AppResult<Launch>;
}

/// Log storage.
#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Log ids attached directly to one item, descendants excluded.
    async fn find_ids_by_item_id(&self, item_id: i64) -> AppResult<Vec<i64>>;

    async fn find_ids_by_item_ids(&self, item_ids: &[i64]) -> AppResult<Vec<i64>>;
}

/// Project storage.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Page of projects carrying `attribute`, each with that attribute loaded.
    async fn find_with_attribute(
        &self,
        attribute: &str,
        page: PageRequest,
    ) -> AppResult<Vec<Project>>;
}

/// Attachment metadata storage.
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    async fn find_by_item_id(&self, item_id: i64) -> AppResult<Vec<Attachment>>;

    /// Attachments of the project created before `cutoff` with id greater than
    /// `after_id`, ordered by id.
    async fn find_created_before(
        &self,
        project_id: i64,
        cutoff: DateTime<Utc>,
        after_id: i64,
        limit: u64,
    ) -> AppResult<Vec<Attachment>>;

    async fn delete_all_by_id(&self, ids: &[i64]) -> AppResult<u64>;
}

/// Widget storage.
#[async_trait]
pub trait WidgetRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Widget>>;

    /// Persist all widget fields including its filter links.
    async fn save(&self, widget: &Widget) -> AppResult<Widget>;
}

/// Saved filter storage.
#[async_trait]
pub trait UserFilterRepository: Send + Sync {
    /// Filters among `ids` in the project that `username` owns or that are shared.
    async fn find_permitted(
        &self,
        ids: &[i64],
        project_id: i64,
        username: &str,
    ) -> AppResult<Vec<UserFilter>>;
}

/// Project-level sharing entries.
#[async_trait]
pub trait AclRepository: Send + Sync {
    async fn update_widget_acl(&self, widget_id: i64, project_id: i64, shared: bool)
    -> AppResult<()>;
}
