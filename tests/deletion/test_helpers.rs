//! Shared fixtures for deletion E2E tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use report_portal_lib::auth::{ProjectDetails, ProjectRole, ReportingUser, UserRole};
use report_portal_lib::error::{AppError, AppResult};
use report_portal_lib::models::{
    Attachment, ItemStatus, Launch, LaunchMode, LogEntry, TestItem,
};
use report_portal_lib::repository::memory::InMemoryStore;
use report_portal_lib::services::{
    DataStore, EventBus, Handlers, LogIndexer, spawn_attachment_cleanup,
};
use tokio::task::JoinHandle;
use uuid::Uuid;

pub const PROJECT_ID: i64 = 1;
pub const OWNER_ID: i64 = 100;

/// Indexer that records every cleanup request.
#[derive(Default)]
pub struct RecordingIndexer {
    pub calls: Mutex<Vec<(i64, Vec<i64>)>>,
}

#[async_trait]
impl LogIndexer for RecordingIndexer {
    async fn clean_index(&self, project_id: i64, log_ids: &[i64]) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((project_id, log_ids.to_vec()));
        Ok(())
    }
}

/// Blob store that records deleted keys and fails for `broken` ones.
#[derive(Default)]
pub struct MemoryBlobs {
    pub deleted: Mutex<Vec<String>>,
    pub broken: HashSet<String>,
}

#[async_trait]
impl DataStore for MemoryBlobs {
    async fn delete(&self, key: &str) -> AppResult<()> {
        if self.broken.contains(key) {
            return Err(AppError::Storage(format!("cannot delete {}", key)));
        }
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub indexer: Arc<RecordingIndexer>,
    pub blobs: Arc<MemoryBlobs>,
    pub bus: EventBus,
    pub handlers: Handlers,
    pub listener: JoinHandle<()>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_blobs(MemoryBlobs::default())
    }

    pub fn with_blobs(blobs: MemoryBlobs) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let indexer = Arc::new(RecordingIndexer::default());
        let blobs = Arc::new(blobs);
        let bus = EventBus::new();
        let listener = spawn_attachment_cleanup(&bus, store.clone(), blobs.clone());
        let handlers = Handlers::new(store.clone(), indexer.clone(), &bus);
        Self {
            store,
            indexer,
            blobs,
            bus,
            handlers,
            listener,
        }
    }

    /// Indexed log ids across all cleanup calls, sorted.
    pub fn indexed_log_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .indexer
            .calls
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, ids)| ids.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Wait until the listener has drained attachments down to `expected`.
    pub async fn wait_for_attachments(&self, expected: &[i64]) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let ids = self.store.attachment_ids().await;
            if ids == expected {
                return;
            }
            if tokio::time::Instant::now() > deadline {
                panic!("attachments still {:?}, expected {:?}", ids, expected);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

pub fn owner() -> ReportingUser {
    ReportingUser {
        user_id: OWNER_ID,
        username: "owner".to_string(),
        user_role: UserRole::User,
    }
}

pub fn user(user_id: i64, role: UserRole) -> ReportingUser {
    ReportingUser {
        user_id,
        username: format!("user{}", user_id),
        user_role: role,
    }
}

pub fn project(role: ProjectRole) -> ProjectDetails {
    ProjectDetails {
        project_id: PROJECT_ID,
        project_name: "demo".to_string(),
        project_role: role,
    }
}

pub fn member() -> ProjectDetails {
    project(ProjectRole::Member)
}

pub fn launch(id: i64) -> Launch {
    Launch {
        id,
        uuid: Uuid::new_v4(),
        project_id: PROJECT_ID,
        user_id: OWNER_ID,
        name: "nightly".to_string(),
        description: None,
        number: id,
        mode: LaunchMode::Default,
        status: ItemStatus::Failed,
        has_retries: false,
        start_time: Utc::now(),
        end_time: Some(Utc::now()),
    }
}

pub fn item(id: i64, launch_id: i64, parent_id: Option<i64>, path: &str) -> TestItem {
    TestItem {
        id,
        launch_id,
        parent_id,
        path: path.to_string(),
        name: format!("item-{}", id),
        item_type: "step".to_string(),
        status: ItemStatus::Passed,
        has_children: false,
        retry_of: None,
    }
}

pub fn parent(id: i64, launch_id: i64, parent_id: Option<i64>, path: &str) -> TestItem {
    TestItem {
        has_children: true,
        item_type: "suite".to_string(),
        ..item(id, launch_id, parent_id, path)
    }
}

pub fn log(id: i64, item_id: i64) -> LogEntry {
    LogEntry {
        id,
        project_id: PROJECT_ID,
        item_id: Some(item_id),
        launch_id: None,
        level: "error".to_string(),
        message: format!("log {}", id),
        log_time: Utc::now(),
    }
}

pub fn attachment(id: i64, item_id: i64) -> Attachment {
    Attachment {
        id,
        project_id: PROJECT_ID,
        launch_id: None,
        item_id: Some(item_id),
        file_id: format!("file-{}", id),
        thumbnail_id: Some(format!("thumb-{}", id)),
        content_type: Some("image/png".to_string()),
        creation_date: Utc::now(),
    }
}
