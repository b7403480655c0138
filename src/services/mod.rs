//! Business logic services.

pub mod attachment_cleanup;
pub mod delete_item;
pub mod event_bus;
pub mod launch;
pub mod log_cleaner;
pub mod log_indexer;
pub mod screenshot_cleanup;
pub mod storage;
pub mod widget;

pub use attachment_cleanup::spawn_attachment_cleanup;
pub use delete_item::DeleteTestItemHandler;
pub use event_bus::{EventBus, EventPublisher};
pub use launch::StartLaunchHandler;
pub use log_cleaner::{LogCleaner, RemovedAttachments};
pub use log_indexer::LogIndexer;
pub use screenshot_cleanup::{CleanScreenshotsJob, CleanupSummary, start_screenshot_cleanup_task};
pub use storage::{DataStore, Storage};
pub use widget::UpdateWidgetHandler;

use std::sync::Arc;

use crate::config::AnalyzerSettings;
use crate::error::AppResult;
use crate::repository::{
    AclRepository, LaunchRepository, LogRepository, TestItemRepository, UserFilterRepository,
    WidgetRepository,
};

/// Request handlers wired to one storage backend and event bus.
#[derive(Clone)]
pub struct Handlers {
    pub delete_items: DeleteTestItemHandler,
    pub update_widget: UpdateWidgetHandler,
    pub start_launch: StartLaunchHandler,
}

impl Handlers {
    pub fn new<R>(repo: Arc<R>, indexer: Arc<dyn LogIndexer>, bus: &EventBus) -> Self
    where
        R: TestItemRepository
            + LaunchRepository
            + LogRepository
            + WidgetRepository
            + UserFilterRepository
            + AclRepository
            + 'static,
    {
        let events: Arc<dyn EventPublisher> = Arc::new(bus.clone());
        Self {
            delete_items: DeleteTestItemHandler::new(
                repo.clone(),
                repo.clone(),
                repo.clone(),
                indexer,
                events.clone(),
            ),
            update_widget: UpdateWidgetHandler::new(
                repo.clone(),
                repo.clone(),
                repo.clone(),
                events.clone(),
            ),
            start_launch: StartLaunchHandler::new(repo, events),
        }
    }

    /// Build handlers with the log indexer described by `analyzer`.
    pub fn with_analyzer<R>(
        repo: Arc<R>,
        analyzer: &AnalyzerSettings,
        bus: &EventBus,
    ) -> AppResult<Self>
    where
        R: TestItemRepository
            + LaunchRepository
            + LogRepository
            + WidgetRepository
            + UserFilterRepository
            + AclRepository
            + 'static,
    {
        let indexer = log_indexer::from_settings(analyzer)?;
        Ok(Self::new(repo, Arc::from(indexer), bus))
    }
}
