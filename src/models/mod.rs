//! Domain models for the report portal service.

use serde::{Deserialize, Serialize};

pub mod event;
pub mod launch;
pub mod project;
pub mod test_item;
pub mod widget;

// Re-export commonly used types
pub use event::{
    DomainEvent, EventMessage, LaunchStartedPayload, TestItemAttachmentsDeletedPayload,
    WidgetUpdatedPayload,
};
pub use launch::{Launch, LaunchMode, NewLaunch, StartLaunchRequest, StartLaunchResponse};
pub use project::{
    Attachment, KEEP_SCREENSHOTS_ATTRIBUTE, KeepScreenshotsDelay, LogEntry, Project,
    ProjectAttribute,
};
pub use test_item::{ItemStatus, TestItem};
pub use widget::{UpdateWidgetRequest, UserFilter, Widget, WidgetActivity};

/// Result message of a completed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCompletion {
    pub message: String,
}

impl OperationCompletion {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Confirmation returned for every deleted test item.
    pub fn test_item_deleted(id: i64) -> Self {
        Self::new(format!(
            "Test Item with ID = {} has been successfully deleted.",
            id
        ))
    }
}

/// Page request for repository queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number.
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn first(size: u64) -> Self {
        Self {
            page: 0,
            size: size.max(1),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            size: self.size,
        }
    }

    /// Calculate the offset for database queries.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}
