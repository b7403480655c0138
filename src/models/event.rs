//! Domain events published on the in-process event bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WidgetActivity;

/// Event emitted after a state change handled by this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum DomainEvent {
    /// A test item was deleted; its binary attachments should be purged.
    TestItemAttachmentsDeleted(TestItemAttachmentsDeletedPayload),
    /// A widget was updated.
    WidgetUpdated(WidgetUpdatedPayload),
    /// A launch was started (or restarted by a rerun).
    LaunchStarted(LaunchStartedPayload),
}

/// Payload for test_item_attachments_deleted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestItemAttachmentsDeletedPayload {
    pub item_id: i64,
}

/// Payload for widget_updated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetUpdatedPayload {
    pub before: WidgetActivity,
    pub after: WidgetActivity,
    /// Serialized widget options before the update.
    pub options_before: String,
    /// Serialized widget options after the update.
    pub options_after: String,
    pub user_id: i64,
}

/// Payload for launch_started event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchStartedPayload {
    pub launch_id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub name: String,
    pub number: i64,
    pub rerun: bool,
}

/// Wrapper that includes timestamp with every event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(flatten)]
    pub event: DomainEvent,
    pub timestamp: DateTime<Utc>,
}

impl EventMessage {
    /// Create a new event message with the current timestamp.
    pub fn new(event: DomainEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}

impl DomainEvent {
    /// Create a test_item_attachments_deleted event.
    pub fn attachments_deleted(item_id: i64) -> Self {
        DomainEvent::TestItemAttachmentsDeleted(TestItemAttachmentsDeletedPayload { item_id })
    }

    /// Short event name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::TestItemAttachmentsDeleted(_) => "test_item_attachments_deleted",
            DomainEvent::WidgetUpdated(_) => "widget_updated",
            DomainEvent::LaunchStarted(_) => "launch_started",
        }
    }
}
