//! Test item domain models.

use serde::{Deserialize, Serialize};

/// Separator between ids in a materialized item path.
pub const PATH_SEPARATOR: char = '.';

/// Execution status shared by test items and launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    InProgress,
    Passed,
    Failed,
    Stopped,
    Skipped,
    Interrupted,
    Cancelled,
    Info,
    Warn,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
            Self::Skipped => "skipped",
            Self::Interrupted => "interrupted",
            Self::Cancelled => "cancelled",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(Self::InProgress),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "stopped" => Some(Self::Stopped),
            "skipped" => Some(Self::Skipped),
            "interrupted" => Some(Self::Interrupted),
            "cancelled" => Some(Self::Cancelled),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            _ => None,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in a launch's test tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestItem {
    pub id: i64,
    pub launch_id: i64,
    pub parent_id: Option<i64>,
    /// Materialized path of ancestor ids ending with this item's id, e.g. `1.10.42`.
    pub path: String,
    pub name: String,
    pub item_type: String,
    pub status: ItemStatus,
    pub has_children: bool,
    /// Set when this item is a retry of another item.
    pub retry_of: Option<i64>,
}

impl TestItem {
    /// Depth of the item in its tree; root items are level 1.
    pub fn level(&self) -> usize {
        path_level(&self.path)
    }

    /// Path of the parent item, derived from this item's path.
    pub fn parent_path(&self) -> Option<&str> {
        self.parent_id?;
        self.path
            .rsplit_once(PATH_SEPARATOR)
            .map(|(parent, _)| parent)
    }

    pub fn is_retry(&self) -> bool {
        self.retry_of.is_some()
    }
}

/// Number of segments in a materialized path.
pub fn path_level(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.split(PATH_SEPARATOR).count()
    }
}

/// Whether `path` equals `ancestor` or lies underneath it.
pub fn is_path_within(path: &str, ancestor: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some("") => true,
        Some(rest) => rest.starts_with(PATH_SEPARATOR),
        None => false,
    }
}
