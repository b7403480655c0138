//! Project, log and attachment models used by cleanup flows.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Project attribute holding the screenshot retention period.
pub const KEEP_SCREENSHOTS_ATTRIBUTE: &str = "job.keepScreenshots";

/// Project together with the attributes selected for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub attributes: Vec<ProjectAttribute>,
}

impl Project {
    /// Value of the attribute with the given name (case-insensitive).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAttribute {
    pub name: String,
    pub value: String,
}

/// How long screenshots are kept before the cleanup job removes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeepScreenshotsDelay {
    OneWeek,
    TwoWeeks,
    ThreeWeeks,
    OneMonth,
    ThreeMonths,
    Forever,
}

impl KeepScreenshotsDelay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneWeek => "1 week",
            Self::TwoWeeks => "2 weeks",
            Self::ThreeWeeks => "3 weeks",
            Self::OneMonth => "1 month",
            Self::ThreeMonths => "3 months",
            Self::Forever => "forever",
        }
    }

    pub fn days(&self) -> u64 {
        match self {
            Self::OneWeek => 7,
            Self::TwoWeeks => 14,
            Self::ThreeWeeks => 21,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::Forever => 0,
        }
    }

    /// Retention period; zero means screenshots are never removed.
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.days() * 24 * 60 * 60)
    }

    pub fn find_by_name(name: &str) -> AppResult<Self> {
        let normalized = name.trim().to_lowercase();
        [
            Self::OneWeek,
            Self::TwoWeeks,
            Self::ThreeWeeks,
            Self::OneMonth,
            Self::ThreeMonths,
            Self::Forever,
        ]
        .into_iter()
        .find(|delay| delay.as_str() == normalized)
        .ok_or_else(|| {
            AppError::IncorrectRequest(format!("Unknown keep screenshots delay '{}'", name))
        })
    }
}

/// Stored binary attachment (screenshot) with its optional thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub project_id: i64,
    pub launch_id: Option<i64>,
    pub item_id: Option<i64>,
    /// Key of the blob in the data store.
    pub file_id: String,
    pub thumbnail_id: Option<String>,
    pub content_type: Option<String>,
    pub creation_date: DateTime<Utc>,
}

/// Log entry attached to a test item or launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub project_id: i64,
    pub item_id: Option<i64>,
    pub launch_id: Option<i64>,
    pub level: String,
    pub message: String,
    pub log_time: DateTime<Utc>,
}
