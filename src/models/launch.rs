//! Launch domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ItemStatus;

/// Launch mode. Debug launches are hidden from regular project views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    #[default]
    Default,
    Debug,
}

impl LaunchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Debug => "debug",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }
}

impl std::fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single execution of a test run within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub id: i64,
    pub uuid: Uuid,
    pub project_id: i64,
    /// User that started the launch.
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub number: i64,
    pub mode: LaunchMode,
    pub status: ItemStatus,
    /// Whether any item under the launch is a retry.
    pub has_retries: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Values for a launch that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewLaunch {
    pub uuid: Uuid,
    pub project_id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub number: i64,
    pub mode: LaunchMode,
    pub start_time: DateTime<Utc>,
}

/// Request to start a launch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartLaunchRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Client-supplied uuid; generated when absent.
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mode: LaunchMode,
    /// Continue reporting into an existing launch instead of creating one.
    #[serde(default)]
    pub rerun: bool,
    /// Launch to rerun; the latest launch with the same name when absent.
    #[serde(default)]
    pub rerun_of: Option<Uuid>,
}

/// Response after a launch was started.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartLaunchResponse {
    pub id: i64,
    pub uuid: Uuid,
    pub number: i64,
}

impl From<&Launch> for StartLaunchResponse {
    fn from(launch: &Launch) -> Self {
        Self {
            id: launch.id,
            uuid: launch.uuid,
            number: launch.number,
        }
    }
}
