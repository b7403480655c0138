//! Dashboard widget models.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Dashboard widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: i64,
    pub project_id: i64,
    /// Username of the widget owner.
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub widget_type: String,
    pub items_count: i32,
    /// Widget-type specific options (stored as JSONB).
    pub widget_options: JsonValue,
    pub shared: bool,
    pub filter_ids: Vec<i64>,
}

/// Saved launch filter a widget can be built on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFilter {
    pub id: i64,
    pub project_id: i64,
    pub owner: String,
    pub name: String,
    pub shared: bool,
}

/// Request to update a widget. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWidgetRequest {
    pub name: String,
    /// An empty description clears the current one.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub widget_type: Option<String>,
    #[serde(default)]
    pub items_count: Option<i32>,
    #[serde(default)]
    pub widget_options: Option<JsonValue>,
    #[serde(default)]
    pub shared: Option<bool>,
    #[serde(default)]
    pub filter_ids: Vec<i64>,
}

/// Snapshot of a widget recorded in activity events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetActivity {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub items_count: i32,
    pub shared: bool,
}

impl From<&Widget> for WidgetActivity {
    fn from(widget: &Widget) -> Self {
        Self {
            id: widget.id,
            project_id: widget.project_id,
            name: widget.name.clone(),
            description: widget.description.clone(),
            items_count: widget.items_count,
            shared: widget.shared,
        }
    }
}
