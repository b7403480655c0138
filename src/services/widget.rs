//! Dashboard widget updates.

use std::sync::Arc;

use tracing::info;

use crate::auth::{ProjectDetails, ReportingUser, authorize_widget_administration};
use crate::error::{AppError, AppResult};
use crate::models::{
    DomainEvent, OperationCompletion, UpdateWidgetRequest, Widget, WidgetActivity,
    WidgetUpdatedPayload,
};
use crate::repository::{AclRepository, UserFilterRepository, WidgetRepository};
use crate::services::event_bus::EventPublisher;

#[derive(Clone)]
pub struct UpdateWidgetHandler {
    widgets: Arc<dyn WidgetRepository>,
    filters: Arc<dyn UserFilterRepository>,
    acl: Arc<dyn AclRepository>,
    events: Arc<dyn EventPublisher>,
}

impl UpdateWidgetHandler {
    pub fn new(
        widgets: Arc<dyn WidgetRepository>,
        filters: Arc<dyn UserFilterRepository>,
        acl: Arc<dyn AclRepository>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            widgets,
            filters,
            acl,
            events,
        }
    }

    pub async fn update_widget(
        &self,
        widget_id: i64,
        request: UpdateWidgetRequest,
        project: &ProjectDetails,
        user: &ReportingUser,
    ) -> AppResult<OperationCompletion> {
        if request.name.trim().is_empty() {
            return Err(AppError::IncorrectRequest(
                "Widget name must not be blank".to_string(),
            ));
        }

        let widget = self
            .widgets
            .find_by_id(widget_id)
            .await?
            .ok_or_else(|| AppError::widget_not_found(widget_id))?;
        authorize_widget_administration(user, &widget, project)?;

        let before = WidgetActivity::from(&widget);
        let options_before = serde_json::to_string(&widget.widget_options)?;

        let filter_ids = if request.filter_ids.is_empty() {
            Vec::new()
        } else {
            self.filters
                .find_permitted(&request.filter_ids, project.project_id, &user.username)
                .await?
                .into_iter()
                .map(|filter| filter.id)
                .collect()
        };

        let was_shared = widget.shared;
        let updated = apply_update(widget, request, filter_ids);
        let saved = self.widgets.save(&updated).await?;

        if saved.shared != was_shared {
            self.acl
                .update_widget_acl(saved.id, project.project_id, saved.shared)
                .await?;
        }

        self.events
            .publish(DomainEvent::WidgetUpdated(WidgetUpdatedPayload {
                before,
                after: WidgetActivity::from(&saved),
                options_before,
                options_after: serde_json::to_string(&saved.widget_options)?,
                user_id: user.user_id,
            }));

        info!("Widget {} updated by user {}", saved.id, user.user_id);

        Ok(OperationCompletion::new(format!(
            "Widget with ID = '{}' successfully updated.",
            saved.id
        )))
    }
}

fn apply_update(mut widget: Widget, request: UpdateWidgetRequest, filter_ids: Vec<i64>) -> Widget {
    widget.name = request.name.trim().to_string();
    if let Some(description) = request.description {
        let description = description.trim();
        widget.description = (!description.is_empty()).then(|| description.to_string());
    }
    if let Some(widget_type) = request.widget_type {
        widget.widget_type = widget_type;
    }
    if let Some(items_count) = request.items_count {
        widget.items_count = items_count;
    }
    if let Some(options) = request.widget_options {
        widget.widget_options = options;
    }
    if let Some(shared) = request.shared {
        widget.shared = shared;
    }
    widget.filter_ids = filter_ids;
    widget
}
