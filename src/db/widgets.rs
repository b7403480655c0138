//! Widget, saved filter and widget sharing queries.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

use crate::entity::{user_filter, widget, widget_acl, widget_filter};
use crate::error::{AppError, AppResult};
use crate::models::{UserFilter, Widget};
use crate::repository::{AclRepository, UserFilterRepository, WidgetRepository};

use super::DbPool;

fn to_widget(model: widget::Model, filter_ids: Vec<i64>) -> Widget {
    Widget {
        id: model.id,
        project_id: model.project_id,
        owner: model.owner,
        name: model.name,
        description: model.description,
        widget_type: model.widget_type,
        items_count: model.items_count,
        widget_options: model.widget_options,
        shared: model.shared,
        filter_ids,
    }
}

impl From<user_filter::Model> for UserFilter {
    fn from(model: user_filter::Model) -> Self {
        UserFilter {
            id: model.id,
            project_id: model.project_id,
            owner: model.owner,
            name: model.name,
            shared: model.shared,
        }
    }
}

#[async_trait]
impl WidgetRepository for DbPool {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Widget>> {
        let Some(model) = widget::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get widget: {}", e)))?
        else {
            return Ok(None);
        };

        let filter_ids = widget_filter::Entity::find()
            .select_only()
            .column(widget_filter::Column::FilterId)
            .filter(widget_filter::Column::WidgetId.eq(id))
            .order_by_asc(widget_filter::Column::FilterId)
            .into_tuple::<i64>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get widget filters: {}", e)))?;

        Ok(Some(to_widget(model, filter_ids)))
    }

    async fn save(&self, widget: &Widget) -> AppResult<Widget> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let model = widget::ActiveModel {
            id: Set(widget.id),
            project_id: Set(widget.project_id),
            owner: Set(widget.owner.clone()),
            name: Set(widget.name.clone()),
            description: Set(widget.description.clone()),
            widget_type: Set(widget.widget_type.clone()),
            items_count: Set(widget.items_count),
            widget_options: Set(widget.widget_options.clone()),
            shared: Set(widget.shared),
        };
        let saved = model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update widget: {}", e)))?;

        widget_filter::Entity::delete_many()
            .filter(widget_filter::Column::WidgetId.eq(widget.id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear widget filters: {}", e)))?;

        if !widget.filter_ids.is_empty() {
            let links = widget.filter_ids.iter().map(|filter_id| widget_filter::ActiveModel {
                widget_id: Set(widget.id),
                filter_id: Set(*filter_id),
            });
            widget_filter::Entity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to insert widget filters: {}", e))
                })?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit widget: {}", e)))?;

        Ok(to_widget(saved, widget.filter_ids.clone()))
    }
}

#[async_trait]
impl UserFilterRepository for DbPool {
    async fn find_permitted(
        &self,
        ids: &[i64],
        project_id: i64,
        username: &str,
    ) -> AppResult<Vec<UserFilter>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = user_filter::Entity::find()
            .filter(user_filter::Column::Id.is_in(ids.to_vec()))
            .filter(user_filter::Column::ProjectId.eq(project_id))
            .filter(
                Condition::any()
                    .add(user_filter::Column::Shared.eq(true))
                    .add(user_filter::Column::Owner.eq(username)),
            )
            .order_by_asc(user_filter::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get filters: {}", e)))?;

        Ok(models.into_iter().map(UserFilter::from).collect())
    }
}

#[async_trait]
impl AclRepository for DbPool {
    async fn update_widget_acl(
        &self,
        widget_id: i64,
        project_id: i64,
        shared: bool,
    ) -> AppResult<()> {
        let existing = widget_acl::Entity::find_by_id((widget_id, project_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get widget acl: {}", e)))?;

        match (shared, existing) {
            (true, None) => {
                widget_acl::ActiveModel {
                    widget_id: Set(widget_id),
                    project_id: Set(project_id),
                }
                .insert(self.connection())
                .await
                .map_err(|e| AppError::Database(format!("Failed to share widget: {}", e)))?;
            }
            (false, Some(_)) => {
                widget_acl::Entity::delete_by_id((widget_id, project_id))
                    .exec(self.connection())
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to unshare widget: {}", e)))?;
            }
            _ => {}
        }
        Ok(())
    }
}
