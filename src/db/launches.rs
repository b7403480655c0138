//! Launch queries.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::launch::{self, ActiveModel, Column, Entity as LaunchEntity};
use crate::entity::test_item;
use crate::error::{AppError, AppResult};
use crate::models::{ItemStatus, Launch, LaunchMode, NewLaunch};
use crate::repository::LaunchRepository;

use super::DbPool;

impl TryFrom<launch::Model> for Launch {
    type Error = AppError;

    fn try_from(model: launch::Model) -> AppResult<Self> {
        let status = ItemStatus::parse(&model.status).ok_or_else(|| {
            AppError::Database(format!(
                "Unknown status '{}' of launch {}",
                model.status, model.id
            ))
        })?;
        let mode = LaunchMode::parse(&model.mode).ok_or_else(|| {
            AppError::Database(format!("Unknown mode '{}' of launch {}", model.mode, model.id))
        })?;

        Ok(Launch {
            id: model.id,
            uuid: model.uuid,
            project_id: model.project_id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            number: model.number,
            mode,
            status,
            has_retries: model.has_retries,
            start_time: model.start_time,
            end_time: model.end_time,
        })
    }
}

#[async_trait]
impl LaunchRepository for DbPool {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Launch>> {
        LaunchEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get launch: {}", e)))?
            .map(Launch::try_from)
            .transpose()
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> AppResult<Vec<Launch>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        LaunchEntity::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get launches: {}", e)))?
            .into_iter()
            .map(Launch::try_from)
            .collect()
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> AppResult<Option<Launch>> {
        LaunchEntity::find()
            .filter(Column::Uuid.eq(uuid))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get launch by uuid: {}", e)))?
            .map(Launch::try_from)
            .transpose()
    }

    async fn find_latest_by_name(&self, project_id: i64, name: &str) -> AppResult<Option<Launch>> {
        LaunchEntity::find()
            .filter(Column::ProjectId.eq(project_id))
            .filter(Column::Name.eq(name))
            .order_by_desc(Column::Number)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get latest launch: {}", e)))?
            .map(Launch::try_from)
            .transpose()
    }

    async fn last_number(&self, project_id: i64, name: &str) -> AppResult<i64> {
        let number = LaunchEntity::find()
            .select_only()
            .column(Column::Number)
            .filter(Column::ProjectId.eq(project_id))
            .filter(Column::Name.eq(name))
            .order_by_desc(Column::Number)
            .limit(1)
            .into_tuple::<i64>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get launch number: {}", e)))?;

        Ok(number.unwrap_or(0))
    }

    async fn has_retries(&self, launch_id: i64) -> AppResult<bool> {
        let retry = test_item::Entity::find()
            .select_only()
            .column(test_item::Column::Id)
            .filter(test_item::Column::LaunchId.eq(launch_id))
            .filter(test_item::Column::RetryOf.is_not_null())
            .limit(1)
            .into_tuple::<i64>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check retries: {}", e)))?;

        Ok(retry.is_some())
    }

    async fn set_has_retries(&self, launch_id: i64, has_retries: bool) -> AppResult<()> {
        LaunchEntity::update_many()
            .col_expr(
                Column::HasRetries,
                sea_orm::sea_query::Expr::value(has_retries),
            )
            .filter(Column::Id.eq(launch_id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update has_retries: {}", e)))?;
        Ok(())
    }

    async fn insert(&self, launch: NewLaunch) -> AppResult<Launch> {
        let model = ActiveModel {
            id: NotSet,
            uuid: Set(launch.uuid),
            project_id: Set(launch.project_id),
            user_id: Set(launch.user_id),
            name: Set(launch.name),
            description: Set(launch.description),
            number: Set(launch.number),
            mode: Set(launch.mode.as_str().to_string()),
            status: Set(ItemStatus::InProgress.as_str().to_string()),
            has_retries: Set(false),
            start_time: Set(launch.start_time),
            end_time: Set(None),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert launch: {}", e)))?;

        Launch::try_from(result)
    }

    async fn update_status(&self, launch_id: i64, status: ItemStatus) -> AppResult<Launch> {
        let launch = LaunchEntity::find_by_id(launch_id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get launch: {}", e)))?
            .ok_or_else(|| AppError::launch_not_found(launch_id))?;

        let mut active: ActiveModel = launch.into();
        active.status = Set(status.as_str().to_string());
        if status.is_in_progress() {
            active.end_time = Set(None);
        }

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update launch status: {}", e)))?;

        Launch::try_from(result)
    }
}
