//! Attachment metadata queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entity::attachment::{self, Column, Entity as AttachmentEntity};
use crate::error::{AppError, AppResult};
use crate::models::Attachment;
use crate::repository::AttachmentRepository;

use super::DbPool;

impl From<attachment::Model> for Attachment {
    fn from(model: attachment::Model) -> Self {
        Attachment {
            id: model.id,
            project_id: model.project_id,
            launch_id: model.launch_id,
            item_id: model.item_id,
            file_id: model.file_id,
            thumbnail_id: model.thumbnail_id,
            content_type: model.content_type,
            creation_date: model.creation_date,
        }
    }
}

#[async_trait]
impl AttachmentRepository for DbPool {
    async fn find_by_item_id(&self, item_id: i64) -> AppResult<Vec<Attachment>> {
        let models = AttachmentEntity::find()
            .filter(Column::ItemId.eq(item_id))
            .order_by_asc(Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get attachments: {}", e)))?;

        Ok(models.into_iter().map(Attachment::from).collect())
    }

    async fn find_created_before(
        &self,
        project_id: i64,
        cutoff: DateTime<Utc>,
        after_id: i64,
        limit: u64,
    ) -> AppResult<Vec<Attachment>> {
        let models = AttachmentEntity::find()
            .filter(Column::ProjectId.eq(project_id))
            .filter(Column::CreationDate.lt(cutoff))
            .filter(Column::Id.gt(after_id))
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get expired attachments: {}", e))
            })?;

        Ok(models.into_iter().map(Attachment::from).collect())
    }

    async fn delete_all_by_id(&self, ids: &[i64]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = AttachmentEntity::delete_many()
            .filter(Column::Id.is_in(ids.to_vec()))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete attachments: {}", e)))?;

        Ok(result.rows_affected)
    }
}
