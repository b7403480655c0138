//! Log queries.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entity::log::{Column, Entity as LogEntity};
use crate::error::{AppError, AppResult};
use crate::repository::LogRepository;

use super::DbPool;

#[async_trait]
impl LogRepository for DbPool {
    async fn find_ids_by_item_id(&self, item_id: i64) -> AppResult<Vec<i64>> {
        self.find_ids_by_item_ids(&[item_id]).await
    }

    async fn find_ids_by_item_ids(&self, item_ids: &[i64]) -> AppResult<Vec<i64>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        LogEntity::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::ItemId.is_in(item_ids.to_vec()))
            .order_by_asc(Column::Id)
            .into_tuple::<i64>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get log ids: {}", e)))
    }
}
