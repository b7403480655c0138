//! Test item queries.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entity::test_item::{self, Column, Entity as TestItemEntity};
use crate::error::{AppError, AppResult};
use crate::models::test_item::PATH_SEPARATOR;
use crate::models::{ItemStatus, TestItem};
use crate::repository::TestItemRepository;

use super::DbPool;

/// Items at `path` or below it. The separator keeps `1` from matching `10`.
fn within(path: &str) -> Condition {
    Condition::any()
        .add(Column::Path.eq(path))
        .add(Column::Path.starts_with(format!("{}{}", path, PATH_SEPARATOR)))
}

impl TryFrom<test_item::Model> for TestItem {
    type Error = AppError;

    fn try_from(model: test_item::Model) -> AppResult<Self> {
        let status = ItemStatus::parse(&model.status).ok_or_else(|| {
            AppError::Database(format!(
                "Unknown status '{}' of test item {}",
                model.status, model.id
            ))
        })?;

        Ok(TestItem {
            id: model.id,
            launch_id: model.launch_id,
            parent_id: model.parent_id,
            path: model.path,
            name: model.name,
            item_type: model.item_type,
            status,
            has_children: model.has_children,
            retry_of: model.retry_of,
        })
    }
}

#[async_trait]
impl TestItemRepository for DbPool {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<TestItem>> {
        TestItemEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test item: {}", e)))?
            .map(TestItem::try_from)
            .transpose()
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> AppResult<Vec<TestItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        TestItemEntity::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test items: {}", e)))?
            .into_iter()
            .map(TestItem::try_from)
            .collect()
    }

    async fn has_children(&self, parent_id: i64, parent_path: &str) -> AppResult<bool> {
        let child = TestItemEntity::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Path.starts_with(format!("{}{}", parent_path, PATH_SEPARATOR)))
            .filter(Column::Id.ne(parent_id))
            .limit(1)
            .into_tuple::<i64>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check children: {}", e)))?;

        Ok(child.is_some())
    }

    async fn descendant_ids(&self, path: &str) -> AppResult<Vec<i64>> {
        TestItemEntity::find()
            .select_only()
            .column(Column::Id)
            .filter(within(path))
            .order_by_asc(Column::Id)
            .into_tuple::<i64>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get descendants: {}", e)))
    }

    async fn find_retries_of(&self, ids: &[i64]) -> AppResult<Vec<TestItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        TestItemEntity::find()
            .filter(Column::RetryOf.is_in(ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get retries: {}", e)))?
            .into_iter()
            .map(TestItem::try_from)
            .collect()
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        TestItemEntity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test item: {}", e)))?;
        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[i64]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = TestItemEntity::delete_many()
            .filter(Column::Id.is_in(ids.to_vec()))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test items: {}", e)))?;

        Ok(result.rows_affected)
    }

    async fn set_has_children(&self, id: i64, has_children: bool) -> AppResult<()> {
        TestItemEntity::update_many()
            .col_expr(
                Column::HasChildren,
                sea_orm::sea_query::Expr::value(has_children),
            )
            .filter(Column::Id.eq(id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update has_children: {}", e)))?;
        Ok(())
    }
}
