//! Project queries.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entity::{project, project_attribute};
use crate::error::{AppError, AppResult};
use crate::models::{PageRequest, Project, ProjectAttribute};
use crate::repository::ProjectRepository;

use super::DbPool;

#[async_trait]
impl ProjectRepository for DbPool {
    async fn find_with_attribute(
        &self,
        attribute: &str,
        page: PageRequest,
    ) -> AppResult<Vec<Project>> {
        // Attribute names are matched case-insensitively.
        let attributes = project_attribute::Entity::find()
            .filter(
                Expr::col((
                    project_attribute::Entity,
                    project_attribute::Column::Name,
                ))
                .ilike(attribute),
            )
            .order_by_asc(project_attribute::Column::ProjectId)
            .offset(page.offset())
            .limit(page.size)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project attributes: {}", e)))?;

        if attributes.is_empty() {
            return Ok(Vec::new());
        }

        let project_ids: Vec<i64> = attributes.iter().map(|attr| attr.project_id).collect();
        let names: HashMap<i64, String> = project::Entity::find()
            .filter(project::Column::Id.is_in(project_ids))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get projects: {}", e)))?
            .into_iter()
            .map(|model| (model.id, model.name))
            .collect();

        Ok(attributes
            .into_iter()
            .filter_map(|attr| {
                names.get(&attr.project_id).map(|name| Project {
                    id: attr.project_id,
                    name: name.clone(),
                    attributes: vec![ProjectAttribute {
                        name: attr.name,
                        value: attr.value,
                    }],
                })
            })
            .collect())
    }
}
