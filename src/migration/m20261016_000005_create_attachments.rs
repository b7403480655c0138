//! Migration: Create attachments table.
//!
//! Metadata of blobs in object storage. No foreign key on the item: rows stay
//! until the cleanup listener has removed the blobs.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE attachments (
                    id BIGSERIAL PRIMARY KEY,
                    project_id BIGINT NOT NULL,
                    launch_id BIGINT,
                    item_id BIGINT,
                    file_id VARCHAR(1024) NOT NULL,
                    thumbnail_id VARCHAR(1024),
                    content_type VARCHAR(256),
                    creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_attachments_item_id ON attachments(item_id) WHERE item_id IS NOT NULL;
                CREATE INDEX idx_attachments_project_created ON attachments(project_id, creation_date, id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TABLE IF EXISTS attachments CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
