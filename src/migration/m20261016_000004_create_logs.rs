//! Migration: Create logs table.
//!
//! Logs belong to a test item or a launch and go away with their item.

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
                CREATE TABLE logs (
                    id BIGSERIAL PRIMARY KEY,
                    project_id BIGINT NOT NULL,
                    item_id BIGINT REFERENCES test_items(id) ON DELETE CASCADE,
                    launch_id BIGINT REFERENCES launches(id) ON DELETE CASCADE,
                    level VARCHAR(20) NOT NULL,
                    message TEXT NOT NULL,
                    log_time TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_logs_item_id ON logs(item_id) WHERE item_id IS NOT NULL;
                CREATE INDEX idx_logs_launch_id ON logs(launch_id) WHERE launch_id IS NOT NULL;
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
                DROP TABLE IF EXISTS logs CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
