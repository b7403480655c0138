//! Migration: Create test_items table.
//!
//! Items form a tree per launch addressed by a materialized path of ids.
//! Removing an item removes its children and its retries through the foreign keys.

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
                CREATE TABLE test_items (
                    id BIGSERIAL PRIMARY KEY,
                    launch_id BIGINT NOT NULL REFERENCES launches(id) ON DELETE CASCADE,
                    parent_id BIGINT REFERENCES test_items(id) ON DELETE CASCADE,
                    -- Dot separated ids from the root, e.g. 1.10.42
                    path TEXT NOT NULL,
                    name VARCHAR(1024) NOT NULL,
                    item_type VARCHAR(32) NOT NULL,
                    status VARCHAR(20) NOT NULL DEFAULT 'in_progress'
                        CHECK (status IN ('in_progress', 'passed', 'failed', 'stopped', 'skipped',
                                          'interrupted', 'cancelled', 'info', 'warn')),
                    has_children BOOLEAN NOT NULL DEFAULT FALSE,
                    retry_of BIGINT REFERENCES test_items(id) ON DELETE CASCADE
                );

                -- Prefix lookups for subtree queries
                CREATE INDEX idx_test_items_path ON test_items(path text_pattern_ops);
                CREATE INDEX idx_test_items_launch_id ON test_items(launch_id);
                CREATE INDEX idx_test_items_parent_id ON test_items(parent_id);
                CREATE INDEX idx_test_items_retry_of ON test_items(retry_of)
                    WHERE retry_of IS NOT NULL;
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
                DROP TABLE IF EXISTS test_items CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
