//! Migration: Create launches table.
//!
//! A launch is one run of a test suite within a project, numbered per name.

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
                CREATE TABLE launches (
                    id BIGSERIAL PRIMARY KEY,
                    uuid UUID NOT NULL UNIQUE,
                    project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    user_id BIGINT NOT NULL,
                    name VARCHAR(256) NOT NULL,
                    description TEXT,
                    number BIGINT NOT NULL,
                    mode VARCHAR(20) NOT NULL DEFAULT 'default'
                        CHECK (mode IN ('default', 'debug')),
                    status VARCHAR(20) NOT NULL DEFAULT 'in_progress',
                    has_retries BOOLEAN NOT NULL DEFAULT FALSE,
                    start_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    end_time TIMESTAMPTZ,
                    UNIQUE (project_id, name, number)
                );

                CREATE INDEX idx_launches_project_name ON launches(project_id, name, number DESC);
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
                DROP TABLE IF EXISTS launches CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
