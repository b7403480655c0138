//! Migration: Create projects and project_attributes tables.
//!
//! Projects own launches; attributes hold per-project job settings.

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
                CREATE TABLE projects (
                    id BIGSERIAL PRIMARY KEY,
                    name VARCHAR(256) NOT NULL UNIQUE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE TABLE project_attributes (
                    project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    name VARCHAR(256) NOT NULL,
                    value VARCHAR(256) NOT NULL,
                    PRIMARY KEY (project_id, name)
                );

                -- Lookup of projects by setting (e.g. job.keepScreenshots)
                CREATE INDEX idx_project_attributes_name ON project_attributes(LOWER(name));
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
                DROP TABLE IF EXISTS project_attributes CASCADE;
                DROP TABLE IF EXISTS projects CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
