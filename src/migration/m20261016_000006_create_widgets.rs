//! Migration: Create widgets, user_filters and sharing tables.
//!
//! Dashboard widgets built on saved filters, shared per project through widget_acl.

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
                CREATE TABLE user_filters (
                    id BIGSERIAL PRIMARY KEY,
                    project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    owner VARCHAR(256) NOT NULL,
                    name VARCHAR(256) NOT NULL,
                    shared BOOLEAN NOT NULL DEFAULT FALSE
                );

                CREATE TABLE widgets (
                    id BIGSERIAL PRIMARY KEY,
                    project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    owner VARCHAR(256) NOT NULL,
                    name VARCHAR(256) NOT NULL,
                    description TEXT,
                    widget_type VARCHAR(64) NOT NULL,
                    items_count INTEGER NOT NULL DEFAULT 0,
                    widget_options JSONB NOT NULL DEFAULT '{}'::jsonb,
                    shared BOOLEAN NOT NULL DEFAULT FALSE
                );

                CREATE TABLE widget_filters (
                    widget_id BIGINT NOT NULL REFERENCES widgets(id) ON DELETE CASCADE,
                    filter_id BIGINT NOT NULL REFERENCES user_filters(id) ON DELETE CASCADE,
                    PRIMARY KEY (widget_id, filter_id)
                );

                CREATE TABLE widget_acl (
                    widget_id BIGINT NOT NULL REFERENCES widgets(id) ON DELETE CASCADE,
                    project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    PRIMARY KEY (widget_id, project_id)
                );

                CREATE INDEX idx_widgets_project_id ON widgets(project_id);
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
                DROP TABLE IF EXISTS widget_acl CASCADE;
                DROP TABLE IF EXISTS widget_filters CASCADE;
                DROP TABLE IF EXISTS widgets CASCADE;
                DROP TABLE IF EXISTS user_filters CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
