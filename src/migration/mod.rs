//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20261016_000001_create_projects;
mod m20261016_000002_create_launches;
mod m20261016_000003_create_test_items;
mod m20261016_000004_create_logs;
mod m20261016_000005_create_attachments;
mod m20261016_000006_create_widgets;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_create_projects::Migration),
            Box::new(m20261016_000002_create_launches::Migration),
            Box::new(m20261016_000003_create_test_items::Migration),
            Box::new(m20261016_000004_create_logs::Migration),
            Box::new(m20261016_000005_create_attachments::Migration),
            Box::new(m20261016_000006_create_widgets::Migration),
        ]
    }
}
