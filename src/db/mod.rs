//! Database module providing connection management, migrations, and the
//! PostgreSQL implementations of the repository ports.

pub mod attachments;
pub mod launches;
pub mod logs;
pub mod projects;
pub mod test_items;
pub mod widgets;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Connection pool wrapper shared by every repository.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Connect using the pool limits from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.database.url.clone());
        options
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        info!(
            "Database pool ready (max {} connections)",
            config.database.max_connections
        );
        Ok(Self { conn })
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;
        info!("Database migrations applied");
        Ok(())
    }
}
