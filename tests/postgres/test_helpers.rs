//! Shared helpers for PostgreSQL tests.

use std::sync::OnceLock;

use chrono::Utc;
use report_portal_lib::config::Config;
use report_portal_lib::db::DbPool;
use report_portal_lib::entity::{launch, log, project, test_item};
use sea_orm::{ActiveModelTrait, NotSet, Set};
use tokio::sync::Mutex;
use uuid::Uuid;

static MIGRATIONS: OnceLock<Mutex<bool>> = OnceLock::new();

/// Create a fresh DB pool. Migrations run only once.
pub async fn create_test_pool() -> DbPool {
    let mut config = Config::from_env().expect(
        "Failed to load config. Ensure RUST_ENV and RP_DB_URL are set \
         and that PostgreSQL is running.",
    );
    config.database.max_connections = 2;
    config.database.min_connections = 1;

    let pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");

    let mut migrated = MIGRATIONS.get_or_init(|| Mutex::new(false)).lock().await;
    if !*migrated {
        pool.run_migrations().await.expect("Failed to run migrations");
        *migrated = true;
    }
    pool
}

pub async fn create_project(pool: &DbPool) -> project::Model {
    project::ActiveModel {
        id: NotSet,
        name: Set(format!("project-{}", Uuid::new_v4())),
        created_at: Set(Utc::now()),
    }
    .insert(pool.connection())
    .await
    .expect("Failed to insert project")
}

pub async fn create_launch(pool: &DbPool, project_id: i64) -> launch::Model {
    launch::ActiveModel {
        id: NotSet,
        uuid: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        user_id: Set(1),
        name: Set("nightly".to_string()),
        description: Set(None),
        number: Set(1),
        mode: Set("default".to_string()),
        status: Set("failed".to_string()),
        has_retries: Set(false),
        start_time: Set(Utc::now()),
        end_time: Set(None),
    }
    .insert(pool.connection())
    .await
    .expect("Failed to insert launch")
}

/// Insert an item under `parent` and fill in its materialized path.
pub async fn create_item(
    pool: &DbPool,
    launch_id: i64,
    parent: Option<&test_item::Model>,
    retry_of: Option<i64>,
) -> test_item::Model {
    let inserted = test_item::ActiveModel {
        id: NotSet,
        launch_id: Set(launch_id),
        parent_id: Set(parent.map(|p| p.id)),
        path: Set(String::new()),
        name: Set("item".to_string()),
        item_type: Set("step".to_string()),
        status: Set("passed".to_string()),
        has_children: Set(false),
        retry_of: Set(retry_of),
    }
    .insert(pool.connection())
    .await
    .expect("Failed to insert test item");

    let path = match parent {
        Some(parent) => format!("{}.{}", parent.path, inserted.id),
        None => inserted.id.to_string(),
    };
    let mut active: test_item::ActiveModel = inserted.into();
    active.path = Set(path);
    active
        .update(pool.connection())
        .await
        .expect("Failed to set item path")
}

pub async fn create_log(pool: &DbPool, project_id: i64, item_id: i64) -> log::Model {
    log::ActiveModel {
        id: NotSet,
        project_id: Set(project_id),
        item_id: Set(Some(item_id)),
        launch_id: Set(None),
        level: Set("error".to_string()),
        message: Set("boom".to_string()),
        log_time: Set(Utc::now()),
    }
    .insert(pool.connection())
    .await
    .expect("Failed to insert log")
}
