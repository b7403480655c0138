//! Report Portal worker - Main entry point.
//!
//! Runs the background side of test item deletion: the attachment cleanup
//! listener and the periodic screenshot cleanup job. The request handlers
//! are built on the same event bus so their events reach the listener.

use std::sync::Arc;
use std::time::Duration;

use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use report_portal_lib::config::Config;
use report_portal_lib::db::DbPool;
use report_portal_lib::services::{
    CleanScreenshotsJob, EventBus, Handlers, LogCleaner, Storage, spawn_attachment_cleanup,
    start_screenshot_cleanup_task,
};

#[tokio::main]
async fn main() {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if Config::from_env().is_ok() { 0 } else { 1 });
    }

    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, RP_DB_URL and S3 credentials must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Report Portal worker");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let pool = match DbPool::new(&config).await {
        Ok(pool) => Arc::new(pool),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = pool.run_migrations().await {
        error!("{}", e);
        std::process::exit(1);
    }

    let storage = match Storage::new(&config.storage).await {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            std::process::exit(1);
        }
    };

    let bus = EventBus::with_capacity(config.event_channel_capacity);
    let listener = spawn_attachment_cleanup(&bus, pool.clone(), storage.clone());

    let handlers = match Handlers::with_analyzer(pool.clone(), &config.analyzer, &bus) {
        Ok(handlers) => handlers,
        Err(e) => {
            error!("Failed to initialize analyzer client: {}", e);
            std::process::exit(1);
        }
    };

    let cleaner = LogCleaner::new(pool.clone(), storage);
    let job = Arc::new(CleanScreenshotsJob::new(
        pool,
        cleaner,
        config.jobs.clean_screenshots_page_size,
    ));
    let ticker = start_screenshot_cleanup_task(
        job,
        Duration::from_secs(config.jobs.clean_screenshots_interval_secs),
    );

    info!("Worker started");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    info!("Shutting down");
    ticker.abort();
    // Handlers hold senders too; the listener stops once every sender is gone.
    drop(handlers);
    drop(bus);
    if let Err(e) = listener.await {
        warn!("Attachment cleanup listener ended abnormally: {}", e);
    }
}
