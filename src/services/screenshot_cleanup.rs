//! Periodic removal of screenshots past the project retention period.
//!
//! Each project stores its retention under the `job.keepScreenshots`
//! attribute. Projects set to `forever` are left untouched.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::error::AppResult;
use crate::models::{KEEP_SCREENSHOTS_ATTRIBUTE, KeepScreenshotsDelay, PageRequest, Project};
use crate::repository::ProjectRepository;
use crate::services::log_cleaner::{LogCleaner, RemovedAttachments};

/// Totals of one job run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub projects: u64,
    pub failed_projects: u64,
    pub attachments: u64,
    pub thumbnails: u64,
}

#[derive(Clone)]
pub struct CleanScreenshotsJob {
    projects: Arc<dyn ProjectRepository>,
    cleaner: LogCleaner,
    page_size: u64,
}

impl CleanScreenshotsJob {
    pub fn new(projects: Arc<dyn ProjectRepository>, cleaner: LogCleaner, page_size: u64) -> Self {
        Self {
            projects,
            cleaner,
            page_size,
        }
    }

    /// Run one cleanup pass over every project with a retention setting.
    pub async fn execute(&self) -> AppResult<CleanupSummary> {
        info!("Cleaning outdated screenshots has been started");

        let mut summary = CleanupSummary::default();
        let mut page = PageRequest::first(self.page_size);

        loop {
            let projects = self
                .projects
                .find_with_attribute(KEEP_SCREENSHOTS_ATTRIBUTE, page)
                .await?;

            for project in &projects {
                match self.clean_project(project).await {
                    Ok(Some(removed)) => {
                        summary.projects += 1;
                        summary.attachments += removed.attachments;
                        summary.thumbnails += removed.thumbnails;
                        info!(
                            "Cleaning outdated screenshots has been finished for project {} ({}). Deleted {} attachments, {} thumbnails",
                            project.id, project.name, removed.attachments, removed.thumbnails
                        );
                    }
                    Ok(None) => {}
                    Err(e) => {
                        summary.failed_projects += 1;
                        error!(
                            "Cleaning outdated screenshots has been failed for project {} ({}): {}",
                            project.id, project.name, e
                        );
                    }
                }
            }

            if (projects.len() as u64) < page.size {
                break;
            }
            page = page.next();
        }

        info!(
            "Cleaning outdated screenshots has been finished: {} projects, {} attachments, {} thumbnails, {} failures",
            summary.projects, summary.attachments, summary.thumbnails, summary.failed_projects
        );
        Ok(summary)
    }

    /// Returns `None` when the project keeps screenshots forever.
    async fn clean_project(&self, project: &Project) -> AppResult<Option<RemovedAttachments>> {
        let Some(value) = project.attribute(KEEP_SCREENSHOTS_ATTRIBUTE) else {
            return Ok(None);
        };
        let period = KeepScreenshotsDelay::find_by_name(value)?.period();
        if period.is_zero() {
            return Ok(None);
        }

        self.cleaner
            .remove_project_attachments(project.id, period)
            .await
            .map(Some)
    }
}

/// Start the screenshot cleanup background task.
///
/// The first run happens immediately, then once per `every`.
pub fn start_screenshot_cleanup_task(
    job: Arc<CleanScreenshotsJob>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting screenshot cleanup service (interval: {} seconds)",
            every.as_secs()
        );

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(e) = job.execute().await {
                error!("Screenshot cleanup task error: {}", e);
            }
        }
    })
}
