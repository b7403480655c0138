//! Launch start and rerun.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::{ProjectDetails, ProjectRole, ReportingUser};
use crate::error::{AppError, AppResult};
use crate::models::{
    DomainEvent, ItemStatus, Launch, LaunchMode, LaunchStartedPayload, NewLaunch,
    StartLaunchRequest, StartLaunchResponse,
};
use crate::repository::LaunchRepository;
use crate::services::event_bus::EventPublisher;

#[derive(Clone)]
pub struct StartLaunchHandler {
    launches: Arc<dyn LaunchRepository>,
    events: Arc<dyn EventPublisher>,
}

impl StartLaunchHandler {
    pub fn new(launches: Arc<dyn LaunchRepository>, events: Arc<dyn EventPublisher>) -> Self {
        Self { launches, events }
    }

    /// Start a new launch, or reopen an existing one when `rerun` is set.
    pub async fn start_launch(
        &self,
        user: &ReportingUser,
        project: &ProjectDetails,
        request: StartLaunchRequest,
    ) -> AppResult<StartLaunchResponse> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::IncorrectRequest(
                "Launch name must not be blank".to_string(),
            ));
        }
        if request.mode == LaunchMode::Debug && project.project_role == ProjectRole::Customer {
            return Err(AppError::ForbiddenOperation(
                "Customer is not allowed to start a launch in debug mode".to_string(),
            ));
        }

        let launch = if request.rerun {
            self.rerun(project.project_id, name, request.rerun_of).await?
        } else {
            let number = self.launches.last_number(project.project_id, name).await? + 1;
            self.launches
                .insert(NewLaunch {
                    uuid: request.uuid.unwrap_or_else(Uuid::now_v7),
                    project_id: project.project_id,
                    user_id: user.user_id,
                    name: name.to_string(),
                    description: request.description,
                    number,
                    mode: request.mode,
                    start_time: request.start_time.unwrap_or_else(Utc::now),
                })
                .await?
        };

        self.events
            .publish(DomainEvent::LaunchStarted(LaunchStartedPayload {
                launch_id: launch.id,
                project_id: launch.project_id,
                user_id: user.user_id,
                name: launch.name.clone(),
                number: launch.number,
                rerun: request.rerun,
            }));

        info!(
            "Launch '{}' #{} (id {}) started in project {}{}",
            launch.name,
            launch.number,
            launch.id,
            project.project_id,
            if request.rerun { " as rerun" } else { "" }
        );

        Ok(StartLaunchResponse::from(&launch))
    }

    async fn rerun(
        &self,
        project_id: i64,
        name: &str,
        rerun_of: Option<Uuid>,
    ) -> AppResult<Launch> {
        let existing = match rerun_of {
            Some(uuid) => self
                .launches
                .find_by_uuid(uuid)
                .await?
                .filter(|launch| launch.project_id == project_id)
                .ok_or_else(|| AppError::NotFound(format!("Launch '{}'", uuid)))?,
            None => self
                .launches
                .find_latest_by_name(project_id, name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Launch '{}'", name)))?,
        };

        self.launches
            .update_status(existing.id, ItemStatus::InProgress)
            .await
    }
}
