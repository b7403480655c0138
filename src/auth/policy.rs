//! Authorization rules for destructive and administrative operations.

use crate::error::{AppError, AppResult};
use crate::models::{Launch, TestItem, Widget};

use super::{ProjectDetails, ProjectRole, ReportingUser};

/// Validate that `user` may delete `item` belonging to `launch`.
///
/// Ownership and project checks are skipped for administrators; the retry and
/// in-progress checks apply to everyone.
pub fn authorize_item_deletion(
    user: &ReportingUser,
    item: &TestItem,
    launch: &Launch,
    project: &ProjectDetails,
) -> AppResult<()> {
    if !user.is_admin() {
        if launch.project_id != project.project_id {
            return Err(AppError::ForbiddenOperation(format!(
                "Deleting testItem '{}' is not under specified project '{}'",
                item.id, project.project_id
            )));
        }
        if project.project_role.lower_than(ProjectRole::ProjectManager)
            && user.user_id != launch.user_id
        {
            return Err(AppError::AccessDenied("You are not a launch owner.".to_string()));
        }
    }

    if item.is_retry() {
        return Err(AppError::RetriesHandlerError(format!(
            "Unable to delete test item ['{}'] because it is a retry",
            item.id
        )));
    }

    if item.status.is_in_progress() {
        return Err(AppError::ItemNotFinished(format!(
            "Unable to delete test item ['{}'] in progress state",
            item.id
        )));
    }

    if launch.status.is_in_progress() {
        return Err(AppError::LaunchNotFinished(format!(
            "Unable to delete test item ['{}'] under launch ['{}'] with 'In progress' state",
            item.id, launch.id
        )));
    }

    Ok(())
}

/// Validate that `user` may modify `widget`.
pub fn authorize_widget_administration(
    user: &ReportingUser,
    widget: &Widget,
    project: &ProjectDetails,
) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    // Widgets of other projects are invisible, not forbidden.
    if widget.project_id != project.project_id {
        return Err(AppError::widget_not_found(widget.id));
    }
    if project.project_role == ProjectRole::ProjectManager || widget.owner == user.username {
        return Ok(());
    }
    Err(AppError::AccessDenied(format!(
        "You are not allowed to modify widget '{}'",
        widget.id
    )))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::auth::UserRole;
    use crate::models::{ItemStatus, LaunchMode};

    const PROJECT_ID: i64 = 7;
    const OWNER_ID: i64 = 100;

    fn user(user_id: i64, role: UserRole) -> ReportingUser {
        ReportingUser {
            user_id,
            username: format!("user{}", user_id),
            user_role: role,
        }
    }

    fn project(role: ProjectRole) -> ProjectDetails {
        ProjectDetails {
            project_id: PROJECT_ID,
            project_name: "demo".to_string(),
            project_role: role,
        }
    }

    fn launch() -> Launch {
        Launch {
            id: 5,
            uuid: Uuid::new_v4(),
            project_id: PROJECT_ID,
            user_id: OWNER_ID,
            name: "nightly".to_string(),
            description: None,
            number: 1,
            mode: LaunchMode::Default,
            status: ItemStatus::Passed,
            has_retries: false,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    fn item() -> TestItem {
        TestItem {
            id: 42,
            launch_id: 5,
            parent_id: Some(10),
            path: "10.42".to_string(),
            name: "step".to_string(),
            item_type: "step".to_string(),
            status: ItemStatus::Failed,
            has_children: false,
            retry_of: None,
        }
    }

    #[test]
    fn test_launch_owner_member_may_delete() {
        let result = authorize_item_deletion(
            &user(OWNER_ID, UserRole::User),
            &item(),
            &launch(),
            &project(ProjectRole::Member),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_non_owner_member_is_denied() {
        let result = authorize_item_deletion(
            &user(1, UserRole::User),
            &item(),
            &launch(),
            &project(ProjectRole::Member),
        );
        assert!(matches!(result, Err(AppError::AccessDenied(_))));
    }

    #[test]
    fn test_customer_non_owner_is_denied() {
        let result = authorize_item_deletion(
            &user(1, UserRole::User),
            &item(),
            &launch(),
            &project(ProjectRole::Customer),
        );
        assert!(matches!(result, Err(AppError::AccessDenied(_))));
    }

    #[test]
    fn test_project_manager_may_delete_foreign_launch_items() {
        let result = authorize_item_deletion(
            &user(1, UserRole::User),
            &item(),
            &launch(),
            &project(ProjectRole::ProjectManager),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_other_project_is_forbidden() {
        let mut other = launch();
        other.project_id = PROJECT_ID + 1;

        let result = authorize_item_deletion(
            &user(OWNER_ID, UserRole::User),
            &item(),
            &other,
            &project(ProjectRole::ProjectManager),
        );
        match result {
            Err(AppError::ForbiddenOperation(msg)) => assert!(msg.contains("'42'")),
            other => panic!("expected ForbiddenOperation, got {:?}", other),
        }
    }

    #[test]
    fn test_admin_skips_project_and_owner_checks() {
        let mut other = launch();
        other.project_id = PROJECT_ID + 1;

        let result = authorize_item_deletion(
            &user(1, UserRole::Administrator),
            &item(),
            &other,
            &project(ProjectRole::Customer),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_admin_still_cannot_delete_retry() {
        let mut retry = item();
        retry.retry_of = Some(41);

        let result = authorize_item_deletion(
            &user(1, UserRole::Administrator),
            &retry,
            &launch(),
            &project(ProjectRole::ProjectManager),
        );
        assert!(matches!(result, Err(AppError::RetriesHandlerError(_))));
    }

    #[test]
    fn test_in_progress_item_is_rejected() {
        let mut running = item();
        running.status = ItemStatus::InProgress;

        let result = authorize_item_deletion(
            &user(OWNER_ID, UserRole::User),
            &running,
            &launch(),
            &project(ProjectRole::Member),
        );
        assert!(matches!(result, Err(AppError::ItemNotFinished(_))));
    }

    #[test]
    fn test_in_progress_launch_is_rejected() {
        let mut running = launch();
        running.status = ItemStatus::InProgress;

        let result = authorize_item_deletion(
            &user(OWNER_ID, UserRole::User),
            &item(),
            &running,
            &project(ProjectRole::Member),
        );
        assert!(matches!(result, Err(AppError::LaunchNotFinished(_))));
    }

    #[test]
    fn test_retry_check_runs_before_status_checks() {
        let mut retry = item();
        retry.retry_of = Some(41);
        retry.status = ItemStatus::InProgress;

        let result = authorize_item_deletion(
            &user(OWNER_ID, UserRole::User),
            &retry,
            &launch(),
            &project(ProjectRole::Member),
        );
        assert!(matches!(result, Err(AppError::RetriesHandlerError(_))));
    }

    fn widget(owner: &str) -> Widget {
        Widget {
            id: 3,
            project_id: PROJECT_ID,
            owner: owner.to_string(),
            name: "overview".to_string(),
            description: None,
            widget_type: "launchStatistics".to_string(),
            items_count: 10,
            widget_options: json!({}),
            shared: false,
            filter_ids: vec![],
        }
    }

    #[test]
    fn test_widget_owner_may_administer() {
        let owner = user(1, UserRole::User);
        let result = authorize_widget_administration(
            &owner,
            &widget(&owner.username),
            &project(ProjectRole::Member),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_widget_non_owner_member_is_denied() {
        let result = authorize_widget_administration(
            &user(1, UserRole::User),
            &widget("someone-else"),
            &project(ProjectRole::Member),
        );
        assert!(matches!(result, Err(AppError::AccessDenied(_))));
    }

    #[test]
    fn test_widget_of_other_project_is_not_found() {
        let mut foreign = widget("user1");
        foreign.project_id = PROJECT_ID + 1;

        let result = authorize_widget_administration(
            &user(1, UserRole::User),
            &foreign,
            &project(ProjectRole::ProjectManager),
        );
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
