//! Single item deletion scenarios.

use report_portal_lib::auth::{ProjectRole, UserRole};
use report_portal_lib::error::AppError;
use report_portal_lib::models::ItemStatus;

use super::test_helpers::*;

#[tokio::test]
async fn test_delete_leaf_clears_parent_flag_and_purges_index() {
    let app = TestApp::new();
    app.store.insert_launch(launch(5)).await;
    app.store.insert_item(parent(10, 5, None, "10")).await;
    app.store.insert_item(item(42, 5, Some(10), "10.42")).await;
    app.store.insert_log(log(1, 42)).await;
    app.store.insert_log(log(2, 10)).await;

    let completion = app
        .handlers
        .delete_items
        .delete_test_item(42, &member(), &owner())
        .await
        .unwrap();

    assert_eq!(
        completion.message,
        "Test Item with ID = 42 has been successfully deleted."
    );
    assert!(app.store.item(42).await.is_none());
    assert!(!app.store.item(10).await.unwrap().has_children);
    assert_eq!(app.indexed_log_ids(), vec![1]);
    assert_eq!(app.store.log_ids().await, vec![2]);
}

#[tokio::test]
async fn test_delete_subtree_removes_descendants_and_their_logs() {
    let app = TestApp::new();
    app.store.insert_launch(launch(5)).await;
    app.store.insert_item(parent(1, 5, None, "1")).await;
    app.store.insert_item(parent(10, 5, Some(1), "1.10")).await;
    app.store.insert_item(item(100, 5, Some(10), "1.10.100")).await;
    app.store.insert_item(item(11, 5, Some(1), "1.11")).await;
    app.store.insert_log(log(7, 100)).await;
    app.store.insert_log(log(8, 10)).await;

    app.handlers
        .delete_items
        .delete_test_item(10, &member(), &owner())
        .await
        .unwrap();

    assert_eq!(app.store.item_ids().await, vec![1, 11]);
    assert!(app.store.item(1).await.unwrap().has_children);
    assert_eq!(app.indexed_log_ids(), vec![7, 8]);
}

#[tokio::test]
async fn test_project_manager_deletes_foreign_launch_items() {
    let app = TestApp::new();
    app.store.insert_launch(launch(5)).await;
    app.store.insert_item(item(42, 5, None, "42")).await;

    let stranger = user(7, UserRole::User);
    let err = app
        .handlers
        .delete_items
        .delete_test_item(42, &member(), &stranger)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied(_)));

    app.handlers
        .delete_items
        .delete_test_item(42, &project(ProjectRole::ProjectManager), &stranger)
        .await
        .unwrap();
    assert!(app.store.item(42).await.is_none());
}

#[tokio::test]
async fn test_admin_bypasses_project_check_but_not_state_checks() {
    let app = TestApp::new();
    let mut foreign = launch(5);
    foreign.project_id = 99;
    app.store.insert_launch(foreign).await;
    let mut running = item(42, 5, None, "42");
    running.status = ItemStatus::InProgress;
    app.store.insert_item(running).await;
    app.store.insert_item(item(43, 5, None, "43")).await;

    let admin = user(1, UserRole::Administrator);
    let err = app
        .handlers
        .delete_items
        .delete_test_item(42, &member(), &admin)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ItemNotFinished(_)));

    app.handlers
        .delete_items
        .delete_test_item(43, &member(), &admin)
        .await
        .unwrap();
    assert_eq!(app.store.item_ids().await, vec![42]);
}

#[tokio::test]
async fn test_item_of_other_project_is_forbidden() {
    let app = TestApp::new();
    let mut foreign = launch(5);
    foreign.project_id = 99;
    app.store.insert_launch(foreign).await;
    app.store.insert_item(item(42, 5, None, "42")).await;

    let err = app
        .handlers
        .delete_items
        .delete_test_item(42, &member(), &owner())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ForbiddenOperation(ref msg) if msg.contains("42")));
    assert_eq!(err.error_code(), "FORBIDDEN_OPERATION");
}

#[tokio::test]
async fn test_retry_goes_with_its_parent_and_flag_is_refreshed() {
    let app = TestApp::new();
    let mut with_retries = launch(5);
    with_retries.has_retries = true;
    app.store.insert_launch(with_retries).await;
    app.store.insert_item(parent(1, 5, None, "1")).await;
    app.store.insert_item(item(2, 5, Some(1), "1.2")).await;
    let mut retry = item(3, 5, Some(1), "1.3");
    retry.retry_of = Some(2);
    app.store.insert_item(retry).await;
    app.store.insert_item(item(9, 5, None, "9")).await;

    app.handlers
        .delete_items
        .delete_test_item(2, &member(), &owner())
        .await
        .unwrap();

    assert_eq!(app.store.item_ids().await, vec![1, 9]);
    assert!(!app.store.launch(5).await.unwrap().has_retries);
    assert!(!app.store.item(1).await.unwrap().has_children);
}
