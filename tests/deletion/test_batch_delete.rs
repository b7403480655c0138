//! Batch deletion scenarios.

use report_portal_lib::error::AppError;
use report_portal_lib::models::{ItemStatus, OperationCompletion};

use super::test_helpers::*;

fn messages(completions: Vec<OperationCompletion>) -> Vec<String> {
    completions.into_iter().map(|c| c.message).collect()
}

#[tokio::test]
async fn test_batch_of_siblings_keeps_parent_flag_until_last_child() {
    let app = TestApp::new();
    app.store.insert_launch(launch(5)).await;
    app.store.insert_item(parent(10, 5, None, "10")).await;
    for id in [1, 2, 3] {
        app.store
            .insert_item(item(id, 5, Some(10), &format!("10.{}", id)))
            .await;
    }

    let completions = app
        .handlers
        .delete_items
        .delete_test_items(&[1, 2], &member(), &owner())
        .await
        .unwrap();

    assert_eq!(
        messages(completions),
        vec![
            OperationCompletion::test_item_deleted(1).message,
            OperationCompletion::test_item_deleted(2).message,
        ]
    );
    assert!(app.store.item(10).await.unwrap().has_children);

    app.handlers
        .delete_items
        .delete_test_items(&[3], &member(), &owner())
        .await
        .unwrap();
    assert!(!app.store.item(10).await.unwrap().has_children);
}

#[tokio::test]
async fn test_nested_requests_are_deduplicated() {
    let app = TestApp::new();
    app.store.insert_launch(launch(5)).await;
    app.store.insert_item(parent(1, 5, None, "1")).await;
    app.store.insert_item(parent(2, 5, Some(1), "1.2")).await;
    app.store.insert_item(item(3, 5, Some(2), "1.2.3")).await;

    let completions = app
        .handlers
        .delete_items
        .delete_test_items(&[3, 2, 1, 2], &member(), &owner())
        .await
        .unwrap();

    assert_eq!(completions.len(), 3);
    assert!(app.store.item_ids().await.is_empty());
}

#[tokio::test]
async fn test_unknown_ids_are_ignored() {
    let app = TestApp::new();
    app.store.insert_launch(launch(5)).await;
    app.store.insert_item(item(1, 5, None, "1")).await;

    let completions = app
        .handlers
        .delete_items
        .delete_test_items(&[1, 404], &member(), &owner())
        .await
        .unwrap();

    assert_eq!(
        messages(completions),
        vec![OperationCompletion::test_item_deleted(1).message]
    );
}

#[tokio::test]
async fn test_one_unfinished_item_blocks_the_whole_batch() {
    let app = TestApp::new();
    app.store.insert_launch(launch(5)).await;
    app.store.insert_item(item(1, 5, None, "1")).await;
    let mut running = item(2, 5, None, "2");
    running.status = ItemStatus::InProgress;
    app.store.insert_item(running).await;
    app.store.insert_log(log(1, 1)).await;

    let err = app
        .handlers
        .delete_items
        .delete_test_items(&[1, 2], &member(), &owner())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ItemNotFinished(_)));
    assert_eq!(app.store.item_ids().await, vec![1, 2]);
    assert!(app.indexed_log_ids().is_empty());
}

#[tokio::test]
async fn test_batch_across_launches_refreshes_retry_flags() {
    let app = TestApp::new();
    for id in [5, 6] {
        let mut l = launch(id);
        l.has_retries = true;
        app.store.insert_launch(l).await;
    }
    app.store.insert_item(item(1, 5, None, "1")).await;
    let mut retry_a = item(2, 5, None, "2");
    retry_a.retry_of = Some(1);
    app.store.insert_item(retry_a).await;
    app.store.insert_item(item(3, 6, None, "3")).await;
    app.store.insert_item(item(4, 6, None, "4")).await;
    let mut retry_b = item(5, 6, None, "5");
    retry_b.retry_of = Some(4);
    app.store.insert_item(retry_b).await;

    app.handlers
        .delete_items
        .delete_test_items(&[1, 3], &member(), &owner())
        .await
        .unwrap();

    assert!(!app.store.launch(5).await.unwrap().has_retries);
    assert!(app.store.launch(6).await.unwrap().has_retries);
}
