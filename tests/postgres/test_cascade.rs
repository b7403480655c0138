//! Cascade rules of the PostgreSQL schema.

use report_portal_lib::repository::{LaunchRepository, LogRepository, TestItemRepository};

use super::test_helpers::*;

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_descendants_respect_path_segments() {
    let pool = create_test_pool().await;
    let project = create_project(&pool).await;
    let launch = create_launch(&pool, project.id).await;

    let root = create_item(&pool, launch.id, None, None).await;
    let child = create_item(&pool, launch.id, Some(&root), None).await;
    let grandchild = create_item(&pool, launch.id, Some(&child), None).await;

    let mut ids = pool.descendant_ids(&child.path).await.unwrap();
    ids.sort();
    assert_eq!(ids, vec![child.id, grandchild.id]);

    assert!(pool.has_children(root.id, &root.path).await.unwrap());
    assert!(!pool.has_children(grandchild.id, &grandchild.path).await.unwrap());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_delete_removes_subtree_retries_and_logs() {
    let pool = create_test_pool().await;
    let project = create_project(&pool).await;
    let launch = create_launch(&pool, project.id).await;

    let root = create_item(&pool, launch.id, None, None).await;
    let child = create_item(&pool, launch.id, Some(&root), None).await;
    let other = create_item(&pool, launch.id, None, None).await;
    let retry = create_item(&pool, launch.id, None, Some(child.id)).await;
    let child_log = create_log(&pool, project.id, child.id).await;
    let other_log = create_log(&pool, project.id, other.id).await;

    assert!(pool.has_retries(launch.id).await.unwrap());

    TestItemRepository::delete_by_id(&pool, root.id).await.unwrap();

    for id in [root.id, child.id, retry.id] {
        assert!(TestItemRepository::find_by_id(&pool, id).await.unwrap().is_none());
    }
    assert!(TestItemRepository::find_by_id(&pool, other.id).await.unwrap().is_some());
    assert!(!pool.has_retries(launch.id).await.unwrap());

    assert_eq!(
        pool.find_ids_by_item_id(other.id).await.unwrap(),
        vec![other_log.id]
    );
    let logs = pool
        .find_ids_by_item_ids(&[child.id, other.id])
        .await
        .unwrap();
    assert_eq!(logs, vec![other_log.id]);
    assert_ne!(child_log.id, other_log.id);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_retries_of_returns_retrying_items() {
    let pool = create_test_pool().await;
    let project = create_project(&pool).await;
    let launch = create_launch(&pool, project.id).await;

    let original = create_item(&pool, launch.id, None, None).await;
    let retry = create_item(&pool, launch.id, None, Some(original.id)).await;
    create_item(&pool, launch.id, None, None).await;

    let retries = pool.find_retries_of(&[original.id]).await.unwrap();
    let ids: Vec<i64> = retries.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![retry.id]);
    assert!(pool.find_retries_of(&[]).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_flags_are_written() {
    let pool = create_test_pool().await;
    let project = create_project(&pool).await;
    let launch = create_launch(&pool, project.id).await;
    let item = create_item(&pool, launch.id, None, None).await;

    pool.set_has_children(item.id, true).await.unwrap();
    pool.set_has_retries(launch.id, true).await.unwrap();

    let stored = TestItemRepository::find_by_id(&pool, item.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.has_children);
    let stored = LaunchRepository::find_by_id(&pool, launch.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.has_retries);
}
