//! Attachment purge triggered by deletions.

use std::collections::HashSet;
use std::time::Duration;

use super::test_helpers::*;

#[tokio::test]
async fn test_deleting_item_purges_its_attachments() {
    let app = TestApp::new();
    app.store.insert_launch(launch(5)).await;
    app.store.insert_item(item(42, 5, None, "42")).await;
    app.store.insert_item(item(43, 5, None, "43")).await;
    app.store.insert_attachment(attachment(1, 42)).await;
    app.store.insert_attachment(attachment(2, 43)).await;

    app.handlers
        .delete_items
        .delete_test_item(42, &member(), &owner())
        .await
        .unwrap();

    app.wait_for_attachments(&[2]).await;
    let mut deleted = app.blobs.deleted.lock().unwrap().clone();
    deleted.sort();
    assert_eq!(deleted, vec!["file-1", "thumb-1"]);
}

#[tokio::test]
async fn test_batch_delete_purges_attachments_of_each_requested_item() {
    let app = TestApp::new();
    app.store.insert_launch(launch(5)).await;
    app.store.insert_item(item(1, 5, None, "1")).await;
    app.store.insert_item(item(2, 5, None, "2")).await;
    app.store.insert_attachment(attachment(10, 1)).await;
    app.store.insert_attachment(attachment(20, 2)).await;

    app.handlers
        .delete_items
        .delete_test_items(&[1, 2], &member(), &owner())
        .await
        .unwrap();

    app.wait_for_attachments(&[]).await;
}

#[tokio::test]
async fn test_failed_blob_keeps_row_and_listener_survives() {
    let app = TestApp::with_blobs(MemoryBlobs {
        broken: HashSet::from(["file-1".to_string()]),
        ..MemoryBlobs::default()
    });
    app.store.insert_launch(launch(5)).await;
    app.store.insert_item(item(1, 5, None, "1")).await;
    app.store.insert_item(item(2, 5, None, "2")).await;
    app.store.insert_attachment(attachment(1, 1)).await;
    app.store.insert_attachment(attachment(2, 2)).await;

    app.handlers
        .delete_items
        .delete_test_item(1, &member(), &owner())
        .await
        .unwrap();
    app.handlers
        .delete_items
        .delete_test_item(2, &member(), &owner())
        .await
        .unwrap();

    app.wait_for_attachments(&[1]).await;
}

#[tokio::test]
async fn test_listener_stops_when_bus_is_dropped() {
    let TestApp {
        bus,
        handlers,
        listener,
        ..
    } = TestApp::new();

    drop(handlers);
    drop(bus);

    tokio::time::timeout(Duration::from_secs(5), listener)
        .await
        .expect("listener kept running")
        .unwrap();
}
