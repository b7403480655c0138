//! Launch start and widget update through the shared bus.

use report_portal_lib::auth::ProjectRole;
use report_portal_lib::error::AppError;
use report_portal_lib::models::{
    DomainEvent, LaunchMode, StartLaunchRequest, UpdateWidgetRequest, Widget,
};
use serde_json::json;

use super::test_helpers::*;

fn widget() -> Widget {
    Widget {
        id: 3,
        project_id: PROJECT_ID,
        owner: "owner".to_string(),
        name: "Trend".to_string(),
        description: None,
        widget_type: "launchStatistics".to_string(),
        items_count: 50,
        widget_options: json!({}),
        shared: false,
        filter_ids: vec![],
    }
}

#[tokio::test]
async fn test_started_launch_is_announced_on_the_bus() {
    let app = TestApp::new();
    let mut events = app.bus.subscribe();

    let response = app
        .handlers
        .start_launch
        .start_launch(
            &owner(),
            &member(),
            StartLaunchRequest {
                name: "nightly".to_string(),
                ..StartLaunchRequest::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(response.number, 1);
    match events.recv().await.unwrap().event {
        DomainEvent::LaunchStarted(payload) => {
            assert_eq!(payload.launch_id, response.id);
            assert_eq!(payload.name, "nightly");
            assert!(!payload.rerun);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_customer_debug_launch_is_forbidden() {
    let app = TestApp::new();
    let err = app
        .handlers
        .start_launch
        .start_launch(
            &owner(),
            &project(ProjectRole::Customer),
            StartLaunchRequest {
                name: "nightly".to_string(),
                mode: LaunchMode::Debug,
                ..StartLaunchRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ForbiddenOperation(_)));
}

#[tokio::test]
async fn test_widget_share_toggle_updates_acl_and_publishes() {
    let app = TestApp::new();
    app.store.insert_widget(widget()).await;
    let mut events = app.bus.subscribe();

    let completion = app
        .handlers
        .update_widget
        .update_widget(
            3,
            UpdateWidgetRequest {
                name: "Trend".to_string(),
                shared: Some(true),
                ..UpdateWidgetRequest::default()
            },
            &member(),
            &owner(),
        )
        .await
        .unwrap();

    assert_eq!(completion.message, "Widget with ID = '3' successfully updated.");
    assert!(app.store.is_widget_shared_in(3, PROJECT_ID).await);
    match events.recv().await.unwrap().event {
        DomainEvent::WidgetUpdated(payload) => {
            assert!(!payload.before.shared);
            assert!(payload.after.shared);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_widget_of_other_project_is_not_found() {
    let app = TestApp::new();
    let mut foreign = widget();
    foreign.project_id = 99;
    app.store.insert_widget(foreign).await;

    let err = app
        .handlers
        .update_widget
        .update_widget(
            3,
            UpdateWidgetRequest {
                name: "Trend".to_string(),
                ..UpdateWidgetRequest::default()
            },
            &member(),
            &owner(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
