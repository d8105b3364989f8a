// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::{header, spawn_app, spawn_app_with, CRON_SECRET};
use axum::http::StatusCode;
use serde_json::{json, Value};
use vidshare::domain::models::user::UserRole;

#[tokio::test]
async fn test_settings_are_validated_and_admin_only() {
    let app = spawn_app().await;
    let admin = app.signed_in("admin", UserRole::Admin).await;
    let viewer = app.signed_in("viewer", UserRole::Viewer).await;

    let saved = app
        .server
        .put("/api/admin/settings")
        .authorization_bearer(&admin)
        .json(&json!({ "key": "view_count_threshold_percent", "value": "45" }))
        .await;
    saved.assert_status_ok();
    assert_eq!(saved.json::<Value>()["value"], "45");

    app.server
        .put("/api/admin/settings")
        .authorization_bearer(&admin)
        .json(&json!({ "key": "view_count_threshold_percent", "value": "150" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .put("/api/admin/settings")
        .authorization_bearer(&admin)
        .json(&json!({ "key": "view_duplicate_window_hours", "value": "10000000000" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let listed = app
        .server
        .get("/api/admin/settings")
        .authorization_bearer(&admin)
        .await
        .json::<Value>();
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["key"] == "view_count_threshold_percent"));

    app.server
        .get("/api/admin/settings")
        .authorization_bearer(&viewer)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.server
        .get("/api/admin/settings")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_analytics_overview_counts_views() {
    let app = spawn_app().await;
    let admin = app.signed_in("admin", UserRole::Admin).await;
    let (_, video_id) = app.create_post_with_video(&admin, "town-hall", "PUBLIC").await;

    let (xff, xff_value) = header("x-forwarded-for", "10.9.9.9");
    app.server
        .post(&format!("/api/videos/{}/view-progress", video_id))
        .add_header(xff, xff_value)
        .json(&json!({ "watch_duration": 900, "completion_rate": 50 }))
        .await
        .assert_status_ok();

    let overview = app
        .server
        .get("/api/admin/analytics/overview")
        .authorization_bearer(&admin)
        .add_query_param("days", 7)
        .await;
    overview.assert_status_ok();
    let body: Value = overview.json();
    assert_eq!(body["total_users"], 1);
    assert_eq!(body["total_videos"], 1);
    assert_eq!(body["total_views"], 1);
    assert_eq!(body["top_videos"][0]["video_id"], video_id);

    app.server
        .get(&format!("/api/admin/analytics/videos/{}", video_id))
        .authorization_bearer(&admin)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_manual_cleanup_validates_parameters() {
    let app = spawn_app().await;
    let admin = app.signed_in("admin", UserRole::Admin).await;

    app.server
        .post("/api/admin/view-history/cleanup")
        .authorization_bearer(&admin)
        .add_query_param("retention_days", 0)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post("/api/admin/view-history/cleanup")
        .authorization_bearer(&admin)
        .add_query_param("retention_days", 200_000_000)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post("/api/cron/cleanup-view-history")
        .authorization_bearer(CRON_SECRET)
        .add_query_param("retention_days", 200_000_000)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post("/api/admin/view-history/cleanup")
        .authorization_bearer(&admin)
        .add_query_param("target", "sessions")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let report = app
        .server
        .post("/api/admin/view-history/cleanup")
        .authorization_bearer(&admin)
        .add_query_param("target", "view_logs")
        .add_query_param("retention_days", 30)
        .await;
    report.assert_status_ok();
    let body: Value = report.json();
    assert_eq!(body["target"], "VIEW_LOGS");
    assert_eq!(body["deleted"], 0);
    assert_eq!(body["completed"], true);
}

#[tokio::test]
async fn test_cron_cleanup_requires_secret() {
    let app = spawn_app().await;

    app.server
        .post("/api/cron/cleanup-view-history")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let report = app
        .server
        .post("/api/cron/cleanup-view-history")
        .authorization_bearer(CRON_SECRET)
        .await;
    report.assert_status_ok();
    assert_eq!(report.json::<Value>()["target"], "VIEW_HISTORY");
}

#[tokio::test]
async fn test_admin_allowlist_blocks_other_addresses() {
    let app = spawn_app_with(|settings| {
        settings.security.admin_allowed_ips = vec!["192.168.10.0/24".to_string()];
    })
    .await;
    let admin = app.signed_in("admin", UserRole::Admin).await;

    let (xff, xff_value) = header("x-forwarded-for", "203.0.113.50");
    let denied = app
        .server
        .get("/api/admin/settings")
        .authorization_bearer(&admin)
        .add_header(xff, xff_value)
        .await;
    denied.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        denied.json::<Value>()["error"],
        "この IP アドレスからは管理機能にアクセスできません"
    );

    let (xff, xff_value) = header("x-forwarded-for", "192.168.10.20");
    app.server
        .get("/api/admin/settings")
        .authorization_bearer(&admin)
        .add_header(xff, xff_value)
        .await
        .assert_status_ok();

    // 非管理路由不受白名单影响
    app.server.get("/api/version").await.assert_status_ok();
}
