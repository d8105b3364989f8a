// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::{header, spawn_app, TestApp};
use axum::http::StatusCode;
use sea_orm::EntityTrait;
use serde_json::{json, Value};
use vidshare::domain::models::user::UserRole;
use vidshare::infrastructure::database::entities::daily_view_history;

async fn report(
    app: &TestApp,
    video_id: &str,
    ip: &str,
    body: Value,
    token: Option<&str>,
) -> axum_test::TestResponse {
    let (xff, xff_value) = header("x-forwarded-for", ip);
    let (ua, ua_value) = header("user-agent", "Mozilla/5.0 (Intranet)");
    let mut request = app
        .server
        .post(&format!("/api/videos/{}/view-progress", video_id))
        .add_header(xff, xff_value)
        .add_header(ua, ua_value)
        .json(&body);
    if let Some(token) = token {
        request = request.authorization_bearer(token);
    }
    request.await
}

#[tokio::test]
async fn test_same_session_counts_once() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;
    let (_, video_id) = app.create_post_with_video(&curator, "all-hands", "PUBLIC").await;

    let first = report(&app, &video_id, "10.1.1.1", json!({ "watch_duration": 5, "completion_rate": 1 }), None).await;
    first.assert_status_ok();
    let body: Value = first.json();
    assert_eq!(body["session_created"], true);
    assert_eq!(body["view_counted"], false);
    assert_eq!(body["view_count"], 0);

    let second = report(&app, &video_id, "10.1.1.1", json!({ "watch_duration": 650, "completion_rate": 20 }), None).await;
    let body: Value = second.json();
    assert_eq!(body["session_created"], false);
    assert_eq!(body["view_counted"], true);
    assert_eq!(body["view_count"], 1);

    let third = report(&app, &video_id, "10.1.1.1", json!({ "watch_duration": 1800, "completion_rate": 100 }), None).await;
    let body: Value = third.json();
    assert_eq!(body["view_counted"], false);
    assert_eq!(body["view_count"], 1);

    // 其他客户端是新的会话
    let other = report(&app, &video_id, "10.1.1.2", json!({ "watch_duration": 60, "completion_rate": 50 }), None).await;
    let body: Value = other.json();
    assert_eq!(body["session_created"], true);
    assert_eq!(body["view_counted"], true);
    assert_eq!(body["view_count"], 2);

    let video = app.server.get(&format!("/api/videos/{}", video_id)).await;
    assert_eq!(video.json::<Value>()["view_count"], 2);
}

#[tokio::test]
async fn test_numeric_strings_are_accepted_and_garbage_rejected() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;
    let (_, video_id) = app.create_post_with_video(&curator, "security-101", "PUBLIC").await;

    report(&app, &video_id, "10.2.2.2", json!({ "watch_duration": "700", "completion_rate": "10.5" }), None)
        .await
        .assert_status_ok();

    for body in [
        json!({ "watch_duration": "abc", "completion_rate": 10 }),
        json!({ "watch_duration": -1, "completion_rate": 10 }),
        json!({ "watch_duration": 10, "completion_rate": 101 }),
        json!({ "completion_rate": 10 }),
    ] {
        report(&app, &video_id, "10.2.2.2", body, None)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    let malformed = app
        .server
        .post(&format!("/api/videos/{}/view-progress", video_id))
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    malformed.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        malformed.json::<Value>()["error"],
        "リクエストの形式が正しくありません"
    );
}

#[tokio::test]
async fn test_missing_or_hidden_video_is_not_found() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;
    let (_, hidden_video) = app.create_post_with_video(&curator, "draft-cut", "DRAFT").await;

    report(&app, &uuid::Uuid::new_v4().to_string(), "10.3.3.3", json!({ "watch_duration": 1, "completion_rate": 1 }), None)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    report(&app, &hidden_video, "10.3.3.3", json!({ "watch_duration": 1, "completion_rate": 1 }), None)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signed_in_reports_build_history() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;
    let viewer = app.signed_in("viewer", UserRole::Viewer).await;
    let (_, video_id) = app.create_post_with_video(&curator, "benefits", "PUBLIC").await;

    for (duration, rate) in [(100, 5), (300, 17), (200, 11)] {
        report(
            &app,
            &video_id,
            "10.4.4.4",
            json!({ "watch_duration": duration, "completion_rate": rate }),
            Some(&viewer),
        )
        .await
        .assert_status_ok();
    }

    let history = app
        .server
        .get("/api/me/history")
        .authorization_bearer(&viewer)
        .await;
    history.assert_status_ok();
    let body: Value = history.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["video_id"], video_id);
    assert_eq!(body["items"][0]["total_watch_time"], 300.0);
    assert_eq!(body["items"][0]["completion_rate"], 17.0);

    let daily = daily_view_history::Entity::find()
        .all(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].session_count, 3);

    app.server
        .get("/api/me/history")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
