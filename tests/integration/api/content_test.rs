// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::{spawn_app, CRON_SECRET};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use vidshare::domain::models::user::UserRole;

#[tokio::test]
async fn test_taxonomy_writes_require_curator_and_validate_slugs() {
    let app = spawn_app().await;
    let viewer = app.signed_in("viewer", UserRole::Viewer).await;
    let curator = app.signed_in("curator", UserRole::Curator).await;

    app.server
        .post("/api/categories")
        .authorization_bearer(&viewer)
        .json(&json!({ "name": "Onboarding", "slug": "onboarding" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .post("/api/categories")
        .authorization_bearer(&curator)
        .json(&json!({ "name": "Bad", "slug": "Not A Slug" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post("/api/categories")
        .authorization_bearer(&curator)
        .json(&json!({ "name": "Onboarding", "slug": "onboarding" }))
        .await
        .assert_status(StatusCode::CREATED);
    app.server
        .post("/api/categories")
        .authorization_bearer(&curator)
        .json(&json!({ "name": "Again", "slug": "onboarding" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    let categories = app.server.get("/api/categories").await;
    categories.assert_status_ok();
    assert_eq!(categories.json::<Value>().as_array().unwrap().len(), 1);

    let tag = app
        .server
        .post("/api/tags")
        .authorization_bearer(&curator)
        .json(&json!({ "name": "security" }))
        .await;
    tag.assert_status(StatusCode::CREATED);
    let tag_id = tag.json::<Value>()["id"].as_str().unwrap().to_string();

    app.server
        .delete(&format!("/api/tags/{}", tag_id))
        .authorization_bearer(&curator)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(app
        .server
        .get("/api/tags")
        .await
        .json::<Value>()
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_drafts_are_hidden_from_viewers() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;
    let viewer = app.signed_in("viewer", UserRole::Viewer).await;

    app.create_post_with_video(&curator, "public-talk", "PUBLIC").await;
    app.create_post_with_video(&curator, "secret-draft", "DRAFT").await;

    let anonymous = app.server.get("/api/posts").await;
    anonymous.assert_status_ok();
    let body: Value = anonymous.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["slug"], "public-talk");

    // 普通观众的 visibility 过滤被忽略
    let filtered = app
        .server
        .get("/api/posts")
        .add_query_param("visibility", "draft")
        .authorization_bearer(&viewer)
        .await;
    assert_eq!(filtered.json::<Value>()["items"][0]["slug"], "public-talk");

    let curated = app
        .server
        .get("/api/posts")
        .add_query_param("visibility", "draft")
        .authorization_bearer(&curator)
        .await;
    let body: Value = curated.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["slug"], "secret-draft");

    app.server
        .get("/api/posts/secret-draft")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .get("/api/posts/secret-draft")
        .authorization_bearer(&viewer)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let detail = app
        .server
        .get("/api/posts/secret-draft")
        .authorization_bearer(&curator)
        .await;
    detail.assert_status_ok();
    assert_eq!(detail.json::<Value>()["videos"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_hidden_post_videos_are_not_found() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;
    let (_, video_id) = app.create_post_with_video(&curator, "private-talk", "PRIVATE").await;

    app.server
        .get(&format!("/api/videos/{}", video_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .get(&format!("/api/videos/{}", video_id))
        .authorization_bearer(&curator)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_schedule_must_be_ordered() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;
    let publish = Utc::now() + Duration::days(2);
    let unpublish = Utc::now() + Duration::days(1);

    let response = app
        .server
        .post("/api/posts")
        .authorization_bearer(&curator)
        .json(&json!({
            "slug": "launch",
            "title": "Launch",
            "scheduled_publish_at": publish,
            "scheduled_unpublish_at": unpublish
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "公開終了日時は公開開始日時より後に設定してください"
    );
}

#[tokio::test]
async fn test_cron_publish_requires_secret_and_publishes_due_posts() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;

    let created = app
        .server
        .post("/api/posts")
        .authorization_bearer(&curator)
        .json(&json!({
            "slug": "scheduled",
            "title": "Scheduled",
            "scheduled_publish_at": Utc::now() - Duration::minutes(1)
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let post_id = created.json::<Value>()["id"].as_str().unwrap().to_string();

    app.server
        .post("/api/cron/publish-scheduled")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .post("/api/cron/publish-scheduled")
        .authorization_bearer("wrong")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let report = app
        .server
        .post("/api/cron/publish-scheduled")
        .authorization_bearer(CRON_SECRET)
        .await;
    report.assert_status_ok();
    let body: Value = report.json();
    assert_eq!(body["published"], json!([post_id]));
    assert_eq!(body["unpublished"], json!([]));

    let public = app.server.get("/api/posts/scheduled").await;
    public.assert_status_ok();
    let body: Value = public.json();
    assert_eq!(body["visibility"], "PUBLIC");
    assert!(body["scheduled_publish_at"].is_null());
    assert!(!body["published_at"].is_null());
}

#[tokio::test]
async fn test_post_update_replaces_tags() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;

    let tag = app
        .server
        .post("/api/tags")
        .authorization_bearer(&curator)
        .json(&json!({ "name": "compliance" }))
        .await
        .json::<Value>();
    let created = app
        .server
        .post("/api/posts")
        .authorization_bearer(&curator)
        .json(&json!({ "slug": "policy", "title": "Policy", "tag_ids": [tag["id"]] }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let body: Value = created.json();
    assert_eq!(body["tag_ids"], json!([tag["id"]]));

    let updated = app
        .server
        .put(&format!("/api/posts/{}", body["id"].as_str().unwrap()))
        .authorization_bearer(&curator)
        .json(&json!({ "slug": "policy", "title": "Policy v2", "visibility": "PUBLIC" }))
        .await;
    updated.assert_status_ok();
    let body: Value = updated.json();
    assert_eq!(body["title"], "Policy v2");
    assert_eq!(body["tag_ids"], json!([]));

    app.server
        .post("/api/posts")
        .authorization_bearer(&curator)
        .json(&json!({ "slug": "orphan", "title": "Orphan", "tag_ids": [uuid::Uuid::new_v4()] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
