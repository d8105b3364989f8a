// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::spawn_app;
use axum::http::StatusCode;
use serde_json::{json, Value};
use vidshare::domain::models::user::UserRole;

#[tokio::test]
async fn test_playlist_lifecycle() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;
    let owner = app.signed_in("owner", UserRole::Viewer).await;
    let stranger = app.signed_in("stranger", UserRole::Viewer).await;
    let (_, first) = app.create_post_with_video(&curator, "intro", "PUBLIC").await;
    let (_, second) = app.create_post_with_video(&curator, "deep-dive", "PUBLIC").await;

    let created = app
        .server
        .post("/api/playlists")
        .authorization_bearer(&owner)
        .json(&json!({ "title": "Must watch" }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let body: Value = created.json();
    assert_eq!(body["visibility"], "PRIVATE");
    let playlist_id = body["id"].as_str().unwrap().to_string();

    let added = app
        .server
        .post(&format!("/api/playlists/{}/videos", playlist_id))
        .authorization_bearer(&owner)
        .json(&json!({ "video_id": first }))
        .await;
    added.assert_status(StatusCode::CREATED);
    assert_eq!(added.json::<Value>()["position"], 0);

    app.server
        .post(&format!("/api/playlists/{}/videos", playlist_id))
        .authorization_bearer(&owner)
        .json(&json!({ "video_id": first }))
        .await
        .assert_status(StatusCode::CONFLICT);

    app.server
        .post(&format!("/api/playlists/{}/videos", playlist_id))
        .authorization_bearer(&owner)
        .json(&json!({ "video_id": second, "position": 0 }))
        .await
        .assert_status(StatusCode::CREATED);

    let detail = app
        .server
        .get(&format!("/api/playlists/{}", playlist_id))
        .authorization_bearer(&owner)
        .await;
    detail.assert_status_ok();
    let entries = detail.json::<Value>()["entries"].clone();
    assert_eq!(entries.as_array().unwrap().len(), 2);
    assert_eq!(entries[0]["video"]["id"], second);

    // 私有列表对其他用户不可见，也不能编辑
    app.server
        .get(&format!("/api/playlists/{}", playlist_id))
        .authorization_bearer(&stranger)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .get(&format!("/api/playlists/{}", playlist_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // 策展人可以编辑他人的列表
    app.server
        .delete(&format!("/api/playlists/{}/videos/{}", playlist_id, first))
        .authorization_bearer(&curator)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .delete(&format!("/api/playlists/{}", playlist_id))
        .authorization_bearer(&owner)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_public_playlists_are_listed_for_everyone() {
    let app = spawn_app().await;
    let owner = app.signed_in("owner", UserRole::Viewer).await;

    for (title, visibility) in [("Shared", "PUBLIC"), ("Mine", "PRIVATE")] {
        app.server
            .post("/api/playlists")
            .authorization_bearer(&owner)
            .json(&json!({ "title": title, "visibility": visibility }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let anonymous = app.server.get("/api/playlists").await;
    anonymous.assert_status_ok();
    let body: Value = anonymous.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["title"], "Shared");

    let own = app
        .server
        .get("/api/playlists")
        .authorization_bearer(&owner)
        .await
        .json::<Value>();
    assert_eq!(own["total"], 2);

    app.server
        .post("/api/playlists")
        .json(&json!({ "title": "Anonymous" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
