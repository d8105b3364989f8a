// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::{spawn_app, PASSWORD};
use axum::http::{header, HeaderValue, StatusCode};
use serde_json::{json, Value};
use vidshare::domain::models::user::UserRole;

#[tokio::test]
async fn test_login_returns_token_and_profile() {
    let app = spawn_app().await;
    app.create_user("hanako", UserRole::Viewer).await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "hanako", "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["username"], "hanako");
    assert_eq!(body["user"]["role"], "VIEWER");
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    let me = app.server.get("/api/auth/me").authorization_bearer(token).await;
    me.assert_status_ok();
    assert_eq!(me.json::<Value>()["username"], "hanako");
}

#[tokio::test]
async fn test_wrong_password_and_missing_token_are_unauthorized() {
    let app = spawn_app().await;
    app.create_user("taro", UserRole::Viewer).await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "taro", "password": "wrong-password" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["error"],
        "ユーザー名またはパスワードが正しくありません"
    );

    app.server
        .get("/api/auth/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get("/api/auth/me")
        .authorization_bearer("garbage")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_token_is_accepted() {
    let app = spawn_app().await;
    let token = app.signed_in("cookie-user", UserRole::Viewer).await;

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(
            header::COOKIE,
            HeaderValue::from_str(&format!("auth-token={}", token)).unwrap(),
        )
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_deactivated_user_is_locked_out() {
    let app = spawn_app().await;
    let admin = app.signed_in("admin", UserRole::Admin).await;
    let viewer_id = app.create_user("leaver", UserRole::Viewer).await;
    let viewer = app.login("leaver").await;

    app.server
        .put(&format!("/api/users/{}", viewer_id))
        .authorization_bearer(&admin)
        .json(&json!({ "is_active": false }))
        .await
        .assert_status_ok();

    app.server
        .get("/api/auth/me")
        .authorization_bearer(&viewer)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .post("/api/auth/login")
        .json(&json!({ "username": "leaver", "password": PASSWORD }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_management_requires_admin() {
    let app = spawn_app().await;
    let curator = app.signed_in("curator", UserRole::Curator).await;
    let admin = app.signed_in("admin", UserRole::Admin).await;

    app.server
        .get("/api/users")
        .authorization_bearer(&curator)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let list = app.server.get("/api/users").authorization_bearer(&admin).await;
    list.assert_status_ok();
    let body: Value = list.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 20);
}

#[tokio::test]
async fn test_duplicate_username_and_self_delete() {
    let app = spawn_app().await;
    let admin_id = app.create_user("admin", UserRole::Admin).await;
    let admin = app.login("admin").await;

    let payload = json!({ "username": "newbie", "password": "password-456", "role": "CURATOR" });
    let created = app
        .server
        .post("/api/users")
        .authorization_bearer(&admin)
        .json(&payload)
        .await;
    created.assert_status(StatusCode::CREATED);
    assert_eq!(created.json::<Value>()["role"], "CURATOR");

    let duplicate = app
        .server
        .post("/api/users")
        .authorization_bearer(&admin)
        .json(&payload)
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        duplicate.json::<Value>()["error"],
        "このユーザー名は既に使用されています"
    );

    app.server
        .delete(&format!("/api/users/{}", admin_id))
        .authorization_bearer(&admin)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_short_password_is_rejected() {
    let app = spawn_app().await;
    let admin = app.signed_in("admin", UserRole::Admin).await;

    let response = app
        .server
        .post("/api/users")
        .authorization_bearer(&admin)
        .json(&json!({ "username": "shorty", "password": "123" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "パスワードは 8〜128 文字で入力してください"
    );
}
