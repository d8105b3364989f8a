// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;
use vidshare::config::settings::Settings;
use vidshare::domain::models::user::UserRole;
use vidshare::domain::services::user_service::NewUser;
use vidshare::infrastructure::services::gpu_transcoder_client::GpuTranscoderClient;
use vidshare::presentation::routes;
use vidshare::presentation::state::AppState;

pub const CRON_SECRET: &str = "cron-secret";
pub const PASSWORD: &str = "password-123";

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
    pub state: AppState,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// 使用内存 SQLite 构建完整应用，`configure` 可在组装前修改配置
pub async fn spawn_app_with(configure: impl FnOnce(&mut Settings)) -> TestApp {
    let mut settings = Settings::defaults().unwrap();
    settings.cron.secret = Some(CRON_SECRET.to_string());
    settings.rate_limiting.enabled = false;
    // 不可达地址，测试不会调用转码服务
    settings.transcoder.base_url = "http://127.0.0.1:9".to_string();
    configure(&mut settings);

    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let db = Arc::new(db);

    let transcoder = Arc::new(GpuTranscoderClient::new(&settings.transcoder));
    let state = AppState::new(db.clone(), Arc::new(settings), transcoder);
    let server = TestServer::new(routes::routes(&state)).unwrap();

    TestApp { server, db, state }
}

impl TestApp {
    pub async fn create_user(&self, username: &str, role: UserRole) -> Uuid {
        self.state
            .users
            .create(NewUser {
                username: username.to_string(),
                display_name: String::new(),
                password: PASSWORD.to_string(),
                role,
            })
            .await
            .unwrap()
            .id
    }

    pub async fn login(&self, username: &str) -> String {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": PASSWORD }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// 创建用户并登录，返回令牌
    pub async fn signed_in(&self, username: &str, role: UserRole) -> String {
        self.create_user(username, role).await;
        self.login(username).await
    }

    /// 由策展人创建帖子并挂一个 30 分钟的视频，返回 (帖子ID, 视频ID)
    pub async fn create_post_with_video(
        &self,
        curator_token: &str,
        slug: &str,
        visibility: &str,
    ) -> (String, String) {
        let post = self
            .server
            .post("/api/posts")
            .authorization_bearer(curator_token)
            .json(&json!({ "slug": slug, "title": slug, "visibility": visibility }))
            .await;
        post.assert_status(StatusCode::CREATED);
        let post_id = post.json::<Value>()["id"].as_str().unwrap().to_string();

        let video = self
            .server
            .post(&format!("/api/posts/{}/videos", post_id))
            .authorization_bearer(curator_token)
            .json(&json!({
                "title": format!("{} video", slug),
                "file_path": format!("/srv/videos/{}.mp4", slug),
                "duration_seconds": 1800.0
            }))
            .await;
        video.assert_status(StatusCode::CREATED);
        let video_id = video.json::<Value>()["id"].as_str().unwrap().to_string();

        (post_id, video_id)
    }
}

pub fn header(name: &'static str, value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(name),
        HeaderValue::from_str(value).unwrap(),
    )
}
