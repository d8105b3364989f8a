// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::{
    admin_handler, auth_handler, cron_handler, playlist_handler, post_handler, taxonomy_handler,
    user_handler, video_handler,
};
use crate::presentation::middleware::admin_ip_middleware::{admin_ip_middleware, AdminAllowlist};
use crate::presentation::middleware::auth_middleware::{auth_middleware, AuthState};
use crate::presentation::middleware::cron_auth_middleware::{cron_auth_middleware, CronSecret};
use crate::presentation::middleware::rate_limit_middleware::rate_limit_middleware;
use crate::presentation::state::AppState;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
///
/// * `state` - 已组装的应用服务
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(state: &AppState) -> Router {
    let public_routes = Router::new().route("/health", get(health_check));

    let admin_routes = Router::new()
        .route(
            "/analytics/overview",
            get(admin_handler::analytics_overview),
        )
        .route(
            "/analytics/videos/{id}",
            get(admin_handler::video_analytics),
        )
        .route(
            "/settings",
            get(admin_handler::list_settings).put(admin_handler::update_setting),
        )
        .route(
            "/view-history/cleanup",
            post(admin_handler::cleanup_view_history),
        )
        .layer(middleware::from_fn_with_state(
            AdminAllowlist::new(state.settings.security.admin_allowed_ips.clone()),
            admin_ip_middleware,
        ));

    let cron_routes = Router::new()
        .route("/publish-scheduled", post(cron_handler::publish_scheduled))
        .route(
            "/cleanup-view-history",
            post(cron_handler::cleanup_view_history),
        )
        .layer(middleware::from_fn_with_state(
            CronSecret::new(state.settings.cron.secret.clone()),
            cron_auth_middleware,
        ));

    let auth_state = AuthState {
        auth: state.auth.clone(),
        cookie_name: state.settings.auth.cookie_name.clone(),
    };

    let mut api_routes = Router::new()
        .route("/version", get(version))
        .route("/auth/login", post(auth_handler::login))
        .route("/auth/me", get(auth_handler::me))
        .route("/me/history", get(auth_handler::my_history))
        .route(
            "/users",
            get(user_handler::list_users).post(user_handler::create_user),
        )
        .route(
            "/users/{id}",
            get(user_handler::get_user)
                .put(user_handler::update_user)
                .delete(user_handler::delete_user),
        )
        .route(
            "/categories",
            get(taxonomy_handler::list_categories).post(taxonomy_handler::create_category),
        )
        .route(
            "/categories/{id}",
            put(taxonomy_handler::update_category)
                .delete(taxonomy_handler::delete_category),
        )
        .route(
            "/tags",
            get(taxonomy_handler::list_tags).post(taxonomy_handler::create_tag),
        )
        .route("/tags/{id}", delete(taxonomy_handler::delete_tag))
        .route(
            "/posts",
            get(post_handler::list_posts).post(post_handler::create_post),
        )
        // GET 按 slug 查找，PUT/DELETE 按ID
        .route(
            "/posts/{id}",
            get(post_handler::get_post)
                .put(post_handler::update_post)
                .delete(post_handler::delete_post),
        )
        .route("/posts/{id}/videos", post(post_handler::attach_video))
        .route(
            "/videos/{id}",
            get(video_handler::get_video)
                .put(video_handler::update_video)
                .delete(video_handler::delete_video),
        )
        .route(
            "/videos/{id}/view-progress",
            post(video_handler::record_view_progress),
        )
        .route(
            "/videos/{id}/transcode",
            post(video_handler::submit_transcode),
        )
        .route(
            "/videos/{id}/thumbnail",
            post(video_handler::submit_thumbnail),
        )
        .route(
            "/transcode-jobs/{id}",
            get(video_handler::get_transcode_job),
        )
        .route(
            "/playlists",
            get(playlist_handler::list_playlists).post(playlist_handler::create_playlist),
        )
        .route(
            "/playlists/{id}",
            get(playlist_handler::get_playlist)
                .put(playlist_handler::update_playlist)
                .delete(playlist_handler::delete_playlist),
        )
        .route(
            "/playlists/{id}/videos",
            post(playlist_handler::add_playlist_video),
        )
        .route(
            "/playlists/{id}/videos/{video_id}",
            delete(playlist_handler::remove_playlist_video),
        )
        .nest("/admin", admin_routes)
        .nest("/cron", cron_routes)
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    if state.settings.rate_limiting.enabled {
        api_routes = api_routes.layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ));
    }

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(Extension(state.auth.clone()))
        .layer(Extension(state.users.clone()))
        .layer(Extension(state.taxonomy.clone()))
        .layer(Extension(state.posts.clone()))
        .layer(Extension(state.videos.clone()))
        .layer(Extension(state.playlists.clone()))
        .layer(Extension(state.view_tracking.clone()))
        .layer(Extension(state.system_settings.clone()))
        .layer(Extension(state.retention.clone()))
        .layer(Extension(state.scheduler.clone()))
        .layer(Extension(state.transcode.clone()))
        .layer(Extension(state.analytics.clone()))
        .layer(Extension(state.settings.clone()))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
