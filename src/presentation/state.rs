// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::config::settings::Settings;
use crate::domain::services::analytics_service::AnalyticsService;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::playlist_service::PlaylistService;
use crate::domain::services::post_service::PostService;
use crate::domain::services::publish_scheduler_service::PublishSchedulerService;
use crate::domain::services::retention_service::{RetentionPolicy, RetentionService};
use crate::domain::services::settings_service::SettingsService;
use crate::domain::services::taxonomy_service::TaxonomyService;
use crate::domain::services::transcode_service::TranscodeService;
use crate::domain::services::transcoder::TranscoderClient;
use crate::domain::services::user_service::UserService;
use crate::domain::services::video_service::VideoService;
use crate::domain::services::view_tracking_service::ViewTrackingService;
use crate::infrastructure::repositories::playlist_repo_impl::PlaylistRepositoryImpl;
use crate::infrastructure::repositories::post_repo_impl::PostRepositoryImpl;
use crate::infrastructure::repositories::setting_repo_impl::SettingRepositoryImpl;
use crate::infrastructure::repositories::taxonomy_repo_impl::{
    CategoryRepositoryImpl, TagRepositoryImpl,
};
use crate::infrastructure::repositories::transcode_job_repo_impl::TranscodeJobRepositoryImpl;
use crate::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use crate::infrastructure::repositories::video_repo_impl::VideoRepositoryImpl;
use crate::infrastructure::repositories::view_repo_impl::ViewRepositoryImpl;
use crate::presentation::middleware::rate_limit_middleware::SlidingWindowRateLimiter;

/// 应用服务集合
///
/// 启动时组装一次，路由层把各服务作为 Extension 注入处理器，
/// 后台工作器共用同一组实例
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub taxonomy: Arc<TaxonomyService>,
    pub posts: Arc<PostService>,
    pub videos: Arc<VideoService>,
    pub playlists: Arc<PlaylistService>,
    pub view_tracking: Arc<ViewTrackingService>,
    pub system_settings: Arc<SettingsService>,
    pub retention: Arc<RetentionService>,
    pub scheduler: Arc<PublishSchedulerService>,
    pub transcode: Arc<TranscodeService>,
    pub analytics: Arc<AnalyticsService>,
    pub rate_limiter: SlidingWindowRateLimiter,
}

impl AppState {
    /// 组装仓库与服务
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    /// * `settings` - 应用配置
    /// * `transcoder` - GPU 转码服务客户端
    pub fn new(
        db: Arc<DatabaseConnection>,
        settings: Arc<Settings>,
        transcoder: Arc<dyn TranscoderClient>,
    ) -> Self {
        let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
        let post_repo = Arc::new(PostRepositoryImpl::new(db.clone()));
        let video_repo = Arc::new(VideoRepositoryImpl::new(db.clone()));
        let view_repo = Arc::new(ViewRepositoryImpl::new(db.clone()));
        let playlist_repo = Arc::new(PlaylistRepositoryImpl::new(db.clone()));
        let category_repo = Arc::new(CategoryRepositoryImpl::new(db.clone()));
        let tag_repo = Arc::new(TagRepositoryImpl::new(db.clone()));
        let setting_repo = Arc::new(SettingRepositoryImpl::new(db.clone()));
        let job_repo = Arc::new(TranscodeJobRepositoryImpl::new(db));

        let system_settings = Arc::new(SettingsService::new(setting_repo));
        let taxonomy = Arc::new(TaxonomyService::new(category_repo, tag_repo));
        let view_tracking = Arc::new(ViewTrackingService::new(
            view_repo.clone(),
            system_settings.clone(),
            &settings.view_tracking,
        ));

        Self {
            auth: Arc::new(AuthService::new(user_repo.clone(), &settings.auth)),
            users: Arc::new(UserService::new(user_repo.clone())),
            posts: Arc::new(PostService::new(
                post_repo.clone(),
                video_repo.clone(),
                taxonomy.clone(),
            )),
            videos: Arc::new(VideoService::new(video_repo.clone(), post_repo.clone())),
            playlists: Arc::new(PlaylistService::new(playlist_repo, video_repo.clone())),
            retention: Arc::new(RetentionService::new(
                view_repo.clone(),
                system_settings.clone(),
                RetentionPolicy::from(&settings.retention),
            )),
            scheduler: Arc::new(PublishSchedulerService::new(post_repo.clone())),
            transcode: Arc::new(TranscodeService::new(
                job_repo,
                video_repo.clone(),
                transcoder,
                settings.transcoder.output_dir.clone(),
            )),
            analytics: Arc::new(AnalyticsService::new(
                user_repo,
                post_repo,
                video_repo,
                view_repo,
                view_tracking.clone(),
            )),
            rate_limiter: SlidingWindowRateLimiter::new(
                settings.rate_limiting.max_requests,
                Duration::from_secs(settings.rate_limiting.window_seconds),
            ),
            taxonomy,
            view_tracking,
            system_settings,
            settings,
        }
    }
}
