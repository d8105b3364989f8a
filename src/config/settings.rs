// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、认证、速率限制、观看统计、保留清理、定时发布和转码等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 认证配置
    pub auth: AuthSettings,
    /// 速率限制配置
    pub rate_limiting: RateLimitingSettings,
    /// 观看统计配置
    pub view_tracking: ViewTrackingSettings,
    /// 观看历史保留配置
    pub retention: RetentionSettings,
    /// 定时发布配置
    pub scheduler: SchedulerSettings,
    /// GPU 转码服务配置
    pub transcoder: TranscoderSettings,
    /// 定时任务端点配置，整段缺省时密钥为空
    #[serde(default)]
    pub cron: CronSettings,
    /// 访问控制配置
    pub security: SecuritySettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
    /// 启动时执行迁移
    pub run_migrations: bool,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 认证配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// JWT 签名密钥
    pub jwt_secret: String,
    /// 令牌有效期（小时）
    pub token_ttl_hours: i64,
    /// 认证 Cookie 名称
    pub cookie_name: String,
    /// 用户表为空时创建的初始管理员
    pub bootstrap_admin_username: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

/// 速率限制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitingSettings {
    /// 是否启用速率限制
    pub enabled: bool,
    /// 窗口内允许的最大请求数
    pub max_requests: u32,
    /// 滑动窗口长度（秒）
    pub window_seconds: u64,
}

/// 观看统计配置设置
///
/// 这些值是系统设置表缺失或无法解析时的后备值
#[derive(Debug, Clone, Deserialize)]
pub struct ViewTrackingSettings {
    /// 计入播放数所需的完成率（百分比）
    pub threshold_percent: f64,
    /// 计入播放数所需的观看秒数
    pub threshold_seconds: f64,
    /// 去重时间窗口（小时）
    pub duplicate_window_hours: i64,
    /// 每日历史的日期计算时区偏移（小时）
    pub report_utc_offset_hours: i32,
}

/// 观看历史保留配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionSettings {
    /// 默认保留天数
    pub retention_days: i64,
    /// 每批删除行数
    pub batch_size: u64,
    /// 批次间休眠（毫秒）
    pub sleep_ms: u64,
    /// 单次执行的最大批次数
    pub max_batches: u32,
    /// 单次执行的最长时间（秒）
    pub max_execution_seconds: u64,
    /// 后台清理工作器间隔（秒），0 表示不启动
    pub worker_interval_seconds: u64,
}

/// 定时发布配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// 是否启动定时发布工作器
    pub enabled: bool,
    /// 轮询间隔（秒）
    pub interval_seconds: u64,
}

/// GPU 转码服务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct TranscoderSettings {
    /// 转码服务基础URL
    pub base_url: String,
    /// 转码服务 API 密钥
    pub api_key: Option<String>,
    /// 请求超时（秒）
    pub timeout_seconds: u64,
    /// 任务状态轮询间隔（秒），0 表示不启动
    pub poll_interval_seconds: u64,
    /// 转码输出目录
    pub output_dir: String,
}

/// 定时任务端点配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CronSettings {
    /// 定时任务调用密钥，未设置时定时任务端点全部拒绝
    pub secret: Option<String>,
}

/// 访问控制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SecuritySettings {
    /// 管理端允许的IP或CIDR，空列表表示不限制
    pub admin_allowed_ips: Vec<String>,
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从默认值、配置文件和环境变量加载配置
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("VIDSHARE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.admin_allowed_ips")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置，测试中使用
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.url", "sqlite://vidshare.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("database.run_migrations", true)?
            // Auth
            .set_default("auth.jwt_secret", "change-me-in-production")?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("auth.cookie_name", "auth-token")?
            // Default Rate Limiting settings
            .set_default("rate_limiting.enabled", true)?
            .set_default("rate_limiting.max_requests", 120)?
            .set_default("rate_limiting.window_seconds", 60)?
            // View tracking fallbacks
            .set_default("view_tracking.threshold_percent", 30.0)?
            .set_default("view_tracking.threshold_seconds", 600.0)?
            .set_default("view_tracking.duplicate_window_hours", 24)?
            .set_default("view_tracking.report_utc_offset_hours", 9)?
            // Retention
            .set_default("retention.retention_days", 365)?
            .set_default("retention.batch_size", 1000)?
            .set_default("retention.sleep_ms", 100)?
            .set_default("retention.max_batches", 100)?
            .set_default("retention.max_execution_seconds", 50)?
            .set_default("retention.worker_interval_seconds", 86400)?
            // Scheduler
            .set_default("scheduler.enabled", true)?
            .set_default("scheduler.interval_seconds", 60)?
            // Transcoder
            .set_default("transcoder.base_url", "http://localhost:8000")?
            .set_default("transcoder.timeout_seconds", 30)?
            .set_default("transcoder.poll_interval_seconds", 30)?
            .set_default("transcoder.output_dir", "./storage/transcoded")?
            // Security
            .set_default("security.admin_allowed_ips", Vec::<String>::new())?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}
