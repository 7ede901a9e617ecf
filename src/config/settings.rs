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

/// Stripe 占位测试密钥前缀，出现时自动进入演示计费模式
pub const DEMO_STRIPE_KEY_PREFIX: &str = "sk_test_51234567890";

/// 应用程序配置设置
///
/// 包含服务器、数据库、安全、限流、计费、OAuth、关键词建议、页面分析等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 运行环境名称
    pub environment: String,
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 安全配置
    pub security: SecuritySettings,
    /// 速率限制配置
    pub rate_limiting: RateLimitingSettings,
    /// 计费配置
    pub billing: BillingSettings,
    /// Google OAuth 配置
    pub oauth: OAuthSettings,
    /// 关键词建议接口配置
    pub suggest: SuggestSettings,
    /// 页面分析配置
    pub analyzer: AnalyzerSettings,
    /// 后台工作器配置
    pub workers: WorkerSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
    /// 日志配置
    pub log: LogSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 对外访问的基础URL，用于生成回调地址
    pub public_url: String,
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
}

/// 安全配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SecuritySettings {
    /// 签名密钥（OAuth state 等）
    pub secret_key: String,
    /// 访问令牌有效期（秒）
    pub token_ttl_secs: i64,
    /// "记住我" 登录的令牌有效期（秒）
    pub remember_token_ttl_secs: i64,
    /// 新用户试用天数
    pub trial_days: i64,
}

/// 速率限制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitingSettings {
    /// 是否启用速率限制
    pub enabled: bool,
    /// 全局默认每小时请求数限制
    pub default_per_hour: u32,
    /// 关键词研究每小时请求数
    pub keyword_research_per_hour: u32,
    /// SEO 分析每小时请求数
    pub seo_analysis_per_hour: u32,
    /// 添加追踪关键词每小时请求数
    pub add_keyword_per_hour: u32,
    /// 注册每分钟请求数
    pub signup_per_minute: u32,
    /// 登录每分钟请求数
    pub login_per_minute: u32,
}

/// 计费配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BillingSettings {
    /// Stripe API 基础地址
    pub api_base: String,
    /// Stripe 公钥
    pub publishable_key: String,
    /// Stripe 私钥
    pub secret_key: String,
    /// Webhook 签名密钥
    pub webhook_secret: String,
    /// Webhook 时间戳容忍度（秒）
    pub webhook_tolerance_secs: i64,
    /// 强制演示模式
    pub demo_mode: bool,
    /// 结算货币
    pub currency: String,
}

/// Google OAuth 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthSettings {
    /// 客户端 ID
    pub google_client_id: Option<String>,
    /// 客户端密钥
    pub google_client_secret: Option<String>,
    /// 授权端点
    pub authorize_url: String,
    /// 令牌端点
    pub token_url: String,
    /// 用户信息端点
    pub userinfo_url: String,
}

/// 关键词建议配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestSettings {
    /// 自动补全接口地址
    pub endpoint: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 最多返回的建议数量
    pub max_suggestions: usize,
}

/// 页面分析配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerSettings {
    /// 抓取页面时使用的 User-Agent
    pub user_agent: String,
    /// 抓取超时时间（秒）
    pub timeout_secs: u64,
    /// 页面最大字节数
    pub max_body_bytes: usize,
    /// 是否启用 SSRF 保护
    pub ssrf_protection: bool,
}

/// 后台工作器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    /// 是否启用排名刷新工作器
    pub rank_refresh_enabled: bool,
    /// 排名刷新间隔（秒）
    pub rank_refresh_interval_secs: u64,
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// 是否输出 JSON 格式日志
    pub json: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和 `RANKSCOPE__*` 环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("environment", env.clone())?
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.public_url", "http://localhost:8000")?
            // Default DB pool settings
            .set_default("database.url", "sqlite://rankscope.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Security
            .set_default("security.secret_key", "dev-secret-key-change-in-production")?
            .set_default("security.token_ttl_secs", 3600)?
            .set_default("security.remember_token_ttl_secs", 60 * 60 * 24 * 30)?
            .set_default("security.trial_days", 7)?
            // Default Rate Limiting settings
            .set_default("rate_limiting.enabled", true)?
            .set_default("rate_limiting.default_per_hour", 50)?
            .set_default("rate_limiting.keyword_research_per_hour", 20)?
            .set_default("rate_limiting.seo_analysis_per_hour", 10)?
            .set_default("rate_limiting.add_keyword_per_hour", 30)?
            .set_default("rate_limiting.signup_per_minute", 5)?
            .set_default("rate_limiting.login_per_minute", 10)?
            // Billing
            .set_default("billing.api_base", "https://api.stripe.com")?
            .set_default("billing.publishable_key", "pk_test_51234567890abcdef")?
            .set_default("billing.secret_key", "sk_test_51234567890abcdef")?
            .set_default("billing.webhook_secret", "whsec_test_webhook_secret")?
            .set_default("billing.webhook_tolerance_secs", 300)?
            .set_default("billing.demo_mode", false)?
            .set_default("billing.currency", "usd")?
            // OAuth
            .set_default(
                "oauth.authorize_url",
                "https://accounts.google.com/o/oauth2/v2/auth",
            )?
            .set_default("oauth.token_url", "https://oauth2.googleapis.com/token")?
            .set_default(
                "oauth.userinfo_url",
                "https://openidconnect.googleapis.com/v1/userinfo",
            )?
            // Keyword suggestions
            .set_default(
                "suggest.endpoint",
                "http://suggestqueries.google.com/complete/search",
            )?
            .set_default("suggest.timeout_secs", 5)?
            .set_default("suggest.max_suggestions", 15)?
            // Page analyzer
            .set_default(
                "analyzer.user_agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            )?
            .set_default("analyzer.timeout_secs", 15)?
            .set_default("analyzer.max_body_bytes", 5 * 1024 * 1024)?
            .set_default("analyzer.ssrf_protection", true)?
            // Workers
            .set_default("workers.rank_refresh_enabled", true)?
            .set_default("workers.rank_refresh_interval_secs", 60 * 60 * 24)?
            // Observability
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .set_default("log.json", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("RANKSCOPE").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 是否处于演示计费模式
    ///
    /// 显式开启，或 Stripe 私钥仍是占位测试密钥时返回 true
    pub fn is_demo_billing(&self) -> bool {
        self.billing.demo_mode || self.billing.secret_key.starts_with(DEMO_STRIPE_KEY_PREFIX)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否配置了 Google OAuth 凭据
    pub fn google_oauth_enabled(&self) -> bool {
        matches!(
            (&self.oauth.google_client_id, &self.oauth.google_client_secret),
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty()
        )
    }
}

/// 隐藏数据库URL中的凭据，用于日志输出
pub fn mask_database_url(url: &str) -> String {
    match url.split_once('@') {
        Some((prefix, _)) => format!("{}@***", prefix.split(':').take(2).collect::<Vec<_>>().join(":")),
        None => url.to_string(),
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
