// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use validator::ValidateEmail;

use crate::config::settings::SecuritySettings;
use crate::domain::gateways::identity::IdentityProfile;
use crate::domain::models::api_token::ApiToken;
use crate::domain::models::keyword::TrackedKeyword;
use crate::domain::models::plan::{Plan, PlanLimits, SubscriptionStatus};
use crate::domain::models::seo_analysis::SeoAnalysisSummary;
use crate::domain::models::user::User;
use crate::domain::repositories::api_token_repository::ApiTokenRepository;
use crate::domain::repositories::keyword_repository::KeywordRepository;
use crate::domain::repositories::seo_analysis_repository::SeoAnalysisRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::utils::errors::{RepositoryError, ServiceError};
use crate::utils::sanitize::sanitize_input;

const RECENT_ITEMS: u64 = 5;

/// 登录会话：明文令牌只在这里出现一次
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub success: bool,
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// 仪表盘数据
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub user: User,
    pub plan: PlanSummary,
    pub limits: PlanLimits,
    pub usage: Usage,
    pub total_keywords: u64,
    pub total_analyses: u64,
    pub recent_keywords: Vec<TrackedKeyword>,
    pub recent_analyses: Vec<SeoAnalysisSummary>,
    pub features: FeatureAccess,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub plan: Plan,
    pub display_name: &'static str,
    pub is_trial_active: bool,
    pub trial_end: Option<DateTime<Utc>>,
    pub subscription_status: SubscriptionStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct Usage {
    pub keyword_queries: i32,
    pub seo_reports: i32,
    pub tracked_keywords: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureAccess {
    pub csv_export: bool,
    pub historical_data: bool,
    pub full_seo_reports: bool,
}

/// 账户服务
///
/// 注册、登录、OAuth 登录、访问令牌以及仪表盘
pub struct AccountService {
    user_repo: Arc<dyn UserRepository>,
    token_repo: Arc<dyn ApiTokenRepository>,
    keyword_repo: Arc<dyn KeywordRepository>,
    analysis_repo: Arc<dyn SeoAnalysisRepository>,
    security: SecuritySettings,
    demo_billing: bool,
}

impl AccountService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        token_repo: Arc<dyn ApiTokenRepository>,
        keyword_repo: Arc<dyn KeywordRepository>,
        analysis_repo: Arc<dyn SeoAnalysisRepository>,
        security: SecuritySettings,
        demo_billing: bool,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            keyword_repo,
            analysis_repo,
            security,
            demo_billing,
        }
    }

    /// 注册新用户并开始试用
    ///
    /// # 参数
    ///
    /// * `raw_email` - 邮箱，会被转为小写
    /// * `raw_name` - 名称，为空时使用邮箱的本地部分
    /// * `password` - 可选密码，不做清洗
    pub async fn signup(
        &self,
        raw_email: &str,
        raw_name: &str,
        password: Option<&str>,
    ) -> Result<Session, ServiceError> {
        let email = normalize_email(raw_email);
        if !email.validate_email() {
            return Err(ServiceError::Validation("Invalid email address".to_string()));
        }

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(email_taken());
        }

        let name = match sanitize_input(raw_name) {
            name if name.is_empty() => local_part(&email).to_string(),
            name => name,
        };

        let mut user = User::new_trial(email, name, self.security.trial_days, Utc::now());
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            user.password_hash = Some(hash_password(password).await?);
        }

        let user = self.user_repo.create(&user).await.map_err(|e| match e {
            RepositoryError::AlreadyExists => email_taken(),
            other => other.into(),
        })?;

        tracing::info!("New user {} started a {}-day trial", user.id, self.security.trial_days);
        self.issue_session(user, false).await
    }

    /// 邮箱密码登录
    ///
    /// 没有密码的 OAuth 账户同样返回认证失败
    pub async fn login(
        &self,
        raw_email: &str,
        password: &str,
        remember: bool,
    ) -> Result<Session, ServiceError> {
        let email = normalize_email(raw_email);
        let invalid = || ServiceError::Unauthorized("Invalid email or password".to_string());

        let user = self.user_repo.find_by_email(&email).await?.ok_or_else(invalid)?;
        let stored = user.password_hash.clone().ok_or_else(invalid)?;

        if !verify_password(password, &stored).await? {
            tracing::debug!("Failed login for user {}", user.id);
            return Err(invalid());
        }

        self.issue_session(user, remember).await
    }

    /// 身份提供方登录：不存在则创建，已存在则补充关联 ID
    pub async fn oauth_login(&self, profile: IdentityProfile) -> Result<Session, ServiceError> {
        let email = normalize_email(&profile.email);
        if !email.validate_email() {
            return Err(ServiceError::Validation("Invalid email address".to_string()));
        }

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(mut user) => {
                if user.google_id.is_none() {
                    user.google_id = Some(profile.sub);
                    user = self.user_repo.update(&user).await?;
                }
                user
            }
            None => {
                let name = profile
                    .name
                    .map(|n| sanitize_input(&n))
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| local_part(&email).to_string());
                let mut user = User::new_trial(email, name, self.security.trial_days, Utc::now());
                user.google_id = Some(profile.sub);
                let user = self.user_repo.create(&user).await?;
                tracing::info!("New OAuth user {} started a trial", user.id);
                user
            }
        };

        self.issue_session(user, false).await
    }

    /// 校验令牌并返回所属用户
    pub async fn authenticate(&self, token: &str) -> Result<User, ServiceError> {
        let unauthorized = || ServiceError::Unauthorized("Invalid or expired token".to_string());

        let record = self
            .token_repo
            .find_active_by_hash(&ApiToken::hash(token), Utc::now())
            .await?
            .ok_or_else(unauthorized)?;

        let user = self
            .user_repo
            .find_by_id(record.user_id)
            .await?
            .ok_or_else(unauthorized)?;

        if !user.is_active {
            return Err(ServiceError::Unauthorized("Account is disabled".to_string()));
        }
        Ok(user)
    }

    /// 吊销令牌
    pub async fn logout(&self, token: &str) -> Result<(), ServiceError> {
        self.token_repo.delete_by_hash(&ApiToken::hash(token)).await?;
        Ok(())
    }

    /// 清理过期令牌
    pub async fn purge_expired_tokens(&self) -> Result<u64, ServiceError> {
        Ok(self.token_repo.delete_expired(Utc::now()).await?)
    }

    /// 仪表盘
    ///
    /// 跨天时先重置每日用量
    pub async fn dashboard(&self, user: &User) -> Result<Dashboard, ServiceError> {
        let now = Utc::now();
        let mut user = user.clone();
        if user.reset_daily_usage_if_needed(now.date_naive()) {
            self.user_repo.reset_usage(user.id, now.date_naive()).await?;
        }

        let total_keywords = self.keyword_repo.count_by_user(user.id).await?;
        let total_analyses = self.analysis_repo.count_by_user(user.id).await?;
        let recent_keywords = self
            .keyword_repo
            .list_by_user(user.id, Some(RECENT_ITEMS))
            .await?;
        let recent_analyses = self
            .analysis_repo
            .list_recent(user.id, RECENT_ITEMS)
            .await?
            .iter()
            .map(SeoAnalysisSummary::from)
            .collect();

        Ok(Dashboard {
            plan: PlanSummary {
                plan: user.plan,
                display_name: user.plan_display_name(now),
                is_trial_active: user.is_trial_active(now),
                trial_end: user.trial_end,
                subscription_status: user.subscription_status,
            },
            limits: user.plan_limits(now),
            usage: Usage {
                keyword_queries: user.daily_keyword_queries,
                seo_reports: user.daily_seo_reports,
                tracked_keywords: total_keywords,
            },
            total_keywords,
            total_analyses,
            recent_keywords,
            recent_analyses,
            features: FeatureAccess {
                csv_export: user.can_export_csv(now),
                historical_data: user.can_access_historical_data(now),
                full_seo_reports: user.is_professional(now),
            },
            user,
        })
    }

    /// 演示模式下直接切换套餐
    ///
    /// `trial` 会以 Starter 套餐重新开始试用
    pub async fn switch_plan_for_testing(
        &self,
        user: &User,
        plan_name: &str,
    ) -> Result<User, ServiceError> {
        if !self.demo_billing {
            return Err(ServiceError::PlanRestricted(
                "This feature is only available in demo mode.".to_string(),
            ));
        }

        let plan: Plan = plan_name
            .parse()
            .map_err(|_| ServiceError::Validation("Invalid plan name.".to_string()))?;

        let mut user = user.clone();
        match plan {
            Plan::Trial => {
                user.plan = Plan::Starter;
                user.trial_end = Some(Utc::now() + Duration::days(self.security.trial_days));
            }
            paid => {
                user.activate_plan(paid);
                user.trial_end = None;
            }
        }

        let user = self.user_repo.update(&user).await?;
        tracing::info!("Test mode: user {} switched to {}", user.id, plan_name);
        Ok(user)
    }

    async fn issue_session(&self, user: User, remember: bool) -> Result<Session, ServiceError> {
        let ttl = if remember {
            self.security.remember_token_ttl_secs
        } else {
            self.security.token_ttl_secs
        };
        let (record, token) = ApiToken::issue(user.id, ttl);
        let record = self.token_repo.create(&record).await?;

        Ok(Session {
            success: true,
            token,
            token_type: "Bearer",
            expires_at: record.expires_at,
            user,
        })
    }
}

fn normalize_email(raw: &str) -> String {
    sanitize_input(raw).to_lowercase()
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

fn email_taken() -> ServiceError {
    ServiceError::Conflict("Email already registered".to_string())
}

async fn hash_password(password: &str) -> Result<String, ServiceError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::Internal(format!("Password hashing failed: {}", e)))
    })
    .await
    .map_err(|e| ServiceError::Internal(e.to_string()))?
}

async fn verify_password(password: &str, stored: &str) -> Result<bool, ServiceError> {
    let password = password.to_owned();
    let stored = stored.to_owned();
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored)
            .map_err(|e| ServiceError::Internal(format!("Stored password hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| ServiceError::Internal(e.to_string()))?
}

#[cfg(test)]
#[path = "account_service_test.rs"]
mod tests;
