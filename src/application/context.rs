// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::settings::Settings;
use crate::domain::gateways::identity::IdentityProvider;
use crate::domain::gateways::GatewayError;
use crate::domain::services::account_service::AccountService;
use crate::domain::services::billing_service::BillingService;
use crate::domain::services::keyword_research_service::KeywordResearchService;
use crate::domain::services::rank_tracker::RankTracker;
use crate::domain::services::seo_audit_service::SeoAuditService;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::infrastructure::billing::{StripeClient, StripeWebhookVerifier};
use crate::infrastructure::identity::GoogleOAuthClient;
use crate::infrastructure::repositories::{
    ApiTokenRepositoryImpl, KeywordRepositoryImpl, SeoAnalysisRepositoryImpl, UserRepositoryImpl,
};
use crate::infrastructure::suggest::GoogleSuggestClient;

/// 应用上下文
///
/// 持有所有服务实例，通过 `Extension` 注入到处理器
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub db: Arc<DatabaseConnection>,
    pub accounts: Arc<AccountService>,
    pub billing: Arc<BillingService>,
    pub keyword_research: Arc<KeywordResearchService>,
    pub seo_audit: Arc<SeoAuditService>,
    pub rank_tracker: Arc<RankTracker>,
    /// 未配置 Google 凭据时为 `None`
    pub identity: Option<Arc<dyn IdentityProvider>>,
}

impl AppContext {
    /// 根据配置组装仓库、外部客户端和服务
    ///
    /// # 参数
    ///
    /// * `settings` - 应用配置
    /// * `db` - 已完成迁移的数据库连接
    ///
    /// # 返回值
    ///
    /// * `Ok(AppContext)` - 组装完成的上下文
    /// * `Err(anyhow::Error)` - HTTP 客户端初始化失败
    pub fn build(settings: Arc<Settings>, db: Arc<DatabaseConnection>) -> anyhow::Result<Self> {
        let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
        let token_repo = Arc::new(ApiTokenRepositoryImpl::new(db.clone()));
        let keyword_repo = Arc::new(KeywordRepositoryImpl::new(db.clone()));
        let analysis_repo = Arc::new(SeoAnalysisRepositoryImpl::new(db.clone()));

        let demo_billing = settings.is_demo_billing();
        if demo_billing {
            info!("Billing is running in demo mode");
        }

        let accounts = Arc::new(AccountService::new(
            user_repo.clone(),
            token_repo,
            keyword_repo.clone(),
            analysis_repo.clone(),
            settings.security.clone(),
            demo_billing,
        ));

        let billing = Arc::new(BillingService::new(
            user_repo.clone(),
            Arc::new(StripeClient::new(&settings.billing)?),
            Arc::new(StripeWebhookVerifier::new(&settings.billing)),
            settings.billing.clone(),
            settings.server.public_url.clone(),
            demo_billing,
        ));

        let keyword_research = Arc::new(KeywordResearchService::new(
            Arc::new(GoogleSuggestClient::new(&settings.suggest)?),
            user_repo.clone(),
            settings.suggest.max_suggestions,
        ));

        let seo_audit = Arc::new(SeoAuditService::new(
            Arc::new(ReqwestEngine::new(&settings.analyzer)?),
            analysis_repo,
            user_repo,
            Duration::from_secs(settings.analyzer.timeout_secs),
        ));

        let rank_tracker = Arc::new(RankTracker::new(keyword_repo));

        let identity: Option<Arc<dyn IdentityProvider>> =
            match GoogleOAuthClient::new(&settings.oauth, &settings.server.public_url) {
                Ok(client) => Some(Arc::new(client)),
                Err(GatewayError::NotConfigured(what)) => {
                    info!("{} is not configured, sign-in with Google disabled", what);
                    None
                }
                Err(e) => return Err(e.into()),
            };

        Ok(Self {
            settings,
            db,
            accounts,
            billing,
            keyword_research,
            seo_audit,
            rank_tracker,
            identity,
        })
    }
}
