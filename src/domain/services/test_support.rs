// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 服务层单元测试使用的内存实现

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::gateways::payment::{
    CheckoutRequest, CheckoutSession, PaymentGateway, SubscriptionInfo,
};
use crate::domain::gateways::suggest::KeywordSuggester;
use crate::domain::gateways::GatewayError;
use crate::domain::models::api_token::ApiToken;
use crate::domain::models::keyword::{Ranking, TrackedKeyword};
use crate::domain::models::plan::{Feature, Plan, SubscriptionStatus};
use crate::domain::models::seo_analysis::SeoAnalysisRecord;
use crate::domain::models::user::User;
use crate::domain::repositories::api_token_repository::ApiTokenRepository;
use crate::domain::repositories::keyword_repository::KeywordRepository;
use crate::domain::repositories::seo_analysis_repository::SeoAnalysisRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::engines::traits::{EngineError, FetchRequest, FetchedPage, PageFetcher};
use crate::utils::errors::RepositoryError;

pub fn trial_user() -> User {
    User::new_trial("owner@example.com".into(), "owner".into(), 7, Utc::now())
}

/// 试用期已结束的付费用户
pub fn paid_user(plan: Plan) -> User {
    let mut user = trial_user();
    user.plan = plan;
    user.trial_end = None;
    user.subscription_status = SubscriptionStatus::Active;
    user
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::AlreadyExists);
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_stripe_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.stripe_customer_id.as_deref() == Some(customer_id))
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound);
        }
        let mut updated = user.clone();
        updated.updated_at = Utc::now();
        users.insert(user.id, updated.clone());
        Ok(updated)
    }

    async fn increment_usage(&self, user_id: Uuid, feature: Feature) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&user_id).ok_or(RepositoryError::NotFound)?;
        match feature {
            Feature::KeywordQueries => user.daily_keyword_queries += 1,
            Feature::SeoReports => user.daily_seo_reports += 1,
            Feature::TrackedKeywords => {}
        }
        Ok(())
    }

    async fn reset_usage(&self, user_id: Uuid, today: NaiveDate) -> Result<(), RepositoryError> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.reset_daily_usage_if_needed(today);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryKeywordRepository {
    keywords: Mutex<Vec<TrackedKeyword>>,
    rankings: Mutex<Vec<Ranking>>,
}

impl InMemoryKeywordRepository {
    pub fn rankings_for(&self, keyword_id: Uuid) -> Vec<Ranking> {
        self.rankings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.keyword_id == keyword_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl KeywordRepository for InMemoryKeywordRepository {
    async fn create(&self, keyword: &TrackedKeyword) -> Result<TrackedKeyword, RepositoryError> {
        self.keywords.lock().unwrap().push(keyword.clone());
        Ok(keyword.clone())
    }

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TrackedKeyword>, RepositoryError> {
        Ok(self
            .keywords
            .lock()
            .unwrap()
            .iter()
            .find(|k| k.id == id && k.user_id == user_id)
            .cloned())
    }

    async fn exists(
        &self,
        user_id: Uuid,
        keyword: &str,
        domain: &str,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .keywords
            .lock()
            .unwrap()
            .iter()
            .any(|k| k.user_id == user_id && k.keyword == keyword && k.domain == domain))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<TrackedKeyword>, RepositoryError> {
        let mut list: Vec<TrackedKeyword> = self
            .keywords
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            list.truncate(limit as usize);
        }
        Ok(list)
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepositoryError> {
        Ok(self
            .keywords
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.user_id == user_id)
            .count() as u64)
    }

    async fn list_all(&self) -> Result<Vec<TrackedKeyword>, RepositoryError> {
        Ok(self.keywords.lock().unwrap().clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.rankings.lock().unwrap().retain(|r| r.keyword_id != id);
        self.keywords.lock().unwrap().retain(|k| k.id != id);
        Ok(())
    }

    async fn add_ranking(&self, ranking: &Ranking) -> Result<Ranking, RepositoryError> {
        self.rankings.lock().unwrap().push(ranking.clone());
        Ok(ranking.clone())
    }

    async fn latest_ranking(&self, keyword_id: Uuid) -> Result<Option<Ranking>, RepositoryError> {
        Ok(self
            .rankings_for(keyword_id)
            .into_iter()
            .max_by_key(|r| r.checked_at))
    }

    async fn rankings_since(
        &self,
        keyword_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Ranking>, RepositoryError> {
        let mut list: Vec<Ranking> = self
            .rankings_for(keyword_id)
            .into_iter()
            .filter(|r| since.map_or(true, |s| r.checked_at >= s))
            .collect();
        list.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
        Ok(list)
    }
}

#[derive(Default)]
pub struct InMemorySeoAnalysisRepository {
    records: Mutex<Vec<SeoAnalysisRecord>>,
}

impl InMemorySeoAnalysisRepository {
    pub fn insert(&self, record: SeoAnalysisRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl SeoAnalysisRepository for InMemorySeoAnalysisRepository {
    async fn create(&self, record: &SeoAnalysisRecord) -> Result<SeoAnalysisRecord, RepositoryError> {
        self.insert(record.clone());
        Ok(record.clone())
    }

    async fn find_recent(
        &self,
        user_id: Uuid,
        url: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<SeoAnalysisRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id && r.url == url && r.created_at >= since)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn list_recent(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<SeoAnalysisRecord>, RepositoryError> {
        let mut list: Vec<SeoAnalysisRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list.truncate(limit as usize);
        Ok(list)
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryApiTokenRepository {
    tokens: Mutex<Vec<ApiToken>>,
}

#[async_trait]
impl ApiTokenRepository for InMemoryApiTokenRepository {
    async fn create(&self, token: &ApiToken) -> Result<ApiToken, RepositoryError> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(token.clone())
    }

    async fn find_active_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ApiToken>, RepositoryError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash && !t.is_expired(now))
            .cloned())
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<(), RepositoryError> {
        self.tokens.lock().unwrap().retain(|t| t.token_hash != token_hash);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| !t.is_expired(now));
        Ok((before - tokens.len()) as u64)
    }
}

pub struct StaticSuggester(Result<Vec<String>, GatewayError>);

impl StaticSuggester {
    pub fn ok(items: &[&str]) -> Self {
        Self(Ok(items.iter().map(|s| s.to_string()).collect()))
    }

    pub fn failing(err: GatewayError) -> Self {
        Self(Err(err))
    }
}

#[async_trait]
impl KeywordSuggester for StaticSuggester {
    async fn suggest(&self, _keyword: &str) -> Result<Vec<String>, GatewayError> {
        self.0.clone()
    }
}

/// 固定返回同一份 HTML 并记录请求次数
pub struct StaticFetcher {
    html: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn serving(html: &str) -> Self {
        Self {
            html: Some(html.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            html: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, EngineError> {
        self.calls.lock().unwrap().push(request.url.clone());
        match &self.html {
            Some(html) => Ok(FetchedPage {
                final_url: request.url.clone(),
                status_code: 200,
                content: html.clone(),
                content_type: "text/html".to_string(),
                response_time_ms: 1,
            }),
            None => Err(EngineError::HttpStatus(404)),
        }
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// 记录调用的支付网关
#[derive(Default)]
pub struct RecordingPaymentGateway {
    pub customers: Mutex<Vec<String>>,
    pub checkouts: Mutex<Vec<CheckoutRequest>>,
    pub sessions: Mutex<HashMap<String, CheckoutSession>>,
}

#[async_trait]
impl PaymentGateway for RecordingPaymentGateway {
    async fn create_customer(&self, email: &str, _name: &str) -> Result<String, GatewayError> {
        let mut customers = self.customers.lock().unwrap();
        customers.push(email.to_string());
        Ok(format!("cus_{}", customers.len()))
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        self.checkouts.lock().unwrap().push(request.clone());
        Ok(CheckoutSession {
            id: "cs_test_1".to_string(),
            url: Some("https://checkout.example/cs_test_1".to_string()),
            ..Default::default()
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, GatewayError> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or(GatewayError::Api {
                service: "stripe",
                status: 404,
                message: "No such checkout session".to_string(),
            })
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<SubscriptionInfo, GatewayError> {
        Ok(SubscriptionInfo {
            id: subscription_id.to_string(),
            current_period_end: Some(1_900_000_000),
        })
    }
}
