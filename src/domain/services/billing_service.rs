// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::settings::BillingSettings;
use crate::domain::gateways::payment::{CheckoutRequest, PaymentGateway, WebhookVerifier};
use crate::domain::models::plan::{Plan, PlanOffer, SubscriptionStatus};
use crate::domain::models::user::User;
use crate::domain::repositories::user_repository::UserRepository;
use crate::utils::errors::ServiceError;

/// 订阅结果
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SubscribeOutcome {
    /// 演示模式下直接切换套餐
    Demo {
        success: bool,
        message: String,
        plan: Plan,
    },
    /// 需要跳转到托管结账页面
    Checkout {
        checkout_url: String,
        session_id: String,
    },
}

/// 对外展示的套餐价格
#[derive(Debug, Clone, Serialize)]
pub struct PlanListing {
    #[serde(flatten)]
    pub offer: PlanOffer,
    pub price: String,
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: WebhookData,
}

#[derive(Debug, Deserialize)]
struct WebhookData {
    object: Value,
}

/// 计费服务
///
/// 套餐目录、订阅结账、支付确认以及 Stripe webhook 事件处理
pub struct BillingService {
    user_repo: Arc<dyn UserRepository>,
    gateway: Arc<dyn PaymentGateway>,
    verifier: Arc<dyn WebhookVerifier>,
    settings: BillingSettings,
    public_url: String,
    demo_mode: bool,
}

impl BillingService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        gateway: Arc<dyn PaymentGateway>,
        verifier: Arc<dyn WebhookVerifier>,
        settings: BillingSettings,
        public_url: String,
        demo_mode: bool,
    ) -> Self {
        Self {
            user_repo,
            gateway,
            verifier,
            settings,
            public_url: public_url.trim_end_matches('/').to_string(),
            demo_mode,
        }
    }

    pub fn is_demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// 可订阅套餐及价格
    pub fn plans(&self) -> Vec<PlanListing> {
        PlanOffer::catalogue()
            .into_iter()
            .map(|offer| PlanListing {
                price: offer.display_price(),
                offer,
            })
            .collect()
    }

    /// 订阅套餐
    ///
    /// # 参数
    ///
    /// * `user` - 当前用户
    /// * `plan_name` - `starter` 或 `professional`
    ///
    /// # 返回值
    ///
    /// * `Ok(SubscribeOutcome::Demo)` - 演示模式，套餐已切换
    /// * `Ok(SubscribeOutcome::Checkout)` - 结账页面地址
    /// * `Err(ServiceError)` - 套餐无效 (400) 或 Stripe 调用失败 (502)
    pub async fn subscribe(
        &self,
        user: &User,
        plan_name: &str,
    ) -> Result<SubscribeOutcome, ServiceError> {
        let offer = PlanOffer::find(plan_name)
            .ok_or_else(|| ServiceError::Validation("Invalid plan selected.".to_string()))?;

        let mut user = user.clone();

        if self.demo_mode {
            user.activate_plan(offer.plan);
            user.trial_end = None;
            self.user_repo.update(&user).await?;

            tracing::info!("Demo subscription: user {} -> {}", user.id, offer.plan);
            return Ok(SubscribeOutcome::Demo {
                success: true,
                message: format!(
                    "DEMO MODE: Successfully \"subscribed\" to {} ({}/{}). This is a simulation - configure real Stripe keys for actual payments.",
                    offer.name,
                    offer.display_price(),
                    offer.interval.as_str()
                ),
                plan: offer.plan,
            });
        }

        let customer_id = match user.stripe_customer_id.clone() {
            Some(id) => id,
            None => {
                let id = self
                    .gateway
                    .create_customer(&user.email, &user.name)
                    .await
                    .map_err(|e| ServiceError::Upstream(format!("Payment error: {}", e)))?;
                user.stripe_customer_id = Some(id.clone());
                self.user_repo.update(&user).await?;
                id
            }
        };

        let session = self
            .gateway
            .create_checkout_session(&CheckoutRequest {
                customer_id,
                user_id: user.id,
                plan_name: offer.plan.as_str().to_string(),
                product_name: offer.name.to_string(),
                amount: offer.amount,
                currency: self.settings.currency.clone(),
                interval: offer.interval,
                success_url: format!(
                    "{}/api/payment/success?session_id={{CHECKOUT_SESSION_ID}}",
                    self.public_url
                ),
                cancel_url: format!("{}/api/plans", self.public_url),
            })
            .await
            .map_err(|e| ServiceError::Upstream(format!("Payment error: {}", e)))?;

        let checkout_url = session
            .url
            .ok_or_else(|| ServiceError::Upstream("Checkout session has no URL".to_string()))?;

        Ok(SubscribeOutcome::Checkout {
            checkout_url,
            session_id: session.id,
        })
    }

    /// 结账完成后确认支付
    ///
    /// 会话属于其他用户时按未完成处理
    pub async fn confirm_payment(
        &self,
        user: &User,
        session_id: Option<&str>,
    ) -> Result<User, ServiceError> {
        let session_id = session_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ServiceError::Validation("Invalid payment session.".to_string()))?;

        let session = self
            .gateway
            .retrieve_checkout_session(session_id)
            .await
            .map_err(|e| ServiceError::Upstream(format!("Error verifying payment: {}", e)))?;

        let owner_matches = session
            .metadata
            .get("user_id")
            .map_or(true, |id| *id == user.id.to_string());
        if !session.is_paid() || !owner_matches {
            return Err(ServiceError::Validation(
                "Payment was not completed. Please try again.".to_string(),
            ));
        }

        let plan = session
            .metadata
            .get("plan_name")
            .map(|name| Plan::from_stored(name))
            .unwrap_or(Plan::Starter);

        let mut user = user.clone();
        user.activate_plan(plan);
        if let Some(subscription_id) = session.subscription.as_deref() {
            self.apply_subscription(&mut user, subscription_id).await?;
        }

        let user = self.user_repo.update(&user).await?;
        tracing::info!("Payment confirmed for user {}: {}", user.id, plan);
        Ok(user)
    }

    /// 处理 Stripe webhook
    ///
    /// 签名或负载无效时返回 400；事件处理失败只记录日志
    ///
    /// # 返回值
    ///
    /// 事件类型
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<String, ServiceError> {
        self.verifier
            .verify(payload, signature_header, now.timestamp())
            .map_err(|e| {
            tracing::warn!("Rejected webhook: {}", e);
            ServiceError::Validation("Invalid signature".to_string())
        })?;

        let event: WebhookEvent = serde_json::from_slice(payload)
            .map_err(|_| ServiceError::Validation("Invalid payload".to_string()))?;

        counter!("billing_webhook_events_total", "type" => event.event_type.clone()).increment(1);

        let object = &event.data.object;
        let result = match event.event_type.as_str() {
            "checkout.session.completed" => self.on_checkout_completed(object).await,
            "invoice.payment_succeeded" => self.on_payment_succeeded(object, now).await,
            "invoice.payment_failed" => {
                self.update_customer(object, |user| {
                    user.subscription_status = SubscriptionStatus::PastDue;
                })
                .await
            }
            "customer.subscription.deleted" => {
                self.update_customer(object, |user| {
                    user.subscription_status = SubscriptionStatus::Canceled;
                    user.plan = Plan::Trial;
                    user.stripe_subscription_id = None;
                })
                .await
            }
            other => {
                tracing::debug!("Ignoring webhook event {}", other);
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::error!("Error handling {}: {}", event.event_type, e);
        }
        Ok(event.event_type)
    }

    async fn on_checkout_completed(&self, session: &Value) -> Result<(), ServiceError> {
        let metadata = &session["metadata"];
        let (Some(user_id), Some(plan_name)) =
            (metadata["user_id"].as_str(), metadata["plan_name"].as_str())
        else {
            return Ok(());
        };

        let user_id = Uuid::parse_str(user_id)
            .map_err(|_| ServiceError::Validation(format!("Invalid user id {}", user_id)))?;
        let Some(mut user) = self.user_repo.find_by_id(user_id).await? else {
            return Ok(());
        };

        user.activate_plan(Plan::from_stored(plan_name));
        if user.stripe_customer_id.is_none() {
            user.stripe_customer_id = session["customer"].as_str().map(str::to_string);
        }
        if let Some(subscription_id) = session["subscription"].as_str() {
            self.apply_subscription(&mut user, subscription_id).await?;
        }

        self.user_repo.update(&user).await?;
        tracing::info!("User {} subscription activated: {}", user.id, plan_name);
        Ok(())
    }

    async fn on_payment_succeeded(
        &self,
        invoice: &Value,
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        self.update_customer(invoice, |user| {
            user.subscription_status = SubscriptionStatus::Active;
            user.daily_keyword_queries = 0;
            user.daily_seo_reports = 0;
            user.last_usage_reset = now.date_naive();
        })
        .await
    }

    /// 按 `customer` 字段找到用户并更新
    async fn update_customer<F>(&self, object: &Value, apply: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut User) + Send,
    {
        let Some(customer_id) = object["customer"].as_str() else {
            return Ok(());
        };
        let Some(mut user) = self
            .user_repo
            .find_by_stripe_customer_id(customer_id)
            .await?
        else {
            tracing::debug!("No user for customer {}", customer_id);
            return Ok(());
        };

        apply(&mut user);
        let user = self.user_repo.update(&user).await?;
        tracing::info!(
            "Billing status for user {} is now {}",
            user.id,
            user.subscription_status
        );
        Ok(())
    }

    async fn apply_subscription(
        &self,
        user: &mut User,
        subscription_id: &str,
    ) -> Result<(), ServiceError> {
        let subscription = self
            .gateway
            .retrieve_subscription(subscription_id)
            .await
            .map_err(|e| ServiceError::Upstream(format!("Error verifying payment: {}", e)))?;

        user.stripe_subscription_id = Some(subscription.id);
        user.current_period_end = subscription
            .current_period_end
            .and_then(|ts| DateTime::from_timestamp(ts, 0));
        Ok(())
    }
}

#[cfg(test)]
#[path = "billing_service_test.rs"]
mod tests;
