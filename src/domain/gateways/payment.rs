// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use super::GatewayError;
use crate::domain::models::plan::BillingInterval;

/// 创建结账会话所需参数
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub user_id: Uuid,
    pub plan_name: String,
    pub product_name: String,
    /// 金额（美分）
    pub amount: i64,
    pub currency: String,
    pub interval: BillingInterval,
    pub success_url: String,
    pub cancel_url: String,
}

/// 结账会话
#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    pub id: String,
    /// 托管结账页面地址
    pub url: Option<String>,
    /// `paid` / `unpaid` / `no_payment_required`
    pub payment_status: Option<String>,
    pub customer: Option<String>,
    pub subscription: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }
}

/// 订阅信息
#[derive(Debug, Clone)]
pub struct SubscriptionInfo {
    pub id: String,
    /// 当前计费周期结束时间（Unix 秒）
    pub current_period_end: Option<i64>,
}

/// 支付网关
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 创建客户，返回客户 ID
    async fn create_customer(&self, email: &str, name: &str) -> Result<String, GatewayError>;

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError>;

    async fn retrieve_checkout_session(&self, session_id: &str)
        -> Result<CheckoutSession, GatewayError>;

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<SubscriptionInfo, GatewayError>;
}

/// 支付 webhook 签名校验
pub trait WebhookVerifier: Send + Sync {
    /// 校验原始请求体和签名头
    ///
    /// `now` 为当前 Unix 秒
    fn verify(&self, payload: &[u8], header: Option<&str>, now: i64) -> Result<(), GatewayError>;
}
