// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::settings::BillingSettings;
use crate::domain::gateways::payment::{
    CheckoutRequest, CheckoutSession, PaymentGateway, SubscriptionInfo,
};
use crate::domain::gateways::GatewayError;

const SERVICE: &str = "stripe";

#[derive(Debug, Deserialize)]
struct CustomerObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SessionObject {
    id: String,
    url: Option<String>,
    payment_status: Option<String>,
    customer: Option<String>,
    subscription: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

impl From<SessionObject> for CheckoutSession {
    fn from(obj: SessionObject) -> Self {
        CheckoutSession {
            id: obj.id,
            url: obj.url,
            payment_status: obj.payment_status,
            customer: obj.customer,
            subscription: obj.subscription,
            metadata: obj.metadata,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubscriptionObject {
    id: String,
    current_period_end: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Stripe REST 客户端
///
/// 请求体为表单编码，嵌套参数使用 `a[b][c]` 形式
pub struct StripeClient {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeClient {
    /// 创建新的 Stripe 客户端
    pub fn new(settings: &BillingSettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            secret_key: settings.secret_key.clone(),
        })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T, GatewayError> {
        let response = self
            .client
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let response = self
            .client
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        tracing::warn!("Stripe request failed with status {}: {}", status, message);
        Err(GatewayError::Api {
            service: SERVICE,
            status: status.as_u16(),
            message,
        })
    }
}

/// 结账会话的表单参数
fn checkout_form(request: &CheckoutRequest) -> Vec<(String, String)> {
    let price = "line_items[0][price_data]";
    vec![
        ("customer".into(), request.customer_id.clone()),
        ("mode".into(), "subscription".into()),
        ("payment_method_types[0]".into(), "card".into()),
        (format!("{}[currency]", price), request.currency.clone()),
        (
            format!("{}[product_data][name]", price),
            request.product_name.clone(),
        ),
        (
            format!("{}[product_data][description]", price),
            format!(
                "{}ly subscription to {}",
                capitalize(request.interval.as_str()),
                request.product_name
            ),
        ),
        (format!("{}[unit_amount]", price), request.amount.to_string()),
        (
            format!("{}[recurring][interval]", price),
            request.interval.as_str().into(),
        ),
        ("line_items[0][quantity]".into(), "1".into()),
        ("success_url".into(), request.success_url.clone()),
        ("cancel_url".into(), request.cancel_url.clone()),
        ("metadata[user_id]".into(), request.user_id.to_string()),
        ("metadata[plan_name]".into(), request.plan_name.clone()),
    ]
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_customer(&self, email: &str, name: &str) -> Result<String, GatewayError> {
        let form = vec![
            ("email".to_string(), email.to_string()),
            ("name".to_string(), name.to_string()),
        ];
        let customer: CustomerObject = self.post("/v1/customers", &form).await?;
        tracing::info!("Created Stripe customer {}", customer.id);
        Ok(customer.id)
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        let session: SessionObject = self
            .post("/v1/checkout/sessions", &checkout_form(request))
            .await?;
        Ok(session.into())
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, GatewayError> {
        let session: SessionObject = self
            .get(&format!("/v1/checkout/sessions/{}", session_id))
            .await?;
        Ok(session.into())
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<SubscriptionInfo, GatewayError> {
        let subscription: SubscriptionObject = self
            .get(&format!("/v1/subscriptions/{}", subscription_id))
            .await?;
        Ok(SubscriptionInfo {
            id: subscription.id,
            current_period_end: subscription.current_period_end,
        })
    }
}
