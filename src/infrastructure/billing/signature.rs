// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Stripe webhook 签名校验
//!
//! 签名头格式为 `t=<unix 秒>,v1=<hex>[,v1=<hex>...]`，签名内容为 `"{t}.{payload}"` 的 HMAC-SHA256。

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::config::settings::BillingSettings;
use crate::domain::gateways::payment::WebhookVerifier;
use crate::domain::gateways::GatewayError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing signature header")]
    MissingHeader,
    #[error("Malformed signature header")]
    Malformed,
    #[error("Timestamp outside the tolerance zone")]
    Expired,
    #[error("No signatures found matching the expected signature for payload")]
    NoMatch,
}

fn mac_for(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC can take key of any size"),
    };
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

/// 为负载生成签名
pub fn generate_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    hex::encode(mac_for(secret, timestamp, payload).finalize().into_bytes())
}

/// 生成完整的签名头
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!(
        "t={},v1={}",
        timestamp,
        generate_signature(secret, timestamp, payload)
    )
}

/// 校验签名头
///
/// # 参数
///
/// * `payload` - 原始请求体
/// * `header` - `Stripe-Signature` 头
/// * `secret` - webhook 签名密钥
/// * `tolerance_secs` - 允许的时间偏差
/// * `now` - 当前 Unix 时间
pub fn verify(
    payload: &[u8],
    header: Option<&str>,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::MissingHeader)?;

    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse::<i64>().map_err(|_| SignatureError::Malformed)?)
            }
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if signatures.is_empty() {
        return Err(SignatureError::NoMatch);
    }

    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| {
                mac_for(secret, timestamp, payload)
                    .verify_slice(&bytes)
                    .is_ok()
            })
            .unwrap_or(false)
    });
    if !matched {
        return Err(SignatureError::NoMatch);
    }

    if tolerance_secs > 0 && (now - timestamp).abs() > tolerance_secs {
        return Err(SignatureError::Expired);
    }

    Ok(())
}

/// 基于共享密钥的 Stripe webhook 校验器
#[derive(Debug, Clone)]
pub struct StripeWebhookVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl StripeWebhookVerifier {
    pub fn new(settings: &BillingSettings) -> Self {
        Self {
            secret: settings.webhook_secret.clone(),
            tolerance_secs: settings.webhook_tolerance_secs,
        }
    }
}

impl WebhookVerifier for StripeWebhookVerifier {
    fn verify(&self, payload: &[u8], header: Option<&str>, now: i64) -> Result<(), GatewayError> {
        verify(payload, header, &self.secret, self.tolerance_secs, now)
            .map_err(|e| GatewayError::InvalidSignature(e.to_string()))
    }
}
