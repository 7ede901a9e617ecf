// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;

use crate::config::settings::OAuthSettings;
use crate::domain::gateways::identity::{IdentityProfile, IdentityProvider};
use crate::domain::gateways::GatewayError;

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "google-oauth";
const SCOPE: &str = "openid email profile";

/// `state` 参数的最长有效期（秒）
pub const STATE_MAX_AGE_SECS: i64 = 600;

#[derive(Serialize)]
struct AuthorizeQuery<'a> {
    client_id: &'a str,
    redirect_uri: &'a str,
    response_type: &'a str,
    scope: &'a str,
    state: &'a str,
    access_type: &'a str,
    prompt: &'a str,
}

#[derive(Serialize)]
struct TokenForm<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google OAuth 2.0 客户端
///
/// 授权码流程：构造授权地址、用授权码换取访问令牌、读取用户信息
pub struct GoogleOAuthClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    authorize_url: String,
    token_url: String,
    userinfo_url: String,
    redirect_uri: String,
}

impl GoogleOAuthClient {
    /// 创建客户端
    ///
    /// # 参数
    ///
    /// * `settings` - OAuth 配置，缺少客户端凭据时返回 `NotConfigured`
    /// * `public_url` - 对外访问地址，用于拼接回调地址
    pub fn new(settings: &OAuthSettings, public_url: &str) -> Result<Self, GatewayError> {
        let (Some(client_id), Some(client_secret)) = (
            settings.google_client_id.clone().filter(|v| !v.is_empty()),
            settings.google_client_secret.clone().filter(|v| !v.is_empty()),
        ) else {
            return Err(GatewayError::NotConfigured("Google OAuth"));
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            client_id,
            client_secret,
            authorize_url: settings.authorize_url.clone(),
            token_url: settings.token_url.clone(),
            userinfo_url: settings.userinfo_url.clone(),
            redirect_uri: format!("{}/auth/google/callback", public_url.trim_end_matches('/')),
        })
    }

    async fn fail(response: reqwest::Response) -> GatewayError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        GatewayError::Api {
            service: SERVICE,
            status,
            message,
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        let query = serde_urlencoded::to_string(AuthorizeQuery {
            client_id: &self.client_id,
            redirect_uri: &self.redirect_uri,
            response_type: "code",
            scope: SCOPE,
            state,
            access_type: "online",
            prompt: "select_account",
        })
        .unwrap_or_default();
        format!("{}?{}", self.authorize_url, query)
    }

    async fn exchange_code(&self, code: &str) -> Result<IdentityProfile, GatewayError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&TokenForm {
                code,
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                redirect_uri: &self.redirect_uri,
                grant_type: "authorization_code",
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        let token: TokenResponse = response.json().await?;

        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        let profile: IdentityProfile = response.json().await?;
        tracing::debug!("Google profile received for {}", profile.sub);
        Ok(profile)
    }
}

fn state_mac(secret: &str, message: &str) -> HmacSha256 {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC can take key of any size"),
    };
    mac.update(message.as_bytes());
    mac
}

/// 生成带签名的 `state`：`{时间戳}.{随机数}.{签名}`
pub fn sign_state(secret: &str, now: i64) -> String {
    let nonce = hex::encode(rand::random::<[u8; 16]>());
    let message = format!("{}.{}", now, nonce);
    let signature = hex::encode(state_mac(secret, &message).finalize().into_bytes());
    format!("{}.{}", message, signature)
}

/// 校验 `state` 的签名与有效期
pub fn verify_state(secret: &str, state: &str, now: i64) -> bool {
    let mut parts = state.splitn(3, '.');
    let (Some(ts), Some(nonce), Some(signature)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(issued_at) = ts.parse::<i64>() else {
        return false;
    };
    if now - issued_at > STATE_MAX_AGE_SECS || issued_at > now {
        return false;
    }
    let Ok(signature) = hex::decode(signature) else {
        return false;
    };

    state_mac(secret, &format!("{}.{}", ts, nonce))
        .verify_slice(&signature)
        .is_ok()
}
