// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::Deserialize;

use super::GatewayError;

/// 身份提供方返回的用户资料
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityProfile {
    /// 提供方内的用户标识
    #[serde(alias = "id")]
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
}

/// OAuth 身份提供方
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 构造授权跳转地址
    fn authorization_url(&self, state: &str) -> String;

    /// 用授权码换取用户资料
    async fn exchange_code(&self, code: &str) -> Result<IdentityProfile, GatewayError>;
}
