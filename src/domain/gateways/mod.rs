// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 外部服务网关接口
///
/// 关键词建议、支付处理、webhook 签名校验和身份提供方的抽象，具体实现位于基础设施层
pub mod identity;
pub mod payment;
pub mod suggest;

use thiserror::Error;

/// 网关调用错误
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// 网络错误或超时
    #[error("Network error: {0}")]
    Network(String),
    /// 对方返回了错误响应
    #[error("{service} returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },
    /// 响应无法解析
    #[error("Invalid response: {0}")]
    Decode(String),
    /// 未配置
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    /// 回调签名校验失败
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}
