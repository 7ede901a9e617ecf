// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非 2xx 响应
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    /// 目标地址被 SSRF 保护拦截
    #[error("Blocked: {0}")]
    Blocked(String),
    /// 响应体超过上限
    #[error("Response body exceeds {0} bytes")]
    BodyTooLarge(usize),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => e.is_timeout() || e.is_connect(),
            EngineError::HttpStatus(code) => *code >= 500,
            _ => false,
        }
    }
}

/// 页面抓取请求
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// 目标URL
    pub url: String,
    /// 超时时间
    pub timeout: Duration,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

/// 抓取到的页面
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 跟随重定向后的最终URL
    pub final_url: String,
    /// HTTP状态码
    pub status_code: u16,
    /// 响应内容
    pub content: String,
    /// 内容类型
    pub content_type: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 页面抓取特质
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取页面 HTML
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
