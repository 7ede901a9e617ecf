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

use crate::config::settings::AnalyzerSettings;
use crate::engines::traits::{EngineError, FetchRequest, FetchedPage, PageFetcher};
use crate::engines::validators;
use async_trait::async_trait;
use std::time::Instant;

const MAX_REDIRECTS: usize = 5;

/// 抓取引擎
///
/// 基于reqwest实现的HTTP页面抓取引擎，带 SSRF 保护与响应体大小上限
pub struct ReqwestEngine {
    client: reqwest::Client,
    ssrf_protection: bool,
    max_body_bytes: usize,
}

impl ReqwestEngine {
    /// 按页面分析配置创建引擎
    pub fn new(settings: &AnalyzerSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            ssrf_protection: settings.ssrf_protection,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    /// 发送请求并逐跳跟随重定向
    ///
    /// 开启 SSRF 保护时每个重定向目标都会重新校验；初始URL由调用方校验
    async fn follow_redirects(
        &self,
        request: &FetchRequest,
    ) -> Result<reqwest::Response, EngineError> {
        let mut url = request.url.clone();

        for hop in 0..=MAX_REDIRECTS {
            if hop > 0 && self.ssrf_protection {
                validators::validate_url(&url)
                    .await
                    .map_err(|e| EngineError::Blocked(e.to_string()))?;
            }

            let response = self
                .client
                .get(&url)
                .timeout(request.timeout)
                .send()
                .await?;
            if !response.status().is_redirection() {
                return Ok(response);
            }

            let Some(location) = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
            else {
                return Ok(response);
            };
            url = response
                .url()
                .join(location)
                .map_err(|e| EngineError::Other(format!("Invalid redirect target: {}", e)))?
                .to_string();
            tracing::debug!("Following redirect to {}", url);
        }

        Err(EngineError::Other(format!(
            "Too many redirects (max {})",
            MAX_REDIRECTS
        )))
    }
}

#[async_trait]
impl PageFetcher for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 2xx 响应的页面内容
    /// * `Err(EngineError)` - 被拦截、非 2xx、超时、响应过大或重定向过多
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, EngineError> {
        if self.ssrf_protection {
            validators::validate_url(&request.url)
                .await
                .map_err(|e| EngineError::Blocked(e.to_string()))?;
        }

        let start = Instant::now();
        let mut response = self.follow_redirects(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::HttpStatus(status.as_u16()));
        }

        if response
            .content_length()
            .is_some_and(|len| len as usize > self.max_body_bytes)
        {
            return Err(EngineError::BodyTooLarge(self.max_body_bytes));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("text/html")
            .to_string();

        // Chunked bodies carry no length header
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            if body.len() > self.max_body_bytes {
                return Err(EngineError::BodyTooLarge(self.max_body_bytes));
            }
        }

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content: String::from_utf8_lossy(&body).into_owned(),
            content_type,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
