// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::settings::SuggestSettings;
use crate::domain::gateways::suggest::KeywordSuggester;
use crate::domain::gateways::GatewayError;

/// Google 自动补全客户端
///
/// 响应格式为 `["query", ["建议1", "建议2", ...]]`
pub struct GoogleSuggestClient {
    client: reqwest::Client,
    endpoint: String,
    max_suggestions: usize,
}

impl GoogleSuggestClient {
    pub fn new(settings: &SuggestSettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            max_suggestions: settings.max_suggestions,
        })
    }
}

#[async_trait]
impl KeywordSuggester for GoogleSuggestClient {
    async fn suggest(&self, keyword: &str) -> Result<Vec<String>, GatewayError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("client", "firefox"), ("q", keyword)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Api {
                service: "google-suggest",
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        // Body may not be valid UTF-8 for some locales
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_str(&String::from_utf8_lossy(&bytes))
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        let suggestions = body
            .get(1)
            .and_then(Value::as_array)
            .ok_or_else(|| GatewayError::Decode("missing suggestion list".to_string()))?
            .iter()
            .filter_map(Value::as_str)
            .take(self.max_suggestions)
            .map(str::to_string)
            .collect::<Vec<_>>();

        tracing::debug!("{} suggestions for '{}'", suggestions.len(), keyword);
        Ok(suggestions)
    }
}
