// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use super::GatewayError;

/// 关键词建议来源
#[async_trait]
pub trait KeywordSuggester: Send + Sync {
    /// 返回与 `keyword` 相关的搜索建议
    async fn suggest(&self, keyword: &str) -> Result<Vec<String>, GatewayError>;
}
