// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 关键词研究请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct KeywordResearchRequestDto {
    #[serde(default)]
    #[validate(length(max = 200, message = "Keyword is too long"))]
    pub keyword: String,
}

/// 新增追踪关键词请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct AddKeywordRequestDto {
    #[serde(default)]
    #[validate(length(max = 200, message = "Keyword is too long"))]
    pub keyword: String,
    /// 目标域名，可带协议
    #[serde(default)]
    #[validate(length(max = 255, message = "Domain is too long"))]
    pub domain: String,
}
