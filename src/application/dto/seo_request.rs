// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// SEO 分析请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct SeoAnalysisRequestDto {
    /// 待分析页面，缺少协议时按 https 处理
    #[serde(default)]
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub url: String,
}
