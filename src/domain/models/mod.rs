// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 用户与套餐、访问令牌、追踪关键词与排名、SEO 分析记录
pub mod api_token;
pub mod keyword;
pub mod plan;
pub mod seo_analysis;
pub mod user;
