// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - SEO 评分（seo_scorer）：纯函数，从 HTML 提取信号并打分
/// - SEO 审计服务（seo_audit_service）：抓取页面、评分、按天缓存
/// - 关键词研究服务（keyword_research_service）：建议词与模拟指标
/// - 排名追踪（rank_tracker）：追踪关键词、排名历史、CSV 导出
/// - 账户服务（account_service）：注册登录、访问令牌、仪表盘
/// - 计费服务（billing_service）：订阅结账与 webhook 事件
pub mod account_service;
pub mod billing_service;
pub mod keyword_research_service;
pub mod rank_tracker;
pub mod seo_audit_service;
pub mod seo_scorer;

#[cfg(test)]
pub mod test_support;
