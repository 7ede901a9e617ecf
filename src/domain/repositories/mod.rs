// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 领域层只依赖这些接口，具体实现由基础设施层基于 sea-orm 提供：
/// - 用户仓库（user_repository）
/// - 访问令牌仓库（api_token_repository）
/// - 追踪关键词与排名仓库（keyword_repository）
/// - SEO 分析仓库（seo_analysis_repository）
pub mod api_token_repository;
pub mod keyword_repository;
pub mod seo_analysis_repository;
pub mod user_repository;
