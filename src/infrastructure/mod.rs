// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 领域层抽象接口的具体实现，以及与外部系统的交互。
///
/// 包含的子模块：
/// - 计费（billing）：Stripe REST 客户端与 webhook 签名校验
/// - 数据库（database）：数据库连接和实体映射
/// - 身份（identity）：Google OAuth 客户端
/// - 指标（metrics）：Prometheus 导出
/// - 仓库实现（repositories）：基于 sea-orm 的仓库实现
/// - 关键词建议（suggest）：Google 自动补全客户端
pub mod billing;
pub mod database;
pub mod identity;
pub mod metrics;
pub mod repositories;
pub mod suggest;
