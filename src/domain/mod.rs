// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// - 领域模型（models）：用户、套餐、关键词、SEO 分析
/// - 外部网关（gateways）：关键词建议、支付、身份提供方的抽象
/// - 仓库接口（repositories）：数据持久化抽象接口
/// - 服务（services）：业务规则
pub mod gateways;
pub mod models;
pub mod repositories;
pub mod services;
