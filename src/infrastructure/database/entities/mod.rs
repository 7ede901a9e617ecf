// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 使用SeaORM框架进行对象关系映射，表结构由 migration 包维护
pub mod api_token;
pub mod ranking;
pub mod seo_analysis;
pub mod tracked_keyword;
pub mod user;
