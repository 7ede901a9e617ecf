// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 请求处理器模块
///
/// 每个处理器只负责解析请求、调用服务并返回 JSON
pub mod auth_handler;
pub mod billing_handler;
pub mod dashboard_handler;
pub mod keyword_handler;
pub mod seo_handler;
