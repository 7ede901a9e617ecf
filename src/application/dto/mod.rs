// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 HTTP 请求体与查询参数
pub mod auth_request;
pub mod keyword_request;
pub mod payment_request;
pub mod seo_request;
