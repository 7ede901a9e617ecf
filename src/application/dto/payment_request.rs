// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;

/// 结账成功回跳的查询参数
#[derive(Debug, Default, Deserialize)]
pub struct PaymentSuccessQuery {
    pub session_id: Option<String>,
}
