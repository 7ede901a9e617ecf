// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 注册请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct SignupRequestDto {
    /// 邮箱，服务层负责格式校验与小写化
    #[serde(default)]
    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: String,
    /// 显示名称，缺省时取邮箱本地部分
    #[validate(length(max = 100, message = "Name is too long"))]
    pub name: Option<String>,
    /// 可选密码
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: Option<String>,
}

/// 登录请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct LoginRequestDto {
    #[serde(default)]
    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: String,
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: Option<String>,
    /// 为 true 时签发长效令牌
    #[serde(default)]
    pub remember: bool,
}

/// Google 回调查询参数
#[derive(Debug, Default, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// 用户拒绝授权时 Google 返回的错误码
    pub error: Option<String>,
}
