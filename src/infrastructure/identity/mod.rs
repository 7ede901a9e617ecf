// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 身份提供方实现
pub mod google_oauth;

pub use google_oauth::GoogleOAuthClient;
