// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 关键词建议来源实现
pub mod google_suggest;

pub use google_suggest::GoogleSuggestClient;
