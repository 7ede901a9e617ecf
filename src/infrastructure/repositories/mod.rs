// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 基于 sea-orm 的领域仓库接口实现
pub mod api_token_repo_impl;
pub mod keyword_repo_impl;
pub mod seo_analysis_repo_impl;
pub mod user_repo_impl;

pub use api_token_repo_impl::ApiTokenRepositoryImpl;
pub use keyword_repo_impl::KeywordRepositoryImpl;
pub use seo_analysis_repo_impl::SeoAnalysisRepositoryImpl;
pub use user_repo_impl::UserRepositoryImpl;
