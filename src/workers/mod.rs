// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 后台周期任务：刷新关键词排名、清理过期令牌
pub mod rank_refresh_worker;

pub use rank_refresh_worker::RankRefreshWorker;
