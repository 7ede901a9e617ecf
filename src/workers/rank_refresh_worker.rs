// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::services::account_service::AccountService;
use crate::domain::services::rank_tracker::RankTracker;
use crate::utils::errors::WorkerError;

/// 排名刷新工作器
///
/// 定期为所有追踪关键词记录新的排名，并清理过期的访问令牌
pub struct RankRefreshWorker {
    tracker: Arc<RankTracker>,
    accounts: Arc<AccountService>,
    interval: Duration,
}

/// 单轮运行的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub rankings_recorded: usize,
    pub tokens_purged: u64,
}

impl RankRefreshWorker {
    pub fn new(tracker: Arc<RankTracker>, accounts: Arc<AccountService>, interval: Duration) -> Self {
        Self {
            tracker,
            accounts,
            interval,
        }
    }

    /// 运行工作器
    ///
    /// 第一次刷新在一个间隔之后执行
    pub async fn run(&self) {
        info!(
            "Rank refresh worker started (interval {}s)",
            self.interval.as_secs()
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.tick().await;

        loop {
            interval.tick().await;

            match self.run_once().await {
                Ok(summary) => info!(
                    "Recorded {} rankings, purged {} expired tokens",
                    summary.rankings_recorded, summary.tokens_purged
                ),
                Err(e) => error!("Rank refresh failed: {}", e),
            }
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// 执行一轮刷新
    pub async fn run_once(&self) -> Result<RefreshSummary, WorkerError> {
        let rankings_recorded = self.tracker.refresh_all().await?;
        let tokens_purged = self.accounts.purge_expired_tokens().await?;
        Ok(RefreshSummary {
            rankings_recorded,
            tokens_purged,
        })
    }
}

#[cfg(test)]
#[path = "rank_refresh_worker_test.rs"]
mod tests;
