// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户追踪的关键词
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedKeyword {
    pub id: Uuid,
    pub user_id: Uuid,
    pub keyword: String,
    /// 已去掉协议和 `www.` 的域名
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

impl TrackedKeyword {
    pub fn new(user_id: Uuid, keyword: String, domain: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            keyword,
            domain,
            created_at: Utc::now(),
        }
    }
}

/// 一次排名观测
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ranking {
    pub id: Uuid,
    pub keyword_id: Uuid,
    /// 未能检测到排名时为空
    pub position: Option<i32>,
    pub url: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl Ranking {
    pub fn observe(keyword: &TrackedKeyword, position: Option<i32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            keyword_id: keyword.id,
            position,
            url: Some(format!("https://{}", keyword.domain)),
            checked_at: Utc::now(),
        }
    }
}

/// 带最新排名的追踪关键词
#[derive(Debug, Clone, Serialize)]
pub struct KeywordWithRanking {
    pub id: Uuid,
    pub keyword: String,
    pub domain: String,
    pub position: Option<i32>,
    pub last_checked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl KeywordWithRanking {
    pub fn new(keyword: TrackedKeyword, latest: Option<Ranking>) -> Self {
        Self {
            id: keyword.id,
            keyword: keyword.keyword,
            domain: keyword.domain,
            position: latest.as_ref().and_then(|r| r.position),
            last_checked: latest.map(|r| r.checked_at),
            created_at: keyword.created_at,
        }
    }
}

/// 搜索趋势
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Stable,
    Down,
}

/// 关键词研究结果中的单条指标
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordMetrics {
    pub keyword: String,
    /// 千分位格式，如 `1,234`
    pub search_volume: String,
    pub difficulty: u32,
    /// 如 `$1.23`
    pub cpc: String,
    pub trend: Trend,
}
