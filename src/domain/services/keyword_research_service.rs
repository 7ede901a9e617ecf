// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use metrics::counter;
use rand::Rng;
use std::sync::Arc;

use crate::domain::gateways::suggest::KeywordSuggester;
use crate::domain::models::keyword::{KeywordMetrics, Trend};
use crate::domain::models::plan::Feature;
use crate::domain::models::user::User;
use crate::domain::repositories::user_repository::UserRepository;
use crate::utils::errors::ServiceError;
use crate::utils::sanitize::sanitize_input;

const COMMERCIAL_TERMS: [&str; 6] = ["buy", "price", "cost", "cheap", "best", "review"];

/// 关键词研究服务
///
/// 获取搜索建议并为每条建议生成模拟的搜索量、难度、CPC 和趋势
pub struct KeywordResearchService {
    suggester: Arc<dyn KeywordSuggester>,
    user_repo: Arc<dyn UserRepository>,
    max_suggestions: usize,
}

impl KeywordResearchService {
    pub fn new(
        suggester: Arc<dyn KeywordSuggester>,
        user_repo: Arc<dyn UserRepository>,
        max_suggestions: usize,
    ) -> Self {
        Self {
            suggester,
            user_repo,
            max_suggestions,
        }
    }

    /// 执行关键词研究
    ///
    /// 匿名用户不受每日用量限制，也不计数
    ///
    /// # 参数
    ///
    /// * `user` - 当前登录用户（可选）
    /// * `raw_keyword` - 用户输入的关键词
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<KeywordMetrics>)` - 每条建议的指标
    /// * `Err(ServiceError::LimitReached)` - 今日查询次数已用完
    /// * `Err(ServiceError::Validation)` - 关键词为空
    pub async fn research(
        &self,
        user: Option<&User>,
        raw_keyword: &str,
    ) -> Result<Vec<KeywordMetrics>, ServiceError> {
        let now = Utc::now();
        let mut user = match user {
            Some(user) => Some(
                self.user_repo
                    .find_by_id(user.id)
                    .await?
                    .unwrap_or_else(|| user.clone()),
            ),
            None => None,
        };

        if let Some(user) = user.as_mut() {
            if user.reset_daily_usage_if_needed(now.date_naive()) {
                self.user_repo.reset_usage(user.id, now.date_naive()).await?;
            }
            if !user.can_use_feature(Feature::KeywordQueries, 0, now) {
                return Err(ServiceError::LimitReached(format!(
                    "Daily limit reached. You can perform {} keyword queries per day with your current plan.",
                    user.plan_limits(now).keyword_queries
                )));
            }
        }

        let keyword = sanitize_input(raw_keyword);
        if keyword.is_empty() {
            return Err(ServiceError::Validation("Keyword is required".to_string()));
        }

        let suggestions = self.suggestions_for(&keyword).await;
        let results = generate_metrics(&suggestions, &mut rand::rng());

        if let Some(user) = user {
            self.user_repo
                .increment_usage(user.id, Feature::KeywordQueries)
                .await?;
        }
        counter!("keyword_queries_total").increment(1);

        Ok(results)
    }

    /// 获取建议，失败时退回到固定的变体列表
    async fn suggestions_for(&self, keyword: &str) -> Vec<String> {
        match self.suggester.suggest(keyword).await {
            Ok(mut suggestions) => {
                suggestions.truncate(self.max_suggestions);
                suggestions
            }
            Err(e) => {
                tracing::warn!("Keyword suggestions unavailable for '{}': {}", keyword, e);
                fallback_suggestions(keyword)
            }
        }
    }
}

/// 建议接口不可用时的关键词变体
pub fn fallback_suggestions(keyword: &str) -> Vec<String> {
    vec![
        keyword.to_string(),
        format!("{} tips", keyword),
        format!("{} guide", keyword),
        format!("best {}", keyword),
        format!("{} tutorial", keyword),
        format!("how to {}", keyword),
        format!("{} examples", keyword),
    ]
}

/// 为建议列表生成模拟指标
///
/// 搜索量随位置递减（长尾），难度随词数增加，含商业意图词的建议 CPC 更高
pub fn generate_metrics<R: Rng + ?Sized>(suggestions: &[String], rng: &mut R) -> Vec<KeywordMetrics> {
    let base_volume: u32 = rng.random_range(500..=5000);

    suggestions
        .iter()
        .enumerate()
        .map(|(i, suggestion)| {
            let multiplier = 1.0 - i as f64 * 0.1;
            let volume = ((f64::from(base_volume) * multiplier).floor() as i64).max(50);

            let word_count = suggestion.split_whitespace().count() as u32;
            let difficulty = (20 + word_count * 10 + rng.random_range(0..=30)).min(90);

            let lower = suggestion.to_lowercase();
            let commercial = COMMERCIAL_TERMS.iter().any(|term| lower.contains(term));
            let cpc: f64 = if commercial {
                rng.random_range(1.5..8.0)
            } else {
                rng.random_range(0.3..2.0)
            };

            let roll: u32 = rng.random_range(0..100);
            let trend = if commercial {
                pick_trend(roll, [(Trend::Up, 40), (Trend::Stable, 35), (Trend::Down, 25)])
            } else if word_count >= 3 {
                pick_trend(roll, [(Trend::Stable, 50), (Trend::Up, 25), (Trend::Down, 25)])
            } else {
                pick_trend(roll, [(Trend::Up, 30), (Trend::Stable, 40), (Trend::Down, 30)])
            };

            KeywordMetrics {
                keyword: suggestion.clone(),
                search_volume: format_thousands(volume as u64),
                difficulty,
                cpc: format!("${:.2}", cpc),
                trend,
            }
        })
        .collect()
}

// Weights sum to 100
fn pick_trend(roll: u32, weights: [(Trend, u32); 3]) -> Trend {
    let mut acc = 0;
    for (trend, weight) in weights {
        acc += weight;
        if roll < acc {
            return trend;
        }
    }
    weights[2].0
}

/// 千分位格式化，如 `12345` -> `12,345`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
