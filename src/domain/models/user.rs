// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::plan::{Feature, Plan, PlanLimits, SubscriptionStatus};

/// 用户实体
///
/// 包含身份信息、套餐、计费 ID 以及每日用量计数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// OAuth 用户没有密码
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub plan: Plan,
    pub trial_end: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub subscription_status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
    pub daily_keyword_queries: i32,
    pub daily_seo_reports: i32,
    pub last_usage_reset: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 创建处于试用期的新用户
    ///
    /// # 参数
    ///
    /// * `email` - 已规范化的邮箱
    /// * `name` - 显示名称
    /// * `trial_days` - 试用天数
    /// * `now` - 当前时间
    pub fn new_trial(email: String, name: String, trial_days: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash: None,
            google_id: None,
            plan: Plan::Trial,
            trial_end: Some(now + Duration::days(trial_days)),
            is_active: true,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            subscription_status: SubscriptionStatus::Trialing,
            current_period_end: None,
            daily_keyword_queries: 0,
            daily_seo_reports: 0,
            last_usage_reset: now.date_naive(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_trial_active(&self, now: DateTime<Utc>) -> bool {
        self.trial_end.is_some_and(|end| now < end)
    }

    /// 当前生效的套餐：试用期内始终为 Trial
    pub fn effective_plan(&self, now: DateTime<Utc>) -> Plan {
        if self.is_trial_active(now) {
            Plan::Trial
        } else {
            self.plan
        }
    }

    pub fn plan_limits(&self, now: DateTime<Utc>) -> PlanLimits {
        self.effective_plan(now).limits()
    }

    /// 专业版且不在试用期
    pub fn is_professional(&self, now: DateTime<Utc>) -> bool {
        self.plan == Plan::Professional && !self.is_trial_active(now)
    }

    pub fn can_export_csv(&self, now: DateTime<Utc>) -> bool {
        self.is_professional(now) || self.is_trial_active(now)
    }

    /// 是否可查看超过 7 天的历史排名
    pub fn can_access_historical_data(&self, now: DateTime<Utc>) -> bool {
        self.is_professional(now) || self.is_trial_active(now)
    }

    pub fn plan_display_name(&self, now: DateTime<Utc>) -> &'static str {
        if self.is_trial_active(now) {
            "Trial"
        } else if self.plan == Plan::Professional {
            "Professional"
        } else {
            "Starter"
        }
    }

    /// 跨天时清零每日用量
    ///
    /// # 返回值
    ///
    /// 发生重置时返回 true，调用方需要持久化
    pub fn reset_daily_usage_if_needed(&mut self, today: NaiveDate) -> bool {
        if self.last_usage_reset == today {
            return false;
        }
        self.daily_keyword_queries = 0;
        self.daily_seo_reports = 0;
        self.last_usage_reset = today;
        true
    }

    /// 检查功能用量是否仍在套餐上限内
    ///
    /// 调用前应先执行 [`User::reset_daily_usage_if_needed`]
    ///
    /// # 参数
    ///
    /// * `feature` - 功能
    /// * `tracked_keywords` - 当前已追踪的关键词数量
    /// * `now` - 当前时间
    pub fn can_use_feature(&self, feature: Feature, tracked_keywords: u64, now: DateTime<Utc>) -> bool {
        let limits = self.plan_limits(now);
        let used = match feature {
            Feature::KeywordQueries => i64::from(self.daily_keyword_queries),
            Feature::SeoReports => i64::from(self.daily_seo_reports),
            Feature::TrackedKeywords => tracked_keywords as i64,
        };
        limits.allows(feature, used)
    }

    /// 将计费状态切换为已付费的套餐
    pub fn activate_plan(&mut self, plan: Plan) {
        self.plan = plan;
        self.subscription_status = SubscriptionStatus::Active;
    }
}
