// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 订阅套餐
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Trial,
    Starter,
    Professional,
}

impl Plan {
    /// 套餐对应的用量上限
    pub fn limits(&self) -> PlanLimits {
        match self {
            Plan::Trial => PlanLimits {
                keyword_queries: 50,
                seo_reports: 20,
                tracked_keywords: 100,
            },
            // Weekly billing
            Plan::Starter => PlanLimits {
                keyword_queries: 25,
                seo_reports: 5,
                tracked_keywords: 10,
            },
            // Monthly billing
            Plan::Professional => PlanLimits {
                keyword_queries: 500,
                seo_reports: 50,
                tracked_keywords: 100,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Trial => "trial",
            Plan::Starter => "starter",
            Plan::Professional => "professional",
        }
    }

    /// 从存储值解析套餐，无法识别的值按 Starter 处理
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or(Plan::Starter)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(Plan::Trial),
            "starter" => Ok(Plan::Starter),
            "professional" => Ok(Plan::Professional),
            other => Err(format!("Unknown plan: {}", other)),
        }
    }
}

/// 套餐用量上限，`-1` 表示不限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub keyword_queries: i32,
    pub seo_reports: i32,
    pub tracked_keywords: i32,
}

impl PlanLimits {
    pub const UNLIMITED: i32 = -1;

    /// 指定功能的上限
    pub fn limit_for(&self, feature: Feature) -> i32 {
        match feature {
            Feature::KeywordQueries => self.keyword_queries,
            Feature::SeoReports => self.seo_reports,
            Feature::TrackedKeywords => self.tracked_keywords,
        }
    }

    /// 当前用量是否仍低于上限
    pub fn allows(&self, feature: Feature, used: i64) -> bool {
        let limit = self.limit_for(feature);
        limit == Self::UNLIMITED || used < i64::from(limit)
    }
}

/// 受套餐限制的功能
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    KeywordQueries,
    SeoReports,
    TrackedKeywords,
}

/// 订阅状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trialing,
    Active,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    pub fn from_stored(value: &str) -> Self {
        match value {
            "active" => SubscriptionStatus::Active,
            "past_due" => SubscriptionStatus::PastDue,
            "canceled" => SubscriptionStatus::Canceled,
            _ => SubscriptionStatus::Trialing,
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 计费周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Week,
    Month,
}

impl BillingInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Week => "week",
            BillingInterval::Month => "month",
        }
    }
}

/// 可购买套餐的价格信息
#[derive(Debug, Clone, Serialize)]
pub struct PlanOffer {
    pub plan: Plan,
    pub name: &'static str,
    /// 金额（美分）
    pub amount: i64,
    pub interval: BillingInterval,
    pub limits: PlanLimits,
}

impl PlanOffer {
    /// 可订阅的套餐目录
    pub fn catalogue() -> Vec<PlanOffer> {
        vec![
            PlanOffer {
                plan: Plan::Starter,
                name: "Starter Plan",
                amount: 900,
                interval: BillingInterval::Week,
                limits: Plan::Starter.limits(),
            },
            PlanOffer {
                plan: Plan::Professional,
                name: "Professional Plan",
                amount: 2900,
                interval: BillingInterval::Month,
                limits: Plan::Professional.limits(),
            },
        ]
    }

    /// 按套餐名查找，只有付费套餐可订阅
    pub fn find(plan_name: &str) -> Option<PlanOffer> {
        Self::catalogue()
            .into_iter()
            .find(|offer| offer.plan.as_str() == plan_name)
    }

    /// 形如 `$9.00` 的价格
    pub fn display_price(&self) -> String {
        format!("${}.{:02}", self.amount / 100, self.amount % 100)
    }
}
