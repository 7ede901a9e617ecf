// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::services::seo_scorer::SeoReport;

/// 已持久化的 SEO 分析结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoAnalysisRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub h1_tags: Vec<String>,
    pub word_count: i32,
    pub analysis_score: i32,
    pub issues: Vec<String>,
    /// 完整报告，旧记录可能缺失
    pub report: Option<SeoReport>,
    pub created_at: DateTime<Utc>,
}

impl SeoAnalysisRecord {
    pub fn from_report(user_id: Uuid, report: &SeoReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            url: report.url.clone(),
            title: report.title.clone(),
            meta_description: report.meta_description.clone(),
            h1_tags: report.h1_tags.clone(),
            word_count: report.word_count as i32,
            analysis_score: report.score as i32,
            issues: report.issues.clone(),
            report: Some(report.clone()),
            created_at: Utc::now(),
        }
    }

    /// 记录是否在 `now` 当天（UTC）生成
    pub fn is_from_same_day(&self, now: DateTime<Utc>) -> bool {
        self.created_at.date_naive() == now.date_naive()
    }
}

/// 仪表盘中展示的分析摘要
#[derive(Debug, Clone, Serialize)]
pub struct SeoAnalysisSummary {
    pub id: Uuid,
    pub url: String,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&SeoAnalysisRecord> for SeoAnalysisSummary {
    fn from(record: &SeoAnalysisRecord) -> Self {
        Self {
            id: record.id,
            url: record.url.clone(),
            score: record.analysis_score,
            created_at: record.created_at,
        }
    }
}
