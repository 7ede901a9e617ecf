// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 页面 SEO 评分
//!
//! 从 HTML 中提取结构信号，按固定扣分规则得出 0-100 的分数以及问题和建议列表。
//! 纯函数，不做任何 I/O。

use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};
use serde::{Deserialize, Serialize};

static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static H1: Lazy<Selector> = Lazy::new(|| selector("h1"));
static H2: Lazy<Selector> = Lazy::new(|| selector("h2"));
static H3: Lazy<Selector> = Lazy::new(|| selector("h3"));
static IMG: Lazy<Selector> = Lazy::new(|| selector("img"));

// Static selectors are known-good; parsing cannot fail
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| unreachable!("invalid static selector {css}"))
}

const START_SCORE: i32 = 100;
const TITLE_MIN: usize = 30;
const TITLE_MAX: usize = 60;
const META_MIN: usize = 120;
const META_MAX: usize = 160;
const THIN_CONTENT_WORDS: usize = 300;
const LONG_CONTENT_WORDS: usize = 2000;
const MAX_URL_LENGTH: usize = 100;
const ALT_PENALTY_PER_IMAGE: i32 = 2;
const ALT_PENALTY_CAP: i32 = 15;

const RESTRICTED_ISSUES: usize = 5;
const RESTRICTED_RECOMMENDATIONS: usize = 3;
const FULL_H2: usize = 5;
const FULL_H3: usize = 3;

pub const UPGRADE_MESSAGE: &str = "Upgrade to Professional for complete SEO analysis including all heading tags, detailed recommendations, and advanced insights.";

/// 从页面中提取的结构信号
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    pub title: String,
    pub meta_description: String,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub h3_tags: Vec<String>,
    /// 长度大于 2 个字符的词数
    pub word_count: usize,
    pub image_count: usize,
    pub images_without_alt: usize,
}

/// 评分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    /// 0..=100
    pub score: u32,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// 返回给客户端的 SEO 报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoReport {
    pub url: String,
    pub title: String,
    pub title_length: usize,
    pub meta_description: String,
    pub meta_description_length: usize,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub h3_tags: Vec<String>,
    pub word_count: usize,
    pub image_count: usize,
    pub images_without_alt: usize,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub score: u32,
    pub limited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_message: Option<String>,
}

fn element_text<'a>(element: scraper::ElementRef<'a>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// 提取页面结构信号
///
/// 词数统计排除 `<script>` 和 `<style>` 中的文本，文本节点直接拼接，不插入分隔符
pub fn extract_signals(html: &str) -> PageSignals {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let meta_description = document
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    let h1_tags: Vec<String> = document.select(&H1).map(element_text).collect();
    let h2_tags: Vec<String> = document.select(&H2).map(element_text).collect();
    let h3_tags: Vec<String> = document.select(&H3).map(element_text).collect();

    let mut text = String::new();
    for node in document.tree.root().descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| matches!(el.name(), "script" | "style"))
        });
        if !hidden {
            text.push_str(chunk);
        }
    }
    let word_count = text
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .count();

    let mut image_count = 0;
    let mut images_without_alt = 0;
    for img in document.select(&IMG) {
        image_count += 1;
        if img.value().attr("alt").map_or(true, str::is_empty) {
            images_without_alt += 1;
        }
    }

    PageSignals {
        title,
        meta_description,
        h1_tags,
        h2_tags,
        h3_tags,
        word_count,
        image_count,
        images_without_alt,
    }
}

/// 按扣分规则评分
///
/// 问题按 标题、描述、H1、内容长度、图片 alt、URL 的顺序输出
pub fn score_signals(url: &str, signals: &PageSignals) -> ScoreCard {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();
    let mut score = START_SCORE;

    let title_len = signals.title.chars().count();
    let meta_len = signals.meta_description.chars().count();

    if title_len == 0 {
        issues.push("Missing title tag".to_string());
        score -= 20;
    } else if title_len < TITLE_MIN {
        issues.push("Title tag too short (< 30 characters)".to_string());
        score -= 10;
    } else if title_len > TITLE_MAX {
        issues.push("Title tag too long (> 60 characters)".to_string());
        score -= 5;
    }

    if meta_len == 0 {
        issues.push("Missing meta description".to_string());
        score -= 15;
    } else if meta_len < META_MIN {
        issues.push("Meta description too short (< 120 characters)".to_string());
        score -= 10;
    } else if meta_len > META_MAX {
        issues.push("Meta description too long (> 160 characters)".to_string());
        score -= 5;
    }

    match signals.h1_tags.len() {
        0 => {
            issues.push("Missing H1 tag".to_string());
            score -= 15;
        }
        1 => {}
        _ => {
            issues.push("Multiple H1 tags found".to_string());
            score -= 10;
        }
    }

    if signals.word_count < THIN_CONTENT_WORDS {
        issues.push("Content too short (< 300 words)".to_string());
        score -= 10;
    } else if signals.word_count > LONG_CONTENT_WORDS {
        recommendations.push("Consider breaking up long content".to_string());
    }

    if signals.images_without_alt > 0 {
        issues.push(format!(
            "{} images missing alt attributes",
            signals.images_without_alt
        ));
        let missing = i32::try_from(signals.images_without_alt).unwrap_or(i32::MAX);
        score -= missing.saturating_mul(ALT_PENALTY_PER_IMAGE).min(ALT_PENALTY_CAP);
    }

    if url.chars().count() > MAX_URL_LENGTH {
        issues.push("URL is very long".to_string());
        score -= 5;
    }

    if title_len < 50 {
        recommendations.push("Consider making title more descriptive".to_string());
    }
    if meta_len < 140 {
        recommendations.push("Expand meta description to 140-160 characters".to_string());
    }
    if signals.word_count < 500 {
        recommendations.push("Add more content to improve SEO value".to_string());
    }
    if signals.h2_tags.len() < 2 {
        recommendations.push("Add more H2 headings to structure content".to_string());
    }

    ScoreCard {
        score: score.max(0) as u32,
        issues,
        recommendations,
    }
}

/// 组装完整报告
///
/// H2 最多保留 5 个，H3 最多保留 3 个
pub fn build_report(url: &str, signals: PageSignals, card: ScoreCard) -> SeoReport {
    let title_length = signals.title.chars().count();
    let meta_description_length = signals.meta_description.chars().count();

    let mut h2_tags = signals.h2_tags;
    h2_tags.truncate(FULL_H2);
    let mut h3_tags = signals.h3_tags;
    h3_tags.truncate(FULL_H3);

    SeoReport {
        url: url.to_string(),
        title: signals.title,
        title_length,
        meta_description: signals.meta_description,
        meta_description_length,
        h1_tags: signals.h1_tags,
        h2_tags,
        h3_tags,
        word_count: signals.word_count,
        image_count: signals.image_count,
        images_without_alt: signals.images_without_alt,
        issues: card.issues,
        recommendations: card.recommendations,
        score: card.score,
        limited: false,
        upgrade_message: None,
    }
}

/// 按访问级别裁剪报告
///
/// `full_access` 为 false 时只保留第一个 H1、不含 H2/H3、最多 5 个问题和 3 条建议
pub fn gate_report(mut report: SeoReport, full_access: bool) -> SeoReport {
    if full_access {
        return report;
    }

    report.h1_tags.truncate(1);
    report.h2_tags.clear();
    report.h3_tags.clear();
    report.issues.truncate(RESTRICTED_ISSUES);
    report.recommendations.truncate(RESTRICTED_RECOMMENDATIONS);
    report.limited = true;
    report.upgrade_message = Some(UPGRADE_MESSAGE.to_string());
    report
}

/// 分析一份 HTML 文档
///
/// # 参数
///
/// * `url` - 页面URL（参与长度评分）
/// * `html` - 页面内容
/// * `full_access` - 是否返回完整报告
pub fn analyze_document(url: &str, html: &str, full_access: bool) -> SeoReport {
    let signals = extract_signals(html);
    let card = score_signals(url, &signals);
    gate_report(build_report(url, signals, card), full_access)
}

#[cfg(test)]
#[path = "seo_scorer_test.rs"]
mod tests;
