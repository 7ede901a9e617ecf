// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rankscope::domain::services::seo_scorer::analyze_document;

fn page(title: &str, description: &str, body_words: usize, extra: &str) -> String {
    let body = vec!["content"; body_words].join(" ");
    format!(
        r#"<html><head><title>{}</title><meta name="description" content="{}"></head>
<body><h1>Main heading</h1><h2>First</h2><h2>Second</h2><p>{}</p>{}</body></html>"#,
        title, description, body, extra
    )
}

#[test]
fn test_well_formed_page_scores_full_marks() {
    let title = "A descriptive page title that is long enough ok";
    let description = "d".repeat(150);
    let html = page(title, &description, 600, r#"<img src="x.png" alt="x">"#);

    let report = analyze_document("https://example.com/guide", &html, true);
    assert_eq!(report.score, 100, "issues: {:?}", report.issues);
    assert!(report.issues.is_empty());
    assert_eq!(report.h2_tags.len(), 2);
    assert_eq!(report.image_count, 1);
    assert_eq!(report.images_without_alt, 0);
}

#[test]
fn test_empty_document_collects_every_structural_issue() {
    let report = analyze_document("https://example.com", "<html><body></body></html>", true);
    assert_eq!(
        &report.issues[..4],
        &[
            "Missing title tag".to_string(),
            "Missing meta description".to_string(),
            "Missing H1 tag".to_string(),
            "Content too short (< 300 words)".to_string(),
        ]
    );
    assert_eq!(report.score, 40);
}

#[test]
fn test_restricted_view_hides_detail() {
    let html = page("Short", "", 10, r#"<img src="a.png"><img src="b.png">"#);
    let report = analyze_document("https://example.com", &html, false);

    assert!(report.limited);
    assert!(report.upgrade_message.is_some());
    assert!(report.h2_tags.is_empty());
    assert!(report.issues.len() <= 5);
    assert!(report.recommendations.len() <= 3);
    assert_eq!(report.images_without_alt, 2);
}
