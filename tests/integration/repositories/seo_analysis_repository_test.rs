// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, Utc};
use rankscope::domain::models::seo_analysis::SeoAnalysisRecord;
use rankscope::domain::repositories::seo_analysis_repository::SeoAnalysisRepository;
use rankscope::domain::services::seo_scorer::analyze_document;
use rankscope::infrastructure::repositories::SeoAnalysisRepositoryImpl;

use super::{insert_user, setup_db};

const HTML: &str = "<html><head><title>Repository Page</title></head><body><h1>Heading</h1><p>Some words here</p></body></html>";

#[tokio::test]
async fn test_report_round_trips_through_json_columns() {
    let db = setup_db().await;
    let repo = SeoAnalysisRepositoryImpl::new(db.clone());
    let user = insert_user(&db, "seo@example.com").await;

    let report = analyze_document("https://example.com/page", HTML, true);
    let record = SeoAnalysisRecord::from_report(user.id, &report);
    repo.create(&record).await.unwrap();

    let found = repo
        .find_recent(user.id, "https://example.com/page", Utc::now() - Duration::hours(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, record.id);
    assert_eq!(found.title, "Repository Page");
    assert_eq!(found.h1_tags, vec!["Heading".to_string()]);
    assert_eq!(found.issues, report.issues);
    let stored = found.report.unwrap();
    assert_eq!(stored.score, report.score);
    assert!(!stored.limited);
}

#[tokio::test]
async fn test_find_recent_ignores_older_and_other_urls() {
    let db = setup_db().await;
    let repo = SeoAnalysisRepositoryImpl::new(db.clone());
    let user = insert_user(&db, "seo@example.com").await;

    let report = analyze_document("https://example.com/old", HTML, false);
    let mut old = SeoAnalysisRecord::from_report(user.id, &report);
    old.created_at = Utc::now() - Duration::days(2);
    repo.create(&old).await.unwrap();

    let since = Utc::now() - Duration::days(1);
    assert!(repo
        .find_recent(user.id, "https://example.com/old", since)
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .find_recent(user.id, "https://example.com/other", since)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_list_recent_and_count() {
    let db = setup_db().await;
    let repo = SeoAnalysisRepositoryImpl::new(db.clone());
    let user = insert_user(&db, "seo@example.com").await;
    let other = insert_user(&db, "other@example.com").await;

    for i in 0..3 {
        let url = format!("https://example.com/{}", i);
        let mut record = SeoAnalysisRecord::from_report(user.id, &analyze_document(&url, HTML, true));
        record.created_at = Utc::now() - Duration::minutes(10 - i);
        repo.create(&record).await.unwrap();
    }

    let recent = repo.list_recent(user.id, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].url, "https://example.com/2");
    assert_eq!(repo.count_by_user(user.id).await.unwrap(), 3);
    assert_eq!(repo.count_by_user(other.id).await.unwrap(), 0);
}
