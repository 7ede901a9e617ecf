// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, Utc};
use rankscope::domain::models::plan::{Feature, Plan, SubscriptionStatus};
use rankscope::domain::models::user::User;
use rankscope::domain::repositories::user_repository::UserRepository;
use rankscope::infrastructure::repositories::UserRepositoryImpl;
use rankscope::utils::errors::RepositoryError;
use uuid::Uuid;

use super::{insert_user, setup_db};

#[tokio::test]
async fn test_create_and_find_user() {
    let db = setup_db().await;
    let repo = UserRepositoryImpl::new(db.clone());
    let user = insert_user(&db, "jane@example.com").await;

    let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "jane@example.com");
    assert_eq!(by_id.plan, Plan::Trial);
    assert!(by_id.is_trial_active(Utc::now()));
    assert_eq!(by_id.subscription_status, SubscriptionStatus::Trialing);

    let by_email = repo.find_by_email("jane@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));
    assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let db = setup_db().await;
    let repo = UserRepositoryImpl::new(db.clone());
    insert_user(&db, "dup@example.com").await;

    let again = User::new_trial("dup@example.com".to_string(), "Other".to_string(), 7, Utc::now());
    let err = repo.create(&again).await.unwrap_err();
    assert!(matches!(err, RepositoryError::AlreadyExists));
}

#[tokio::test]
async fn test_update_persists_billing_fields() {
    let db = setup_db().await;
    let repo = UserRepositoryImpl::new(db.clone());
    let mut user = insert_user(&db, "billing@example.com").await;

    user.activate_plan(Plan::Professional);
    user.stripe_customer_id = Some("cus_repo".to_string());
    user.daily_seo_reports = 3;
    let updated = repo.update(&user).await.unwrap();
    assert!(updated.updated_at >= user.updated_at);

    let found = repo
        .find_by_stripe_customer_id("cus_repo")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.plan, Plan::Professional);
    assert_eq!(found.daily_seo_reports, 3);
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let db = setup_db().await;
    let repo = UserRepositoryImpl::new(db);
    let mut ghost = User::new_trial("ghost@example.com".to_string(), "Ghost".to_string(), 7, Utc::now());
    ghost.id = Uuid::new_v4();

    let err = repo.update(&ghost).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[tokio::test]
async fn test_increment_usage_only_touches_the_counter() {
    let db = setup_db().await;
    let repo = UserRepositoryImpl::new(db.clone());
    let stale = insert_user(&db, "usage@example.com").await;

    // Plan change lands after the request took its snapshot
    let mut current = stale.clone();
    current.activate_plan(Plan::Professional);
    current.stripe_subscription_id = Some("sub_usage".to_string());
    repo.update(&current).await.unwrap();

    let (a, b) = tokio::join!(
        repo.increment_usage(stale.id, Feature::SeoReports),
        repo.increment_usage(stale.id, Feature::SeoReports),
    );
    a.unwrap();
    b.unwrap();
    repo.increment_usage(stale.id, Feature::KeywordQueries)
        .await
        .unwrap();
    repo.increment_usage(stale.id, Feature::TrackedKeywords)
        .await
        .unwrap();

    let found = repo.find_by_id(stale.id).await.unwrap().unwrap();
    assert_eq!(found.daily_seo_reports, 2);
    assert_eq!(found.daily_keyword_queries, 1);
    assert_eq!(found.plan, Plan::Professional);
    assert_eq!(found.stripe_subscription_id.as_deref(), Some("sub_usage"));

    let err = repo
        .increment_usage(Uuid::new_v4(), Feature::SeoReports)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[tokio::test]
async fn test_reset_usage_runs_once_per_day() {
    let db = setup_db().await;
    let repo = UserRepositoryImpl::new(db.clone());
    let mut user = insert_user(&db, "reset@example.com").await;
    let today = Utc::now().date_naive();

    user.last_usage_reset = today - Duration::days(1);
    user.daily_seo_reports = 4;
    user.daily_keyword_queries = 9;
    repo.update(&user).await.unwrap();

    repo.reset_usage(user.id, today).await.unwrap();
    repo.increment_usage(user.id, Feature::SeoReports)
        .await
        .unwrap();
    // A second reset on the same day keeps the new usage
    repo.reset_usage(user.id, today).await.unwrap();

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found.last_usage_reset, today);
    assert_eq!(found.daily_seo_reports, 1);
    assert_eq!(found.daily_keyword_queries, 0);
}
