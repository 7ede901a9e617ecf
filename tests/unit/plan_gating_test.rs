// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rankscope::domain::models::plan::{Feature, Plan};
use rankscope::domain::models::user::User;

fn user_on(plan: Plan, trial: bool) -> User {
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
    let mut user = User::new_trial("gate@example.com".to_string(), "Gate".to_string(), 7, start);
    if !trial {
        user.trial_end = None;
        user.activate_plan(plan);
    }
    user
}

#[test]
fn test_trial_overrides_stored_plan() {
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
    let mut user = user_on(Plan::Trial, true);
    user.plan = Plan::Starter;

    assert_eq!(user.effective_plan(now), Plan::Trial);
    assert!(user.can_export_csv(now));
    assert_eq!(user.plan_display_name(now), "Trial");

    // Once the trial lapses the stored plan applies
    let later = now + Duration::days(10);
    assert_eq!(user.effective_plan(later), Plan::Starter);
    assert!(!user.can_export_csv(later));
    assert!(!user.can_access_historical_data(later));
}

#[test]
fn test_professional_unlocks_export_and_history() {
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
    let user = user_on(Plan::Professional, false);
    assert!(user.is_professional(now));
    assert!(user.can_export_csv(now));
    assert!(user.can_access_historical_data(now));
    assert_eq!(user.plan_display_name(now), "Professional");
}

#[test]
fn test_daily_reset_happens_once_per_day() {
    let mut user = user_on(Plan::Starter, false);
    user.daily_keyword_queries = 25;
    user.daily_seo_reports = 5;

    let next_day = user.last_usage_reset + Duration::days(1);
    assert!(user.reset_daily_usage_if_needed(next_day));
    assert_eq!(user.daily_keyword_queries, 0);
    assert_eq!(user.daily_seo_reports, 0);
    assert!(!user.reset_daily_usage_if_needed(next_day));
}

proptest! {
    #[test]
    fn test_starter_limits_are_strict_upper_bounds(queries in 0i32..100, reports in 0i32..20) {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let mut user = user_on(Plan::Starter, false);
        user.daily_keyword_queries = queries;
        user.daily_seo_reports = reports;

        let limits = Plan::Starter.limits();
        prop_assert_eq!(
            user.can_use_feature(Feature::KeywordQueries, 0, now),
            queries < limits.keyword_queries
        );
        prop_assert_eq!(
            user.can_use_feature(Feature::SeoReports, 0, now),
            reports < limits.seo_reports
        );
    }

    #[test]
    fn test_tracked_keyword_cap_follows_plan(tracked in 0u64..200) {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        for plan in [Plan::Starter, Plan::Professional] {
            let user = user_on(plan, false);
            let cap = plan.limits().tracked_keywords as u64;
            prop_assert_eq!(
                user.can_use_feature(Feature::TrackedKeywords, tracked, now),
                tracked < cap
            );
        }
    }
}
