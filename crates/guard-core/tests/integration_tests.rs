//! Integration tests for guard-core
//!
//! These tests exercise the public API end to end without a remote database:
//! goal row JSON → analytics → client JSON, contributions feeding back into
//! analytics, and dashboard/budget aggregation over parsed rows.

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use guard_core::{
    analytics::compute_analytics,
    budget::{envelope_summaries, MonthPeriod},
    dashboard::{format_chart_data, ChartMode, DateRanges, Period},
    goals::apply_contribution,
    models::{
        Account, BudgetEnvelope, DashboardStats, Goal, GoalAnalyticsResponse, HealthStatus,
        SubscriptionSummary, Transaction,
    },
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn analytics_json(goal: &Goal, today: NaiveDate) -> Value {
    let response = GoalAnalyticsResponse {
        analytics: compute_analytics(goal, today),
    };
    serde_json::to_value(response).unwrap()
}

// =============================================================================
// Goal analytics
// =============================================================================

#[test]
fn test_daily_challenge_from_row() {
    let goal: Goal = serde_json::from_value(json!({
        "id": 42,
        "target_amount": 1378,
        "saved_already": 0,
        "is_piggy_bank": true,
        "piggy_type": "daily",
        "start_amount": 1,
        "increment_amount": 1,
        "created_at": "2025-01-10T15:30:00+00:00",
        "deadline": "2025-01-20",
        "last_contribution_date": null,
        "current_streak": null,
        "currency": null
    }))
    .unwrap();

    let out = analytics_json(&goal, day(2025, 1, 10));
    let analytics = &out["analytics"];

    assert_eq!(analytics["nextPaymentAmount"], json!(1.0));
    assert_eq!(analytics["daysRemaining"], json!(10));
    assert_eq!(analytics["projection"], json!(55.0));
    assert_eq!(analytics["currency"], json!("USD"));
    assert_eq!(analytics["isTodayPaid"], json!(false));
    assert_eq!(analytics["streakFreezeAvailable"], json!(false));

    let progression = analytics["arithmeticProgression"].as_array().unwrap();
    assert_eq!(progression.len(), 7);
    assert_eq!(progression[0], json!({"date": "2025-01-10", "amount": 1.0}));
    assert_eq!(progression[6], json!({"date": "2025-01-16", "amount": 7.0}));
}

#[test]
fn test_analytics_output_is_deterministic() {
    let goal = Goal {
        id: "g1".into(),
        target_amount: 500.0,
        saved_already: 123.45,
        created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
        deadline: Some(day(2024, 12, 31)),
        last_contribution_date: Some(day(2024, 6, 1)),
        ..Default::default()
    };
    let today = day(2024, 6, 10);

    let first = serde_json::to_string(&analytics_json(&goal, today)).unwrap();
    let second = serde_json::to_string(&analytics_json(&goal, today)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_manual_goal_output_shape() {
    let goal = Goal {
        id: "g1".into(),
        target_amount: 0.0,
        saved_already: 25.0,
        ..Default::default()
    };

    let out = analytics_json(&goal, day(2024, 6, 10));
    let analytics = &out["analytics"];
    assert_eq!(analytics["percentage"], json!(0.0));
    assert_eq!(analytics["projection"], json!(0.0));
    assert_eq!(analytics["arithmeticProgression"], json!([]));
    assert_eq!(analytics["daysRemaining"], Value::Null);
    assert_eq!(analytics["statusMessage"], json!("On Track"));
}

#[test]
fn test_contribution_round_trip_through_analytics() {
    let mut goal = Goal {
        id: "g1".into(),
        target_amount: 100.0,
        saved_already: 20.0,
        is_piggy_bank: true,
        piggy_type: "daily".parse().unwrap(),
        start_amount: 1.0,
        increment_amount: 1.0,
        created_at: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
        last_contribution_date: Some(day(2024, 6, 7)),
        current_streak: 7,
        ..Default::default()
    };
    let today = day(2024, 6, 9);

    // Two days idle: a daily challenge falls behind
    let before = compute_analytics(&goal, today);
    assert_eq!(before.status_health, HealthStatus::Behind.label());
    assert!(!before.is_today_paid);

    let update = apply_contribution(&goal, 9.0, today).unwrap();
    assert_eq!(update.current_streak, 1);
    goal.saved_already = update.saved_already;
    goal.last_contribution_date = Some(update.last_contribution_date);
    goal.current_streak = update.current_streak;

    let after = compute_analytics(&goal, today);
    assert_eq!(after.status_message, "On Track");
    assert!(after.is_today_paid);
    assert_eq!(after.percentage, 29.0);
    assert_eq!(after.current_streak, 1);
}

// =============================================================================
// Dashboard and budget aggregation
// =============================================================================

fn transactions(rows: Value) -> Vec<Transaction> {
    serde_json::from_value(rows).unwrap()
}

#[test]
fn test_week_dashboard_from_rows() {
    // Wednesday; the week runs Sunday 9th to Saturday 15th
    let now = Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap();
    let ranges = DateRanges::for_period(Period::Week, now);
    assert_eq!(ranges.start, Utc.with_ymd_and_hms(2024, 6, 9, 0, 0, 0).unwrap());

    let accounts: Vec<Account> = serde_json::from_value(json!([
        {"id": "a1", "name": "Cash", "balance": 1000},
        {"id": "a2", "name": "Hidden", "balance": 50, "is_hidden": true}
    ]))
    .unwrap();
    let current = transactions(json!([
        {"id": "t1", "amount": 200, "type": "income", "date": "2024-06-10T08:00:00Z"},
        {"id": "t2", "amount": 50, "type": "expense", "date": "2024-06-11T08:00:00Z"}
    ]));
    let previous = transactions(json!([
        {"id": "t0", "amount": 100, "type": "income", "date": "2024-06-03T08:00:00Z"}
    ]));

    let stats = DashboardStats::compute(&accounts, &current, &previous, Period::Week, &ranges);

    assert_eq!(stats.balance, 1000.0);
    assert_eq!(stats.delta, 50.0);
    assert_eq!(stats.chart_balance.len(), 7);
    let balances: Vec<f64> = stats.chart_balance.iter().map(|p| p.v).collect();
    assert_eq!(
        balances,
        vec![850.0, 1050.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0]
    );

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["deltaLabel"], json!("vs last week"));
    assert_eq!(json["chartIncome"][1], json!({"d": "10/06", "v": 200.0}));
}

#[test]
fn test_day_chart_has_hourly_points() {
    let now = Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap();
    let ranges = DateRanges::for_period(Period::Day, now);
    let points = format_chart_data(&[], Period::Day, ranges.start, ranges.end, ChartMode::Flow);

    assert_eq!(points.len(), 24);
    assert_eq!(points[0].d, "00:00");
    assert_eq!(points[23].d, "23:00");
}

#[test]
fn test_budget_month_summary() {
    let period = MonthPeriod::resolve(Some(2), Some(2024), day(2024, 6, 1)).unwrap();
    assert_eq!(period.last_day().unwrap(), day(2024, 2, 29));

    let envelopes: Vec<BudgetEnvelope> = serde_json::from_value(json!([
        {"id": "e1", "budget_amount": 200, "period_month": 2, "period_year": 2024,
         "category": {"id": "c1", "name": "Food"}},
        {"id": "e2", "budget_amount": 80, "period_month": 2, "period_year": 2024,
         "category": {"id": "c2", "name": "Fun"}}
    ]))
    .unwrap();
    let expenses = transactions(json!([
        {"id": "t1", "category_id": "c1", "amount": 12.5, "type": "expense", "date": "2024-02-03"},
        {"id": "t2", "category_id": "c1", "amount": 7.25, "type": "expense", "date": "2024-02-20"},
        {"id": "t3", "category_id": "c3", "amount": 99, "type": "expense", "date": "2024-02-21"}
    ]));

    let summaries = envelope_summaries(envelopes, &expenses);
    assert_eq!(summaries[0].spent, 19.75);
    assert_eq!(summaries[1].spent, 0.0);

    let subs = serde_json::from_value(json!([
        {"id": "s1", "name": "Paper", "amount": 2, "billing_cycle": "weekly", "is_active": true},
        {"id": "s2", "name": "Old", "amount": 10, "billing_cycle": "monthly", "is_active": false}
    ]))
    .unwrap();
    let summary = SubscriptionSummary::from_subscriptions(subs);
    assert_eq!(summary.total_monthly_drain, 8.66);
    assert_eq!(summary.subscriptions[1].normalized_monthly, 10.0);
}
