//! Goal analytics engine
//!
//! Derives streak, next expected payment, time left, completion, health,
//! projected final amount, and the upcoming daily schedule from a goal row.
//!
//! Everything here is a pure function of `(goal, today)`: no I/O and no
//! clock reads. Callers capture `today` once per request so every field of
//! one response agrees on the date. All day arithmetic happens on dates, so
//! the time of day of `created_at` never shifts a count.

use chrono::{Duration, NaiveDate};

use crate::models::{Goal, GoalAnalytics, HealthStatus, ProgressionEntry};

/// Streak length that unlocks a streak freeze
pub const STREAK_FREEZE_THRESHOLD: i64 = 30;

/// Days in the forward schedule of a daily challenge
pub const PROGRESSION_DAYS: i64 = 7;

/// Month length used when spreading a remaining amount over a deadline
const DAYS_PER_MONTH: f64 = 30.0;

/// Round to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole days from `from` to `to`; negative when `to` is earlier
fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Day counts shared by every derived field
#[derive(Debug, Clone, Copy)]
struct DayCounts {
    since_creation: i64,
    since_last_contribution: Option<i64>,
    remaining: Option<i64>,
}

impl DayCounts {
    fn new(goal: &Goal, today: NaiveDate) -> Self {
        // A goal without a creation timestamp is treated as created today
        let since_creation = goal
            .created_at
            .map(|created| days_between(created.date_naive(), today))
            .unwrap_or(0);

        Self {
            since_creation,
            since_last_contribution: goal
                .last_contribution_date
                .map(|last| days_between(last, today)),
            remaining: goal
                .deadline
                .map(|deadline| days_between(today, deadline).max(0)),
        }
    }
}

/// Compute the analytics snapshot for `goal` as of `today`
pub fn compute_analytics(goal: &Goal, today: NaiveDate) -> GoalAnalytics {
    let days = DayCounts::new(goal, today);
    let daily = goal.is_daily_challenge();

    let current_streak = current_streak(goal, days);
    let next_payment_amount = round2(next_payment_amount(goal, days, daily));
    let health = health_status(goal, days, daily);

    let projection = projection(goal, days, daily, next_payment_amount).map(round2);

    let arithmetic_progression = if daily {
        progression(goal, days.since_creation, today)
    } else {
        Vec::new()
    };

    GoalAnalytics {
        current_streak,
        next_payment_amount,
        days_remaining: days.remaining,
        percentage: percentage(goal.saved_already, goal.target_amount),
        status_health: health.label().to_string(),
        status_message: health.message().to_string(),
        projection,
        streak_freeze_available: current_streak >= STREAK_FREEZE_THRESHOLD,
        arithmetic_progression,
        is_today_paid: days.since_last_contribution == Some(0),
        currency: goal.currency_or_default().to_string(),
    }
}

/// Completion percentage, uncapped; 0 for a zero target
pub fn percentage(saved: f64, target: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }
    round2(saved / target * 100.0)
}

/// Persisted streak when set, otherwise an implied streak for goals that are
/// still current
///
/// The implied value assumes an unbroken daily run from creation to the last
/// contribution, so it can overstate sporadic histories.
fn current_streak(goal: &Goal, days: DayCounts) -> i64 {
    if goal.current_streak != 0 {
        return goal.current_streak;
    }

    match (goal.last_contribution_date, days.since_last_contribution) {
        (Some(last), Some(since_last)) if since_last <= 1 => {
            let created = goal.created_at.map(|c| c.date_naive()).unwrap_or(last);
            (days_between(created, last) + 1).max(1)
        }
        _ => 0,
    }
}

/// Amount of the arithmetic schedule due on day `day_index`
fn scheduled_amount(goal: &Goal, day_index: i64) -> f64 {
    goal.start_amount + day_index as f64 * goal.increment_amount
}

fn next_payment_amount(goal: &Goal, days: DayCounts, daily: bool) -> f64 {
    if daily {
        return scheduled_amount(goal, days.since_creation);
    }

    match days.remaining {
        Some(remaining_days) => {
            let remaining = (goal.target_amount - goal.saved_already).max(0.0);
            let remaining_months = remaining_days as f64 / DAYS_PER_MONTH;
            if remaining_months <= 0.0 {
                remaining
            } else {
                remaining / remaining_months
            }
        }
        None => 0.0,
    }
}

fn health_status(goal: &Goal, days: DayCounts, daily: bool) -> HealthStatus {
    let mut status = HealthStatus::OnTrack;

    // An unknown inactivity span (never contributed) triggers neither rule
    if let Some(inactive) = days.since_last_contribution {
        if goal.notify_on_risk {
            if let Some(threshold) = goal.notify_inactivity_days {
                if inactive > threshold {
                    status = HealthStatus::AtRisk;
                }
            }
        }

        // Daily challenges are stricter and override the general rule
        if daily && inactive > 1 {
            status = HealthStatus::Behind;
        }
    }

    status
}

/// Estimated saved amount at the deadline
fn projection(goal: &Goal, days: DayCounts, daily: bool, next_payment: f64) -> Option<f64> {
    if !daily {
        return Some(goal.target_amount);
    }

    let remaining = days.remaining?;
    if remaining == 0 {
        return Some(goal.saved_already);
    }

    // Arithmetic series: n/2 * (2a + (n - 1)d)
    let n = remaining as f64;
    let series = n / 2.0 * (2.0 * next_payment + (n - 1.0) * goal.increment_amount);
    Some(goal.saved_already + series)
}

fn progression(goal: &Goal, since_creation: i64, today: NaiveDate) -> Vec<ProgressionEntry> {
    (0..PROGRESSION_DAYS)
        .map(|offset| ProgressionEntry {
            date: today + Duration::days(offset),
            amount: round2(scheduled_amount(goal, since_creation + offset)),
        })
        .collect()
}
