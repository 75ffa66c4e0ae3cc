//! Goal contributions
//!
//! "Crossing off the day": applying a deposit to a goal and working out the
//! fields to write back. The remote database stores the result; nothing here
//! touches it.

use chrono::NaiveDate;

use crate::analytics::round2;
use crate::error::{Error, Result};
use crate::models::{Goal, GoalStatus, GoalUpdate};

/// Streak counter after a contribution on `today`
///
/// Paying twice on the same day keeps the run, paying the day after extends
/// it, and anything else starts a new run.
pub fn next_streak(goal: &Goal, today: NaiveDate) -> i64 {
    match goal.last_contribution_date.map(|last| (today - last).num_days()) {
        Some(0) => goal.current_streak.max(1),
        Some(1) => goal.current_streak + 1,
        _ => 1,
    }
}

/// Apply a deposit of `amount` to `goal` on `today`
pub fn apply_contribution(goal: &Goal, amount: f64, today: NaiveDate) -> Result<GoalUpdate> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidData(format!(
            "contribution must be a positive amount, got {}",
            amount
        )));
    }

    let saved_already = round2(goal.saved_already + amount);
    let status = if goal.target_amount > 0.0 && saved_already >= goal.target_amount {
        GoalStatus::Completed
    } else {
        GoalStatus::Active
    };

    Ok(GoalUpdate {
        saved_already,
        last_contribution_date: today,
        status,
        current_streak: next_streak(goal, today),
    })
}
