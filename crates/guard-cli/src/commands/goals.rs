//! Goal command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use guard_core::models::{GoalAnalyticsResponse, GoalStatus, NewGoal, PiggyType};
use guard_core::GoalService;

use super::{parse_opt_date, print_json, truncate, Session};

/// Options for `guard goals add`
pub struct GoalArgs<'a> {
    pub name: &'a str,
    pub target: f64,
    pub piggy: Option<&'a str>,
    pub start: f64,
    pub increment: f64,
    pub deadline: Option<&'a str>,
    pub notify_after: Option<i64>,
    pub currency: &'a str,
}

impl GoalArgs<'_> {
    pub fn to_new_goal(&self) -> Result<NewGoal> {
        let piggy_type = self
            .piggy
            .map(|p| p.parse::<PiggyType>())
            .transpose()
            .map_err(anyhow::Error::msg)?;

        Ok(NewGoal {
            is_piggy_bank: piggy_type.is_some_and(|p| p != PiggyType::Manual),
            piggy_type: piggy_type.unwrap_or_default(),
            start_amount: self.start,
            increment_amount: self.increment,
            deadline: parse_opt_date(self.deadline, "--deadline")?,
            notify_on_risk: self.notify_after.is_some(),
            notify_inactivity_days: self.notify_after,
            currency: self.currency.to_uppercase(),
            ..NewGoal::new(self.name, self.target)
        })
    }
}

pub async fn cmd_goals_list(session: &Session, json: bool) -> Result<()> {
    let service = GoalService::new(session.db.clone());
    let today = Utc::now().date_naive();
    let goals = service.list_with_analytics(&session.user_id, today).await?;

    if json {
        return print_json(&goals);
    }

    if goals.is_empty() {
        println!("No goals yet. Create one with:");
        println!("  guard goals add --name \"Emergency fund\" --target 1000");
        return Ok(());
    }

    println!();
    println!("🎯 Goals");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in goals {
        let goal = &entry.goal;
        let analytics = &entry.analytics;
        let paid_icon = if analytics.is_today_paid { "✅" } else { "⬜" };

        println!(
            "   {} {:20} │ {:>10.2} / {:<10.2} {} │ {:>6.2}% │ 🔥 {:<3} │ {}",
            paid_icon,
            truncate(goal.name.as_deref().unwrap_or("(unnamed)"), 20),
            goal.saved_already,
            goal.target_amount,
            analytics.currency,
            analytics.percentage,
            analytics.current_streak,
            analytics.status_message
        );
        println!("      id: {}", goal.id);
    }

    Ok(())
}

pub async fn cmd_goals_show(session: &Session, id: &str) -> Result<()> {
    let service = GoalService::new(session.db.clone());
    let analytics = service
        .analytics(&session.user_id, id, Utc::now().date_naive())
        .await?;
    print_json(&GoalAnalyticsResponse { analytics })
}

pub async fn cmd_goals_add(session: &Session, args: &GoalArgs<'_>) -> Result<()> {
    let service = GoalService::new(session.db.clone());
    let goal = service
        .create(&session.user_id, &args.to_new_goal()?)
        .await
        .context("Failed to create goal")?;

    println!(
        "✅ Goal created: {} (ID: {})",
        goal.name.as_deref().unwrap_or(args.name),
        goal.id
    );
    Ok(())
}

pub async fn cmd_goals_contribute(session: &Session, id: &str, amount: f64) -> Result<()> {
    let service = GoalService::new(session.db.clone());
    let goal = service
        .contribute(&session.user_id, id, amount, Utc::now().date_naive())
        .await?;

    println!(
        "💰 Saved {:.2} of {:.2} (streak: {} day{})",
        goal.saved_already,
        goal.target_amount,
        goal.current_streak,
        if goal.current_streak == 1 { "" } else { "s" }
    );
    if goal.status == GoalStatus::Completed {
        println!("🎉 Goal reached!");
    }
    Ok(())
}

pub async fn cmd_goals_delete(session: &Session, id: &str) -> Result<()> {
    GoalService::new(session.db.clone())
        .delete(&session.user_id, id)
        .await?;
    println!("🗑️  Goal {} deleted", id);
    Ok(())
}
