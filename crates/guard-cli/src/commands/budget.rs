//! Envelope and subscription command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use guard_core::budget::MonthPeriod;
use guard_core::models::{
    BillingCycle, EnvelopeUpdate, NewEnvelope, NewSubscription, SubscriptionUpdate,
};
use guard_core::BudgetService;

use super::{parse_opt_date, print_json, truncate, Session};

pub async fn cmd_envelopes_list(
    session: &Session,
    month: Option<u32>,
    year: Option<i32>,
    json: bool,
) -> Result<()> {
    let today = Utc::now().date_naive();
    let envelopes = BudgetService::new(session.db.clone())
        .envelopes(&session.user_id, month, year, today)
        .await?;

    if json {
        return print_json(&envelopes);
    }

    if envelopes.is_empty() {
        println!("No envelopes for this month. Create one with:");
        println!("  guard envelopes add --category <id> --amount 300");
        return Ok(());
    }

    println!();
    println!("✉️  Budget Envelopes");
    println!("   ─────────────────────────────────────────────────────────────");

    for envelope in envelopes {
        let name = envelope
            .category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("(no category)");
        let icon = if envelope.spent > envelope.budget_amount {
            "🔴"
        } else if envelope.spent >= envelope.budget_amount * 0.8 {
            "🟡"
        } else {
            "🟢"
        };

        println!(
            "   {} {:20} │ {:>10.2} / {:<10.2} │ {:02}/{} │ {}",
            icon,
            truncate(name, 20),
            envelope.spent,
            envelope.budget_amount,
            envelope.period_month,
            envelope.period_year,
            envelope.id
        );
    }

    Ok(())
}

pub async fn cmd_envelopes_add(
    session: &Session,
    category: &str,
    amount: f64,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let period = MonthPeriod::resolve(month, year, Utc::now().date_naive())?;
    let envelope = NewEnvelope {
        category_id: category.to_string(),
        budget_amount: amount,
        period_month: period.month,
        period_year: period.year,
    };

    let created = BudgetService::new(session.db.clone())
        .create_envelope(&session.user_id, &envelope)
        .await
        .context("Failed to create envelope")?;

    println!(
        "✅ Envelope created for {:02}/{} (ID: {})",
        created.period_month, created.period_year, created.id
    );
    Ok(())
}

pub async fn cmd_envelopes_update(session: &Session, id: &str, amount: f64) -> Result<()> {
    let update = EnvelopeUpdate {
        budget_amount: Some(amount),
    };
    let envelope = BudgetService::new(session.db.clone())
        .update_envelope(&session.user_id, id, &update)
        .await?;

    println!("✅ Envelope {} now {:.2}", envelope.id, envelope.budget_amount);
    Ok(())
}

pub async fn cmd_envelopes_delete(session: &Session, id: &str) -> Result<()> {
    BudgetService::new(session.db.clone())
        .delete_envelope(&session.user_id, id)
        .await?;
    println!("🗑️  Envelope {} deleted", id);
    Ok(())
}

pub async fn cmd_subscriptions_list(session: &Session, json: bool) -> Result<()> {
    let summary = BudgetService::new(session.db.clone())
        .subscriptions(&session.user_id)
        .await?;

    if json {
        return print_json(&summary);
    }

    if summary.subscriptions.is_empty() {
        println!("No subscriptions tracked. Add one with:");
        println!("  guard subscriptions add --name Netflix --amount 15.49 --cycle monthly");
        return Ok(());
    }

    println!();
    println!("📋 Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in &summary.subscriptions {
        let sub = &entry.subscription;
        let status_icon = if sub.is_active { "✅" } else { "⏸️ " };
        let next_bill = sub
            .next_bill_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "?".to_string());

        println!(
            "   {} {:20} │ {:>8.2}/{:<7} │ {:>8.2}/mo │ next {} │ {}",
            status_icon,
            truncate(&sub.name, 20),
            sub.amount,
            sub.billing_cycle.as_str(),
            entry.normalized_monthly,
            next_bill,
            sub.id
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   💸 Monthly drain: {:.2}", summary.total_monthly_drain);

    Ok(())
}

pub async fn cmd_subscriptions_add(
    session: &Session,
    name: &str,
    amount: f64,
    cycle: &str,
    next_bill: Option<&str>,
    inactive: bool,
) -> Result<()> {
    let subscription = NewSubscription {
        name: name.to_string(),
        amount,
        billing_cycle: BillingCycle::from_name(cycle),
        next_bill_date: parse_opt_date(next_bill, "--next-bill")?,
        is_active: !inactive,
    };

    let created = BudgetService::new(session.db.clone())
        .create_subscription(&session.user_id, &subscription)
        .await
        .context("Failed to add subscription")?;

    println!("✅ Tracking {} (ID: {})", created.name, created.id);
    Ok(())
}

pub async fn cmd_subscriptions_update(
    session: &Session,
    id: &str,
    amount: Option<f64>,
    active: Option<bool>,
) -> Result<()> {
    let update = SubscriptionUpdate {
        amount,
        is_active: active,
        ..Default::default()
    };
    let subscription = BudgetService::new(session.db.clone())
        .update_subscription(&session.user_id, id, &update)
        .await?;

    println!(
        "✅ {} updated ({:.2}/{}, {})",
        subscription.name,
        subscription.amount,
        subscription.billing_cycle.as_str(),
        if subscription.is_active { "active" } else { "paused" }
    );
    Ok(())
}

pub async fn cmd_subscriptions_delete(session: &Session, id: &str) -> Result<()> {
    BudgetService::new(session.db.clone())
        .delete_subscription(&session.user_id, id)
        .await?;
    println!("🗑️  Subscription {} deleted", id);
    Ok(())
}
