//! Account command implementations

use anyhow::{Context, Result};
use guard_core::budget::total_visible_balance;
use guard_core::models::{AccountUpdate, NewAccount};
use guard_core::AccountService;

use super::{print_json, truncate, Session};

pub async fn cmd_accounts_list(session: &Session, json: bool) -> Result<()> {
    let service = AccountService::new(session.db.clone());
    let accounts = service.list(&session.user_id).await?;

    if json {
        return print_json(&accounts);
    }

    if accounts.is_empty() {
        println!("No accounts yet. Create one with:");
        println!("  guard accounts add --name Cash --balance 100");
        return Ok(());
    }

    println!();
    println!("🏦 Accounts");
    println!("   ─────────────────────────────────────────────────────────────");

    for account in &accounts {
        let hidden = if account.is_hidden { " (hidden)" } else { "" };
        println!(
            "   {:24} │ {:>12.2} {:3} │ {:8} │ {}{}",
            truncate(&account.name, 24),
            account.balance,
            account.currency.as_deref().unwrap_or("USD"),
            account.account_type.as_deref().unwrap_or("-"),
            account.id,
            hidden
        );
    }

    let total = total_visible_balance(&accounts);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total (visible): {:.2}", total);

    Ok(())
}

pub async fn cmd_accounts_add(
    session: &Session,
    name: &str,
    kind: Option<&str>,
    balance: f64,
    currency: &str,
    hidden: bool,
) -> Result<()> {
    let account = NewAccount {
        name: name.to_string(),
        account_type: kind.map(str::to_string),
        balance,
        currency: currency.to_uppercase(),
        is_hidden: hidden,
    };
    let created = AccountService::new(session.db.clone())
        .create(&session.user_id, &account)
        .await
        .context("Failed to create account")?;

    println!("✅ Account created: {} (ID: {})", created.name, created.id);
    Ok(())
}

pub async fn cmd_accounts_update(
    session: &Session,
    id: &str,
    name: Option<&str>,
    hidden: Option<bool>,
) -> Result<()> {
    let update = AccountUpdate {
        name: name.map(str::to_string),
        is_hidden: hidden,
        ..Default::default()
    };
    let account = AccountService::new(session.db.clone())
        .update(&session.user_id, id, &update)
        .await?;

    println!("✅ Account updated: {}", account.name);
    Ok(())
}

pub async fn cmd_accounts_delete(session: &Session, id: &str) -> Result<()> {
    AccountService::new(session.db.clone())
        .delete(&session.user_id, id)
        .await?;
    println!("🗑️  Account {} deleted", id);
    Ok(())
}
