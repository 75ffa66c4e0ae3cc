//! Transaction command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use guard_core::models::{NewTransaction, Transaction, TransactionType};
use guard_core::{TransactionFilter, TransactionService};

use super::{parse_date, parse_opt_date, print_json, truncate, Session};

/// Filters for `guard transactions list`
#[derive(Default)]
pub struct ListArgs<'a> {
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub account: Option<&'a str>,
    pub category: Option<&'a str>,
    pub limit: Option<usize>,
}

impl<'a> ListArgs<'a> {
    pub fn to_filter(&self) -> Result<TransactionFilter<'a>> {
        let kind = self
            .kind
            .map(|k| k.parse::<TransactionType>())
            .transpose()
            .map_err(anyhow::Error::msg)?;

        Ok(TransactionFilter::new()
            .start_date(parse_opt_date(self.from, "--from")?)
            .end_date(parse_opt_date(self.to, "--to")?)
            .kind(kind)
            .account_id(self.account)
            .category_id(self.category)
            .limit(self.limit))
    }
}

fn print_transactions(title: &str, transactions: &[Transaction]) {
    println!();
    println!("📝 {}", title);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.kind {
            TransactionType::Expense => format!("\x1b[31m-${:.2}\x1b[0m", tx.amount),
            TransactionType::Income => format!("\x1b[32m+${:.2}\x1b[0m", tx.amount),
        };
        let category = tx
            .categories
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        let account = tx
            .accounts
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or("-");

        println!(
            "   {} │ {:>10} │ {:12} │ {:12} │ {}",
            tx.date.format("%Y-%m-%d"),
            amount_str,
            truncate(category, 12),
            truncate(account, 12),
            truncate(tx.description.as_deref().unwrap_or(""), 30)
        );
    }
}

pub async fn cmd_transactions_list(session: &Session, args: &ListArgs<'_>, json: bool) -> Result<()> {
    let filter = args.to_filter()?;
    let transactions = TransactionService::new(session.db.clone())
        .list(&session.user_id, &filter)
        .await?;

    if json {
        return print_json(&transactions);
    }

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    print_transactions("Transactions", &transactions);
    Ok(())
}

pub async fn cmd_transactions_recent(session: &Session) -> Result<()> {
    let transactions = TransactionService::new(session.db.clone())
        .recent(&session.user_id)
        .await?;

    if transactions.is_empty() {
        println!("No transactions yet. Record one with:");
        println!("  guard transactions add --account <id> --amount 12.50 --type expense");
        return Ok(());
    }

    print_transactions("Recent Transactions", &transactions);
    Ok(())
}

/// Fields for `guard transactions add`
pub struct AddArgs<'a> {
    pub account: &'a str,
    pub amount: f64,
    pub kind: &'a str,
    pub category: Option<&'a str>,
    pub description: Option<&'a str>,
    pub date: Option<&'a str>,
}

impl AddArgs<'_> {
    pub fn to_new_transaction(&self) -> Result<NewTransaction> {
        let kind = self
            .kind
            .parse::<TransactionType>()
            .map_err(anyhow::Error::msg)?;
        let date = match self.date {
            Some(date) => parse_date(date, "--date")?,
            None => Utc::now().date_naive(),
        };

        Ok(NewTransaction {
            account_id: self.account.to_string(),
            category_id: self.category.map(str::to_string),
            amount: self.amount,
            kind,
            description: self.description.map(str::to_string),
            date,
        })
    }
}

pub async fn cmd_transactions_add(session: &Session, args: &AddArgs<'_>) -> Result<()> {
    let transaction = args.to_new_transaction()?;
    let created = TransactionService::new(session.db.clone())
        .create(&session.user_id, &transaction)
        .await
        .context("Failed to record transaction")?;

    println!(
        "✅ Recorded {} of {:.2} (ID: {})",
        created.kind, created.amount, created.id
    );
    Ok(())
}

pub async fn cmd_transactions_delete(session: &Session, id: &str) -> Result<()> {
    TransactionService::new(session.db.clone())
        .delete(&session.user_id, id)
        .await?;
    println!("🗑️  Transaction {} deleted, balance restored", id);
    Ok(())
}
