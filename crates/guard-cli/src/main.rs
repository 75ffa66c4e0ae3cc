//! Guard CLI - Savings goals, budgets and spending dashboards
//!
//! Usage:
//!   guard analytics --file goal.json     Compute goal analytics offline
//!   guard goals list                     Goals with streaks and projections
//!   guard goals contribute <id> 25       Record a deposit
//!   guard dashboard --period week        Balance, flows and charts
//!   guard envelopes list --month 2       Budget envelopes with spending
//!   guard categories list                Global and personal categories

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use guard_core::models::SettingsUpdate;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    // Every command except analytics talks to the remote database
    let Cli {
        config,
        user,
        command,
        ..
    } = cli;
    let connect = || commands::open_session(config.as_deref(), user.as_deref());

    match command {
        Commands::Analytics { file, today } => commands::cmd_analytics(&file, today.as_deref()),
        Commands::Dashboard { period, json } => {
            commands::cmd_dashboard(&connect()?, &period, json).await
        }
        Commands::Goals { action } => {
            let session = connect()?;
            match action {
                None => commands::cmd_goals_list(&session, false).await,
                Some(GoalsAction::List { json }) => commands::cmd_goals_list(&session, json).await,
                Some(GoalsAction::Show { id }) => commands::cmd_goals_show(&session, &id).await,
                Some(GoalsAction::Add {
                    name,
                    target,
                    piggy,
                    start,
                    increment,
                    deadline,
                    notify_after,
                    currency,
                }) => {
                    let args = commands::GoalArgs {
                        name: &name,
                        target,
                        piggy: piggy.as_deref(),
                        start,
                        increment,
                        deadline: deadline.as_deref(),
                        notify_after,
                        currency: &currency,
                    };
                    commands::cmd_goals_add(&session, &args).await
                }
                Some(GoalsAction::Contribute { id, amount }) => {
                    commands::cmd_goals_contribute(&session, &id, amount).await
                }
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&session, &id).await,
            }
        }
        Commands::Accounts { action } => {
            let session = connect()?;
            match action {
                None => commands::cmd_accounts_list(&session, false).await,
                Some(AccountsAction::List { json }) => commands::cmd_accounts_list(&session, json).await,
                Some(AccountsAction::Add {
                    name,
                    kind,
                    balance,
                    currency,
                    hidden,
                }) => {
                    commands::cmd_accounts_add(
                        &session,
                        &name,
                        kind.as_deref(),
                        balance,
                        &currency,
                        hidden,
                    )
                    .await
                }
                Some(AccountsAction::Update { id, name, hidden }) => {
                    commands::cmd_accounts_update(&session, &id, name.as_deref(), hidden).await
                }
                Some(AccountsAction::Delete { id }) => {
                    commands::cmd_accounts_delete(&session, &id).await
                }
            }
        }
        Commands::Transactions { action } => {
            let session = connect()?;
            match action {
                None | Some(TransactionsAction::Recent) => {
                    commands::cmd_transactions_recent(&session).await
                }
                Some(TransactionsAction::List {
                    from,
                    to,
                    kind,
                    account,
                    category,
                    limit,
                    json,
                }) => {
                    let args = commands::ListArgs {
                        from: from.as_deref(),
                        to: to.as_deref(),
                        kind: kind.as_deref(),
                        account: account.as_deref(),
                        category: category.as_deref(),
                        limit: Some(limit),
                    };
                    commands::cmd_transactions_list(&session, &args, json).await
                }
                Some(TransactionsAction::Add {
                    account,
                    amount,
                    kind,
                    category,
                    description,
                    date,
                }) => {
                    let args = commands::AddArgs {
                        account: &account,
                        amount,
                        kind: &kind,
                        category: category.as_deref(),
                        description: description.as_deref(),
                        date: date.as_deref(),
                    };
                    commands::cmd_transactions_add(&session, &args).await
                }
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&session, &id).await
                }
            }
        }
        Commands::Envelopes { action } => {
            let session = connect()?;
            match action {
                None => commands::cmd_envelopes_list(&session, None, None, false).await,
                Some(EnvelopesAction::List { month, year, json }) => {
                    commands::cmd_envelopes_list(&session, month, year, json).await
                }
                Some(EnvelopesAction::Add {
                    category,
                    amount,
                    month,
                    year,
                }) => commands::cmd_envelopes_add(&session, &category, amount, month, year).await,
                Some(EnvelopesAction::Update { id, amount }) => {
                    commands::cmd_envelopes_update(&session, &id, amount).await
                }
                Some(EnvelopesAction::Delete { id }) => {
                    commands::cmd_envelopes_delete(&session, &id).await
                }
            }
        }
        Commands::Subscriptions { action } => {
            let session = connect()?;
            match action {
                None => commands::cmd_subscriptions_list(&session, false).await,
                Some(SubscriptionsAction::List { json }) => {
                    commands::cmd_subscriptions_list(&session, json).await
                }
                Some(SubscriptionsAction::Add {
                    name,
                    amount,
                    cycle,
                    next_bill,
                    inactive,
                }) => {
                    commands::cmd_subscriptions_add(
                        &session,
                        &name,
                        amount,
                        &cycle,
                        next_bill.as_deref(),
                        inactive,
                    )
                    .await
                }
                Some(SubscriptionsAction::Update { id, amount, active }) => {
                    commands::cmd_subscriptions_update(&session, &id, amount, active).await
                }
                Some(SubscriptionsAction::Delete { id }) => {
                    commands::cmd_subscriptions_delete(&session, &id).await
                }
            }
        }
        Commands::Categories { action } => {
            let session = connect()?;
            match action {
                None => commands::cmd_categories_list(&session, false).await,
                Some(CategoriesAction::List { json }) => {
                    commands::cmd_categories_list(&session, json).await
                }
                Some(CategoriesAction::Add {
                    name,
                    kind,
                    icon,
                    color,
                }) => {
                    commands::cmd_categories_add(
                        &session,
                        &name,
                        &kind,
                        icon.as_deref(),
                        color.as_deref(),
                    )
                    .await
                }
                Some(CategoriesAction::Delete { id }) => {
                    commands::cmd_categories_delete(&session, &id).await
                }
            }
        }
        Commands::Settings { action } => {
            let session = connect()?;
            match action {
                None => commands::cmd_settings_show(&session, false).await,
                Some(SettingsAction::Show { json }) => {
                    commands::cmd_settings_show(&session, json).await
                }
                Some(SettingsAction::Set {
                    mode,
                    theme,
                    language,
                    currency,
                }) => {
                    let update = SettingsUpdate {
                        mode,
                        theme,
                        language,
                        currency: currency.map(|c| c.to_uppercase()),
                    };
                    commands::cmd_settings_set(&session, &update).await
                }
            }
        }
    }
}
