//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Guard - Savings goals, budgets and spending dashboards
#[derive(Parser)]
#[command(name = "guard")]
#[command(about = "Personal finance backend: goals, budgets and dashboards", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.config/guard/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User to act on behalf of (overrides GUARD_USER_ID and the config file)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute goal analytics from a goal row saved as JSON (no database needed)
    Analytics {
        /// JSON file holding one goal row
        #[arg(short, long)]
        file: PathBuf,

        /// Evaluate as of this date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
    },

    /// Manage savings goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Show balance, income, expense and charts for a period
    Dashboard {
        /// Period: day, week, month, year
        #[arg(short, long, default_value = "month")]
        period: String,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage accounts
    Accounts {
        #[command(subcommand)]
        action: Option<AccountsAction>,
    },

    /// Manage transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage monthly budget envelopes
    Envelopes {
        #[command(subcommand)]
        action: Option<EnvelopesAction>,
    },

    /// Manage recurring subscriptions
    Subscriptions {
        #[command(subcommand)]
        action: Option<SubscriptionsAction>,
    },

    /// Manage spending and income categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Show or change display preferences
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List goals with analytics
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show analytics for one goal
    Show {
        /// Goal ID
        id: String,
    },

    /// Create a goal
    Add {
        /// Goal name
        #[arg(long)]
        name: String,

        /// Target amount
        #[arg(long)]
        target: f64,

        /// Piggy-bank schedule: daily, weekly, monthly, manual
        #[arg(long)]
        piggy: Option<String>,

        /// First scheduled contribution
        #[arg(long, default_value = "0")]
        start: f64,

        /// Daily increase of the scheduled contribution
        #[arg(long, default_value = "0")]
        increment: f64,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,

        /// Flag the goal at risk after this many idle days
        #[arg(long)]
        notify_after: Option<i64>,

        /// Currency code
        #[arg(long, default_value = "USD")]
        currency: String,
    },

    /// Record a deposit towards a goal
    Contribute {
        /// Goal ID
        id: String,

        /// Amount deposited
        amount: f64,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AccountsAction {
    /// List accounts
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account
    Add {
        /// Account name
        #[arg(long)]
        name: String,

        /// Account type (cash, bank, card, ...)
        #[arg(long = "type")]
        kind: Option<String>,

        /// Opening balance
        #[arg(long, default_value = "0")]
        balance: f64,

        /// Currency code
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Exclude from balance totals
        #[arg(long)]
        hidden: bool,
    },

    /// Rename or hide/unhide an account
    Update {
        /// Account ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Hide (true) or show (false) the account
        #[arg(long)]
        hidden: Option<bool>,
    },

    /// Delete an account
    Delete {
        /// Account ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// income or expense
        #[arg(long = "type")]
        kind: Option<String>,

        /// Account ID
        #[arg(long)]
        account: Option<String>,

        /// Category ID
        #[arg(long)]
        category: Option<String>,

        /// Number of transactions to show
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the five newest transactions
    Recent,

    /// Record a transaction and update the account balance
    Add {
        /// Account ID
        #[arg(long)]
        account: String,

        /// Amount (positive)
        #[arg(long)]
        amount: f64,

        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        kind: String,

        /// Category ID
        #[arg(long)]
        category: Option<String>,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction and reverse its balance effect
    Delete {
        /// Transaction ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum EnvelopesAction {
    /// List envelopes of a month with spending
    List {
        /// Month (1-12), defaults to the current month
        #[arg(long)]
        month: Option<u32>,

        /// Year, defaults to the current year
        #[arg(long)]
        year: Option<i32>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an envelope for a category
    Add {
        /// Category ID
        #[arg(long)]
        category: String,

        /// Budgeted amount
        #[arg(long)]
        amount: f64,

        /// Month (1-12), defaults to the current month
        #[arg(long)]
        month: Option<u32>,

        /// Year, defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },

    /// Change the budgeted amount
    Update {
        /// Envelope ID
        id: String,

        /// New budgeted amount
        #[arg(long)]
        amount: f64,
    },

    /// Delete an envelope
    Delete {
        /// Envelope ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum SubscriptionsAction {
    /// List subscriptions and the monthly drain
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Track a subscription
    Add {
        /// Service name
        #[arg(long)]
        name: String,

        /// Amount per billing cycle
        #[arg(long)]
        amount: f64,

        /// Billing cycle: daily, weekly, monthly, yearly
        #[arg(long, default_value = "monthly")]
        cycle: String,

        /// Next bill date (YYYY-MM-DD)
        #[arg(long)]
        next_bill: Option<String>,

        /// Track as paused
        #[arg(long)]
        inactive: bool,
    },

    /// Change amount or pause/resume a subscription
    Update {
        /// Subscription ID
        id: String,

        /// New amount per billing cycle
        #[arg(long)]
        amount: Option<f64>,

        /// Active (true) or paused (false)
        #[arg(long)]
        active: Option<bool>,
    },

    /// Stop tracking a subscription
    Delete {
        /// Subscription ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List global categories and your own
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a personal category
    Add {
        /// Category name
        #[arg(long)]
        name: String,

        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        kind: String,

        /// Icon name
        #[arg(long)]
        icon: Option<String>,

        /// Hex color (#RRGGBB)
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete one of your categories
    Delete {
        /// Category ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Change one or more settings
    Set {
        /// Display mode (dark, light)
        #[arg(long)]
        mode: Option<String>,

        /// Theme name
        #[arg(long)]
        theme: Option<String>,

        /// Language code
        #[arg(long)]
        language: Option<String>,

        /// Currency code
        #[arg(long)]
        currency: Option<String>,
    },
}
