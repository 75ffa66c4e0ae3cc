//! Services - business operations over the remote database
//!
//! Each service owns a cloned `RemoteDb` handle and combines remote reads and
//! writes with the pure modules (`analytics`, `goals`, `dashboard`, `budget`).
//! Callers capture `today`/`now` once and pass it in.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guard_core::{Config, RemoteDb, services::GoalService};
//!
//! let db = RemoteDb::new(&Config::load(None)?.database()?)?;
//! let goals = GoalService::new(db.clone());
//! let list = goals.list_with_analytics(user_id, today).await?;
//! ```

pub mod accounts;
pub mod budget;
pub mod categories;
pub mod dashboard;
pub mod goals;
pub mod settings;
pub mod transactions;

pub use accounts::AccountService;
pub use budget::BudgetService;
pub use categories::CategoryService;
pub use dashboard::DashboardService;
pub use goals::GoalService;
pub use settings::SettingsService;
pub use transactions::{TransactionService, RECENT_TRANSACTIONS};
