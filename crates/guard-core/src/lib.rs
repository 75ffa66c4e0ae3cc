//! Guard Core Library
//!
//! Shared functionality for the Guard personal finance backend:
//! - Goal analytics engine (streaks, schedule, health, projection)
//! - Contribution logic for savings goals
//! - Dashboard aggregation and chart bucketing
//! - Budget math for envelopes and subscriptions
//! - Categories and per-user settings
//! - Client for the hosted database's REST interface
//! - Services combining remote data with the pure modules
//! - Configuration loading

pub mod analytics;
pub mod budget;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod goals;
pub mod models;
pub mod services;

/// Test utilities including mock remote database server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analytics::{compute_analytics, round2};
pub use config::{Config, DatabaseConfig};
pub use dashboard::{DateRanges, Period};
pub use db::{Query, RemoteDb, TransactionFilter};
pub use error::{Error, Result};
pub use goals::apply_contribution;
pub use services::{
    AccountService, BudgetService, CategoryService, DashboardService, GoalService,
    SettingsService, TransactionService,
};
