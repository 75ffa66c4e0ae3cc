//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_session, date parsing, JSON output)
//! - `analytics` - Offline goal analytics from a JSON row
//! - `goals` - Goal commands (list, show, add, contribute, delete)
//! - `dashboard` - Period dashboard
//! - `accounts` - Account commands
//! - `transactions` - Transaction commands (list, recent, add, delete)
//! - `budget` - Envelope and subscription commands
//! - `categories` - Category commands
//! - `settings` - Display preference commands

pub mod accounts;
pub mod analytics;
pub mod budget;
pub mod categories;
pub mod core;
pub mod dashboard;
pub mod goals;
pub mod settings;
pub mod transactions;

// Re-export command functions for main.rs
pub use accounts::*;
pub use analytics::*;
pub use budget::*;
pub use categories::*;
pub use core::*;
pub use dashboard::*;
pub use goals::*;
pub use settings::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
