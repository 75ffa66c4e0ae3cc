//! Shared command utilities
//!
//! This module contains:
//! - `Session` - Remote database handle plus the acting user
//! - `open_session` - Load config and connect
//! - `parse_date` / `print_json` - Argument and output helpers

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use guard_core::{Config, RemoteDb};
use serde::Serialize;
use tracing::debug;

/// Everything a remote command needs
pub struct Session {
    pub db: RemoteDb,
    pub user_id: String,
}

/// Load configuration, resolve the user and build the database client
pub fn open_session(config_path: Option<&Path>, user: Option<&str>) -> Result<Session> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let database = config
        .database()
        .context("Remote database is not configured")?;

    let user_id = user
        .map(str::to_string)
        .or(config.user_id)
        .context("No user selected. Pass --user or set GUARD_USER_ID")?;

    debug!("Connecting to {} as {}", database.url, user_id);
    let db = RemoteDb::new(&database).context("Failed to create database client")?;

    Ok(Session { db, user_id })
}

/// Parse a YYYY-MM-DD argument
pub fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid {} '{}' (use YYYY-MM-DD)", flag, value))
}

/// Parse an optional YYYY-MM-DD argument
pub fn parse_opt_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value.map(|v| parse_date(v, flag)).transpose()
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
