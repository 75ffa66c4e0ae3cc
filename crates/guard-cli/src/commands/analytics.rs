//! Offline goal analytics

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use guard_core::compute_analytics;
use guard_core::models::{Goal, GoalAnalyticsResponse};

use super::{parse_opt_date, print_json};

/// Analytics for the goal row stored in `file`
pub fn analytics_from_file(file: &Path, today: Option<&str>) -> Result<GoalAnalyticsResponse> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let goal: Goal = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse goal row in {}", file.display()))?;

    let today = parse_opt_date(today, "--today")?.unwrap_or_else(|| Utc::now().date_naive());

    Ok(GoalAnalyticsResponse {
        analytics: compute_analytics(&goal, today),
    })
}

pub fn cmd_analytics(file: &Path, today: Option<&str>) -> Result<()> {
    let response = analytics_from_file(file, today)?;
    print_json(&response)
}
