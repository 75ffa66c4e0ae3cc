//! Dashboard command

use anyhow::Result;
use chrono::Utc;
use guard_core::models::ChartPoint;
use guard_core::{DashboardService, Period};

use super::{print_json, Session};

const BAR_WIDTH: usize = 24;

pub async fn cmd_dashboard(session: &Session, period: &str, json: bool) -> Result<()> {
    let period = Period::from_name(period);
    let stats = DashboardService::new(session.db.clone())
        .stats(&session.user_id, period, Utc::now())
        .await?;

    if json {
        return print_json(&stats);
    }

    let delta_icon = if stats.delta >= 0.0 { "📈" } else { "📉" };

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💰 Guard Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Period:          {}", period);
    println!("  Balance:         ${:.2}", stats.balance);
    println!("  Income:          \x1b[32m+${:.2}\x1b[0m", stats.income);
    println!("  Expense:         \x1b[31m-${:.2}\x1b[0m", stats.expense);
    println!(
        "  {} {:+.1}% {}",
        delta_icon, stats.delta, stats.delta_label
    );
    println!();
    println!("  Net flow by {}:", period.bucket().unit_name());

    let net: Vec<ChartPoint> = stats
        .chart_income
        .iter()
        .zip(&stats.chart_expense)
        .map(|(income, expense)| ChartPoint {
            d: income.d.clone(),
            v: income.v - expense.v,
        })
        .filter(|p| p.v != 0.0)
        .collect();

    if net.is_empty() {
        println!("    (no transactions)");
    }
    let max = net.iter().map(|p| p.v.abs()).fold(0.0, f64::max);
    for point in &net {
        let width = ((point.v.abs() / max) * BAR_WIDTH as f64).ceil() as usize;
        let bar = if point.v >= 0.0 {
            format!("\x1b[32m{}\x1b[0m", "█".repeat(width))
        } else {
            format!("\x1b[31m{}\x1b[0m", "█".repeat(width))
        };
        println!("    {:>6} │ {} {:.2}", point.d, bar, point.v);
    }

    println!();
    Ok(())
}
