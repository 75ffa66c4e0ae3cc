//! Dashboard aggregation
//!
//! Period date ranges, "vs last period" labels, and the time-bucketed chart
//! series shown on the dashboard. Transactions are fetched by the caller;
//! these functions only reshape them.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::round2;
use crate::budget::total_visible_balance;
use crate::models::{Account, ChartPoint, DashboardStats, Transaction, TransactionType};

/// Upper bound on points in one chart series
pub const MAX_CHART_POINTS: usize = 367;

/// Reporting period selectable on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl Period {
    /// Parse a period name case-insensitively; unknown names mean Month
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "day" => Self::Day,
            "week" => Self::Week,
            "year" => Self::Year,
            _ => Self::Month,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }

    /// Chart bucket size for this period
    pub fn bucket(&self) -> Bucket {
        match self {
            Self::Day => Bucket::Hour,
            Self::Week | Self::Month => Bucket::Day,
            Self::Year => Bucket::Month,
        }
    }
}

impl std::str::FromStr for Period {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Comparison label shown next to the delta
pub fn delta_label(period: Period) -> &'static str {
    match period {
        Period::Day => "vs yesterday",
        Period::Week => "vs last week",
        Period::Month => "vs last month",
        Period::Year => "vs last year",
    }
}

/// Time unit of one chart point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Hour,
    Day,
    Month,
}

impl Bucket {
    pub fn unit_name(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
        }
    }

    fn label(&self, at: DateTime<Utc>) -> String {
        let fmt = match self {
            Self::Hour => "%H:00",
            Self::Day => "%d/%m",
            Self::Month => "%b",
        };
        at.format(fmt).to_string()
    }

    fn step(&self, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Hour => at.checked_add_signed(Duration::hours(1)),
            Self::Day => at.checked_add_signed(Duration::days(1)),
            Self::Month => at.checked_add_months(Months::new(1)),
        }
    }
}

/// Current and previous period bounds, inclusive at millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRanges {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub prev_start: DateTime<Utc>,
    pub prev_end: DateTime<Utc>,
}

impl DateRanges {
    /// Ranges for the period containing `now` and the one before it (UTC,
    /// weeks start on Sunday)
    pub fn for_period(period: Period, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let start_date = period_start(period, today);
        let next_start = shift_period(period, start_date, 1);
        let prev_start = shift_period(period, start_date, -1);

        let start = midnight(start_date);
        Self {
            start,
            end: midnight(next_start) - Duration::milliseconds(1),
            prev_start: midnight(prev_start),
            prev_end: start - Duration::milliseconds(1),
        }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn period_start(period: Period, today: NaiveDate) -> NaiveDate {
    match period {
        Period::Day => today,
        Period::Week => today - Duration::days(today.weekday().num_days_from_sunday() as i64),
        Period::Month => today.with_day(1).unwrap_or(today),
        Period::Year => today.with_ordinal(1).unwrap_or(today),
    }
}

/// Move a period start by `n` whole periods
fn shift_period(period: Period, start: NaiveDate, n: i32) -> NaiveDate {
    let months = |count: u32| Months::new(count * n.unsigned_abs());
    let shifted = match period {
        Period::Day => start.checked_add_signed(Duration::days(n as i64)),
        Period::Week => start.checked_add_signed(Duration::weeks(n as i64)),
        Period::Month if n >= 0 => start.checked_add_months(months(1)),
        Period::Month => start.checked_sub_months(months(1)),
        Period::Year if n >= 0 => start.checked_add_months(months(12)),
        Period::Year => start.checked_sub_months(months(12)),
    };
    shifted.unwrap_or(start)
}

/// How chart values are accumulated
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartMode {
    /// Sum of amounts per bucket
    Flow,
    /// Running account balance ending at `current_total`
    Balance { current_total: f64 },
}

/// Bucket transactions into one chart point per unit between `start` and
/// `end`
///
/// In balance mode income adds and expenses subtract, and the series is then
/// rebuilt backwards from `current_total` so the last point is today's
/// balance.
pub fn format_chart_data(
    transactions: &[Transaction],
    period: Period,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    mode: ChartMode,
) -> Vec<ChartPoint> {
    let bucket = period.bucket();
    let is_balance = matches!(mode, ChartMode::Balance { .. });

    let mut grouped: HashMap<String, f64> = HashMap::new();
    for tx in transactions {
        let value = if is_balance {
            tx.kind.balance_effect(tx.amount)
        } else {
            tx.amount
        };
        *grouped.entry(bucket.label(tx.date)).or_insert(0.0) += value;
    }

    let mut points = Vec::new();
    let mut current = Some(start);
    while let Some(at) = current.filter(|at| *at <= end) {
        let label = bucket.label(at);
        let v = grouped.get(&label).copied().unwrap_or(0.0);
        points.push(ChartPoint { d: label, v });
        if points.len() >= MAX_CHART_POINTS {
            break;
        }
        current = bucket.step(at);
    }

    if let ChartMode::Balance { current_total } = mode {
        let mut running = current_total;
        for point in points.iter_mut().rev() {
            let net = point.v;
            point.v = running;
            running -= net;
        }
    }

    for point in &mut points {
        point.v = round2(point.v);
    }
    points
}

/// Income and expense totals of a set of transactions
pub fn flow_totals(transactions: &[Transaction]) -> (f64, f64) {
    transactions
        .iter()
        .fold((0.0, 0.0), |(income, expense), tx| match tx.kind {
            TransactionType::Income => (income + tx.amount, expense),
            TransactionType::Expense => (income, expense + tx.amount),
        })
}

/// Percent change of `current` over `previous`, one decimal; 0 when there is
/// nothing to compare against
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    let delta = (current - previous) / previous.abs() * 100.0;
    (delta * 10.0).round() / 10.0
}

impl DashboardStats {
    /// Build the dashboard from already-fetched rows
    pub fn compute(
        accounts: &[Account],
        current: &[Transaction],
        previous: &[Transaction],
        period: Period,
        ranges: &DateRanges,
    ) -> Self {
        let balance = total_visible_balance(accounts);
        let (income, expense) = flow_totals(current);
        let (prev_income, prev_expense) = flow_totals(previous);

        let (incomes, expenses): (Vec<Transaction>, Vec<Transaction>) = current
            .iter()
            .cloned()
            .partition(|tx| tx.kind == TransactionType::Income);

        Self {
            balance: round2(balance),
            income: round2(income),
            expense: round2(expense),
            delta: percent_change(income - expense, prev_income - prev_expense),
            delta_label: delta_label(period).to_string(),
            chart_balance: format_chart_data(
                current,
                period,
                ranges.start,
                ranges.end,
                ChartMode::Balance {
                    current_total: balance,
                },
            ),
            chart_income: format_chart_data(
                &incomes,
                period,
                ranges.start,
                ranges.end,
                ChartMode::Flow,
            ),
            chart_expense: format_chart_data(
                &expenses,
                period,
                ranges.start,
                ranges.end,
                ChartMode::Flow,
            ),
        }
    }
}
