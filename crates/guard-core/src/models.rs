//! Domain models for Guard
//!
//! Rows coming back from the remote database use snake_case field names.
//! Derived outputs (goal analytics, dashboard stats) are serialized in
//! camelCase because that is the shape the client applications consume.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Currency used when a row does not carry one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Lenient deserializers for remote rows
///
/// The hosted database returns `null` for unset columns, uuid or integer ids
/// depending on the table, and either dates or timestamps for date columns.
pub(crate) mod de {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{de::Error as _, Deserialize, Deserializer};

    /// Treat `null` the same as a missing field
    pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    /// Accept string or integer ids
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
        })
    }

    /// Accept an optional string or integer id
    pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(
            Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
                RawId::Text(s) => s,
                RawId::Int(n) => n.to_string(),
            }),
        )
    }

    pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        // Postgres text form without offset
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| parse_datetime(s).map(|dt| dt.date_naive()))
    }

    pub fn datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_datetime(&s).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", s)))
    }

    pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => parse_datetime(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", s))),
            None => Ok(None),
        }
    }

    pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => parse_date(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {}", s))),
            None => Ok(None),
        }
    }
}

// =============================================================================
// Goals
// =============================================================================

/// Contribution schedule of a piggy-bank goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PiggyType {
    /// Arithmetic daily challenge: start + n * increment on day n
    Daily,
    Weekly,
    Monthly,
    /// Ad hoc deposits
    #[default]
    Manual,
}

impl PiggyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Manual => "manual",
        }
    }
}

impl std::str::FromStr for PiggyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown piggy type: {}", s)),
        }
    }
}

impl std::fmt::Display for PiggyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for PiggyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PiggyType {
    /// Unknown schedules are read as manual
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// Lifecycle status of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl Serialize for GoalStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GoalStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.to_lowercase().as_str() {
            "completed" => Self::Completed,
            _ => Self::Active,
        })
    }
}

/// A savings goal as stored remotely
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Goal {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub target_amount: f64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub saved_already: f64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub is_piggy_bank: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub piggy_type: PiggyType,
    #[serde(default, deserialize_with = "de::nullable")]
    pub start_amount: f64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub increment_amount: f64,
    /// Day 0 of the arithmetic schedule
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::opt_date")]
    pub last_contribution_date: Option<NaiveDate>,
    /// Authoritative when non-zero
    #[serde(default, deserialize_with = "de::nullable")]
    pub current_streak: i64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub notify_on_risk: bool,
    #[serde(default)]
    pub notify_inactivity_days: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub status: GoalStatus,
}

impl Goal {
    /// Whether this goal follows the arithmetic daily challenge
    pub fn is_daily_challenge(&self) -> bool {
        self.is_piggy_bank && self.piggy_type == PiggyType::Daily
    }

    /// Currency code, falling back to USD
    pub fn currency_or_default(&self) -> &str {
        match self.currency.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => DEFAULT_CURRENCY,
        }
    }
}

/// Input for creating a goal
///
/// Optional fields carry documented defaults so the remote row never depends
/// on whatever the caller happened to omit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    /// Defaults to 0
    #[serde(default)]
    pub saved_already: f64,
    #[serde(default)]
    pub is_piggy_bank: bool,
    /// Defaults to manual
    #[serde(default)]
    pub piggy_type: PiggyType,
    #[serde(default)]
    pub start_amount: f64,
    #[serde(default)]
    pub increment_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub notify_on_risk: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_inactivity_days: Option<i64>,
    /// Defaults to USD
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl NewGoal {
    /// Minimal goal with every optional field at its default
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            name: name.into(),
            target_amount,
            saved_already: 0.0,
            is_piggy_bank: false,
            piggy_type: PiggyType::Manual,
            start_amount: 0.0,
            increment_amount: 0.0,
            deadline: None,
            notify_on_risk: false,
            notify_inactivity_days: None,
            currency: default_currency(),
        }
    }

    /// Reject input that would produce a nonsensical goal row
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData("goal name is required".into()));
        }
        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(Error::InvalidData(
                "target_amount must be greater than 0".into(),
            ));
        }
        for (field, value) in [
            ("saved_already", self.saved_already),
            ("start_amount", self.start_amount),
            ("increment_amount", self.increment_amount),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidData(format!("{} must be >= 0", field)));
            }
        }
        if matches!(self.notify_inactivity_days, Some(days) if days < 1) {
            return Err(Error::InvalidData(
                "notify_inactivity_days must be at least 1".into(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::InvalidData("currency cannot be blank".into()));
        }
        Ok(())
    }
}

/// Field changes written back after a contribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalUpdate {
    pub saved_already: f64,
    pub last_contribution_date: NaiveDate,
    pub status: GoalStatus,
    pub current_streak: i64,
}

/// Health of a goal relative to its contribution schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    OnTrack,
    /// Inactive past the goal's notification threshold
    AtRisk,
    /// Daily challenge missed at least one day
    Behind,
}

impl HealthStatus {
    /// Status message shown to clients
    pub fn message(&self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk | Self::Behind => "At Risk",
        }
    }

    /// Localized label
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "A tiempo",
            Self::AtRisk => "En riesgo",
            Self::Behind => "Atrasado",
        }
    }
}

/// One day of the forward contribution schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionEntry {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Derived metrics for a goal, recomputed on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAnalytics {
    pub current_streak: i64,
    pub next_payment_amount: f64,
    pub days_remaining: Option<i64>,
    pub percentage: f64,
    pub status_health: String,
    pub status_message: String,
    pub projection: Option<f64>,
    pub streak_freeze_available: bool,
    pub arithmetic_progression: Vec<ProgressionEntry>,
    pub is_today_paid: bool,
    pub currency: String,
}

/// Analytics wrapped the way clients expect it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalAnalyticsResponse {
    pub analytics: GoalAnalytics,
}

/// A goal row with its analytics attached
#[derive(Debug, Clone, Serialize)]
pub struct GoalWithAnalytics {
    #[serde(flatten)]
    pub goal: Goal,
    pub analytics: GoalAnalytics,
}

// =============================================================================
// Accounts
// =============================================================================

/// A money account (cash, bank, card)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub balance: f64,
    #[serde(default)]
    pub currency: Option<String>,
    /// Hidden accounts are excluded from balance totals
    #[serde(default, deserialize_with = "de::nullable")]
    pub is_hidden: bool,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for creating an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default)]
    pub balance: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub is_hidden: bool,
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData("account name is required".into()));
        }
        if !self.balance.is_finite() {
            return Err(Error::InvalidData("balance must be a number".into()));
        }
        Ok(())
    }
}

/// Partial account update; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl AccountUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.account_type.is_none()
            && self.is_hidden.is_none()
            && self.currency.is_none()
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// Direction of a transaction; amounts are always stored as magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Signed effect of `amount` on an account balance
    pub fn balance_effect(&self, amount: f64) -> f64 {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category fields embedded in transaction and envelope rows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Account name embedded in transaction rows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountRef {
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
}

/// A recorded income or expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "de::datetime")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<AccountRef>,
}

/// Input for recording a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(Error::InvalidData("account_id is required".into()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidData("amount must be greater than 0".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Subscriptions
// =============================================================================

/// How often a subscription bills
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BillingCycle {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
    /// Unrecognized cycle, kept verbatim and counted as monthly
    Other(String),
}

impl BillingCycle {
    /// Parse a cycle name, keeping unrecognized names as `Other`
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" | "annual" => Self::Yearly,
            _ => Self::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Other(s) => s,
        }
    }
}

impl std::str::FromStr for BillingCycle {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for BillingCycle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BillingCycle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_name(&s))
    }
}

/// A recurring charge the user tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub billing_cycle: BillingCycle,
    #[serde(default, deserialize_with = "de::opt_date")]
    pub next_bill_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub is_active: bool,
}

/// Input for tracking a subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubscription {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub billing_cycle: BillingCycle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_bill_date: Option<NaiveDate>,
    /// Defaults to true
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewSubscription {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData("subscription name is required".into()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidData("amount must be >= 0".into()));
        }
        Ok(())
    }
}

/// Partial subscription update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<BillingCycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_bill_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Subscription annotated with its monthly-equivalent cost
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedSubscription {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub normalized_monthly: f64,
}

/// All subscriptions plus the monthly drain of the active ones
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionSummary {
    pub total_monthly_drain: f64,
    pub subscriptions: Vec<NormalizedSubscription>,
}

// =============================================================================
// Budget envelopes
// =============================================================================

/// Monthly budget allocation for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetEnvelope {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub budget_amount: f64,
    pub period_month: u32,
    pub period_year: i32,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

/// Input for creating an envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEnvelope {
    pub category_id: String,
    pub budget_amount: f64,
    pub period_month: u32,
    pub period_year: i32,
}

impl NewEnvelope {
    pub fn validate(&self) -> Result<()> {
        if self.category_id.trim().is_empty() {
            return Err(Error::InvalidData("category_id is required".into()));
        }
        if !self.budget_amount.is_finite() || self.budget_amount < 0.0 {
            return Err(Error::InvalidData("budget_amount must be >= 0".into()));
        }
        if !(1..=12).contains(&self.period_month) {
            return Err(Error::InvalidData(format!(
                "period_month must be 1-12, got {}",
                self.period_month
            )));
        }
        Ok(())
    }
}

/// Partial envelope update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_amount: Option<f64>,
}

/// Envelope with the amount already spent in its category
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeSummary {
    pub id: String,
    pub budget_amount: f64,
    pub spent: f64,
    pub period_month: u32,
    pub period_year: i32,
    pub category: Option<CategoryRef>,
}

// =============================================================================
// Categories
// =============================================================================

/// A spending or income category; global when it has no owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<TransactionType>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Category {
    /// Shared by every user and not deletable by any of them
    pub fn is_global(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Input for creating a personal category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData("name is required".into()));
        }
        if let Some(color) = &self.color {
            let hex = color.strip_prefix('#').unwrap_or_default();
            let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
            if !valid {
                return Err(Error::InvalidData(format!(
                    "color must be a hex value like #FF0000, got {}",
                    color
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Settings
// =============================================================================

pub const DEFAULT_MODE: &str = "dark";
pub const DEFAULT_THEME: &str = "Neon";
pub const DEFAULT_LANGUAGE: &str = "es";

/// Per-user display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::opt_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            user_id: None,
            mode: Some(DEFAULT_MODE.to_string()),
            theme: Some(DEFAULT_THEME.to_string()),
            language: Some(DEFAULT_LANGUAGE.to_string()),
            currency: Some(DEFAULT_CURRENCY.to_string()),
            updated_at: None,
        }
    }
}

impl UserSettings {
    /// Fill unset preferences with the application defaults
    pub fn with_defaults(self) -> Self {
        let defaults = Self::default();
        Self {
            mode: self.mode.or(defaults.mode),
            theme: self.theme.or(defaults.theme),
            language: self.language.or(defaults.language),
            currency: self.currency.or(defaults.currency),
            ..self
        }
    }
}

/// Partial settings update; unset fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.theme.is_none()
            && self.language.is_none()
            && self.currency.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("mode", &self.mode),
            ("theme", &self.theme),
            ("language", &self.language),
            ("currency", &self.currency),
        ];
        for (field, value) in fields {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(Error::InvalidData(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// One point of a dashboard chart: bucket label and value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub d: String,
    pub v: f64,
}

/// Dashboard summary for one period
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Total of visible accounts
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
    /// Percent change of net flow versus the previous period
    pub delta: f64,
    pub delta_label: String,
    pub chart_balance: Vec<ChartPoint>,
    pub chart_income: Vec<ChartPoint>,
    pub chart_expense: Vec<ChartPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_goal_nulls_default_to_zero() {
        let goal: Goal = serde_json::from_value(json!({
            "id": "g1",
            "target_amount": null,
            "saved_already": null,
            "is_piggy_bank": null,
            "piggy_type": null,
            "current_streak": null,
            "created_at": "2024-03-01T10:15:00.123456+00:00",
            "deadline": "2024-12-31",
            "last_contribution_date": null
        }))
        .unwrap();

        assert_eq!(goal.target_amount, 0.0);
        assert_eq!(goal.saved_already, 0.0);
        assert!(!goal.is_piggy_bank);
        assert_eq!(goal.piggy_type, PiggyType::Manual);
        assert_eq!(goal.current_streak, 0);
        assert_eq!(goal.deadline, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert!(goal.last_contribution_date.is_none());
        assert_eq!(
            goal.created_at.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(goal.currency_or_default(), "USD");
        assert_eq!(goal.status, GoalStatus::Active);
    }

    #[test]
    fn test_goal_integer_id_and_unknown_piggy_type() {
        let goal: Goal = serde_json::from_value(json!({
            "id": 42,
            "piggy_type": "fortnightly",
            "status": "completed",
            "currency": "EUR"
        }))
        .unwrap();

        assert_eq!(goal.id, "42");
        assert_eq!(goal.piggy_type, PiggyType::Manual);
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.currency_or_default(), "EUR");
    }

    #[test]
    fn test_daily_challenge_requires_piggy_flag() {
        let mut goal = Goal {
            piggy_type: PiggyType::Daily,
            ..Default::default()
        };
        assert!(!goal.is_daily_challenge());
        goal.is_piggy_bank = true;
        assert!(goal.is_daily_challenge());
    }

    #[test]
    fn test_new_goal_defaults() {
        let goal: NewGoal =
            serde_json::from_value(json!({"name": "Trip", "target_amount": 500.0})).unwrap();
        assert_eq!(goal.currency, "USD");
        assert_eq!(goal.piggy_type, PiggyType::Manual);
        assert!(!goal.notify_on_risk);
        assert!(goal.validate().is_ok());
    }

    #[test]
    fn test_new_goal_validation() {
        assert!(NewGoal::new("", 10.0).validate().is_err());
        assert!(NewGoal::new("Car", 0.0).validate().is_err());

        let mut goal = NewGoal::new("Car", 10.0);
        goal.increment_amount = -1.0;
        assert!(goal.validate().is_err());

        let mut goal = NewGoal::new("Car", 10.0);
        goal.notify_inactivity_days = Some(0);
        assert!(goal.validate().is_err());
    }

    #[test]
    fn test_transaction_accepts_bare_date() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "t1",
            "amount": 12.5,
            "type": "expense",
            "date": "2024-05-02"
        }))
        .unwrap();
        assert_eq!(tx.kind, TransactionType::Expense);
        assert_eq!(tx.date.date_naive(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(tx.kind.balance_effect(tx.amount), -12.5);
    }

    #[test]
    fn test_billing_cycle_keeps_unknown_values() {
        let sub: Subscription = serde_json::from_value(json!({
            "id": "s1",
            "name": "Gym",
            "amount": 30,
            "billing_cycle": "quarterly",
            "is_active": true
        }))
        .unwrap();
        assert_eq!(sub.billing_cycle, BillingCycle::Other("quarterly".into()));
        assert_eq!(
            serde_json::to_value(&sub).unwrap()["billing_cycle"],
            json!("quarterly")
        );
    }

    #[test]
    fn test_health_status_labels() {
        assert_eq!(HealthStatus::OnTrack.message(), "On Track");
        assert_eq!(HealthStatus::AtRisk.label(), "En riesgo");
        assert_eq!(HealthStatus::Behind.message(), "At Risk");
        assert_eq!(HealthStatus::Behind.label(), "Atrasado");
    }

    #[test]
    fn test_category_without_owner_is_global() {
        let global: Category = serde_json::from_value(json!({
            "id": 3,
            "user_id": null,
            "name": "Food",
            "type": "expense"
        }))
        .unwrap();
        assert!(global.is_global());
        assert_eq!(global.kind, Some(TransactionType::Expense));

        let own: Category =
            serde_json::from_value(json!({"id": "c9", "user_id": "u1", "name": "Games"})).unwrap();
        assert!(!own.is_global());
        assert!(own.kind.is_none());
    }

    #[test]
    fn test_new_category_validation() {
        let mut category = NewCategory {
            name: "Streaming".into(),
            kind: TransactionType::Expense,
            icon: Some("Youtube".into()),
            color: Some("#FF0000".into()),
        };
        assert!(category.validate().is_ok());

        category.color = Some("red".into());
        assert!(category.validate().is_err());

        category.color = None;
        category.name = "  ".into();
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_settings_fill_defaults() {
        let settings: UserSettings = serde_json::from_value(json!({
            "user_id": "u1",
            "mode": "light",
            "theme": null,
            "updated_at": "2024-03-01T12:00:00+00:00"
        }))
        .unwrap();

        let settings = settings.with_defaults();
        assert_eq!(settings.mode.as_deref(), Some("light"));
        assert_eq!(settings.theme.as_deref(), Some(DEFAULT_THEME));
        assert_eq!(settings.language.as_deref(), Some(DEFAULT_LANGUAGE));
        assert_eq!(settings.currency.as_deref(), Some(DEFAULT_CURRENCY));
        assert!(settings.updated_at.is_some());
    }

    #[test]
    fn test_settings_update_validation() {
        assert!(SettingsUpdate::default().is_empty());

        let update = SettingsUpdate {
            language: Some("en".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert!(update.validate().is_ok());

        let blank = SettingsUpdate {
            theme: Some(" ".into()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }
}
