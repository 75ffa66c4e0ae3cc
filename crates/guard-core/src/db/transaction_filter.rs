//! Transaction filter builder
//!
//! Collects the optional list filters a caller may pass and turns them into
//! a `Query` scoped to one user, newest first.

use chrono::NaiveDate;

use super::Query;
use crate::models::TransactionType;

/// Rows returned when no limit is given
pub const DEFAULT_TRANSACTION_LIMIT: usize = 50;

/// Relations embedded in every transaction listing
pub(crate) const TRANSACTION_SELECT: &str = "*,categories(name,icon,color),accounts(name)";

/// Builder for transaction list filters
///
/// The lifetime `'query` represents how long borrowed id filters must stay
/// valid.
#[derive(Debug, Default, Clone)]
pub struct TransactionFilter<'query> {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub kind: Option<TransactionType>,
    pub account_id: Option<&'query str>,
    pub category_id: Option<&'query str>,
    pub limit: Option<usize>,
}

impl<'query> TransactionFilter<'query> {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Only transactions on or after this date
    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = date;
        self
    }

    /// Only transactions on or before this date (whole day included)
    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = date;
        self
    }

    /// Set income/expense filter
    pub fn kind(mut self, kind: Option<TransactionType>) -> Self {
        self.kind = kind;
        self
    }

    /// Set account_id filter
    pub fn account_id(mut self, id: Option<&'query str>) -> Self {
        self.account_id = id;
        self
    }

    /// Set category_id filter
    pub fn category_id(mut self, id: Option<&'query str>) -> Self {
        self.category_id = id;
        self
    }

    /// Maximum rows; defaults to 50
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Build the query for `user_id`
    pub fn build(&self, user_id: &str) -> Query {
        let mut query = Query::new()
            .select(TRANSACTION_SELECT)
            .eq("user_id", user_id);

        if let Some(start) = self.start_date {
            query = query.gte("date", start.format("%Y-%m-%d"));
        }
        if let Some(end) = self.end_date {
            query = query.lte("date", format!("{}T23:59:59.999Z", end.format("%Y-%m-%d")));
        }
        if let Some(kind) = self.kind {
            query = query.eq("type", kind.as_str());
        }
        if let Some(account_id) = self.account_id {
            query = query.eq("account_id", account_id);
        }
        if let Some(category_id) = self.category_id {
            query = query.eq("category_id", category_id);
        }

        query
            .order("date", false)
            .limit(self.limit.unwrap_or(DEFAULT_TRANSACTION_LIMIT))
    }
}
