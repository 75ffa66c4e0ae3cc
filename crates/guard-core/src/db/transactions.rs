//! Transaction operations

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::transaction_filter::TRANSACTION_SELECT;
use super::{Query, RemoteDb, TransactionFilter};
use crate::error::Result;
use crate::models::{NewTransaction, Transaction};

const TABLE: &str = "transactions";

/// Stored procedure that adds `amount_param` to an account balance
const ADJUST_BALANCE_RPC: &str = "adjust_account_balance";

#[derive(Serialize)]
struct AdjustBalanceParams<'a> {
    account_id_param: &'a str,
    amount_param: f64,
}

impl RemoteDb {
    /// List transactions matching `filter`, newest first
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter<'_>,
    ) -> Result<Vec<Transaction>> {
        self.select(TABLE, &filter.build(user_id)).await
    }

    /// Transactions dated within `[start, end]`
    pub async fn transactions_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        let query = Query::new()
            .select("id,amount,type,date,category_id")
            .eq("user_id", user_id)
            .gte("date", start.to_rfc3339())
            .lte("date", end.to_rfc3339());
        self.select(TABLE, &query).await
    }

    /// Expense rows of the given categories within `[start, end]`
    pub async fn expenses_for_categories(
        &self,
        user_id: &str,
        category_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        let query = Query::new()
            .select("id,category_id,amount,type,date")
            .eq("user_id", user_id)
            .eq("type", "expense")
            .gte("date", start.to_rfc3339())
            .lte("date", end.to_rfc3339())
            .in_list("category_id", category_ids);
        self.select(TABLE, &query).await
    }

    /// Get a transaction owned by `user_id`
    pub async fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Option<Transaction>> {
        let query = Query::new()
            .select(TRANSACTION_SELECT)
            .eq("id", transaction_id)
            .eq("user_id", user_id);
        self.select_one(TABLE, query).await
    }

    pub async fn insert_transaction(
        &self,
        user_id: &str,
        transaction: &NewTransaction,
    ) -> Result<Transaction> {
        self.insert_owned(TABLE, user_id, transaction).await
    }

    pub async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()> {
        let query = Query::new().eq("id", transaction_id).eq("user_id", user_id);
        self.delete(TABLE, &query).await
    }

    /// Add `amount` (signed) to an account balance via the stored procedure
    pub async fn adjust_account_balance(&self, account_id: &str, amount: f64) -> Result<()> {
        self.rpc(
            ADJUST_BALANCE_RPC,
            &AdjustBalanceParams {
                account_id_param: account_id,
                amount_param: amount,
            },
        )
        .await
    }
}
