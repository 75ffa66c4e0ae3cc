//! Transaction service
//!
//! Recording or removing a transaction also moves the balance of its account
//! through the `adjust_account_balance` stored procedure.

use tracing::{info, warn};

use crate::db::{RemoteDb, TransactionFilter};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction};

/// Rows shown by `recent`
pub const RECENT_TRANSACTIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct TransactionService {
    db: RemoteDb,
}

impl TransactionService {
    pub fn new(db: RemoteDb) -> Self {
        Self { db }
    }

    /// Store a transaction and apply it to the account balance
    ///
    /// The row is the record of truth: a failed balance adjustment is logged,
    /// not returned.
    pub async fn create(&self, user_id: &str, transaction: &NewTransaction) -> Result<Transaction> {
        transaction.validate()?;
        let created = self.db.insert_transaction(user_id, transaction).await?;

        let delta = transaction.kind.balance_effect(transaction.amount);
        if let Err(e) = self
            .db
            .adjust_account_balance(&transaction.account_id, delta)
            .await
        {
            warn!(
                "Failed to adjust balance of account {} by {}: {}",
                transaction.account_id, delta, e
            );
        }

        info!(
            "Recorded {} of {:.2} on account {}",
            transaction.kind, transaction.amount, transaction.account_id
        );
        Ok(created)
    }

    pub async fn list(
        &self,
        user_id: &str,
        filter: &TransactionFilter<'_>,
    ) -> Result<Vec<Transaction>> {
        self.db.list_transactions(user_id, filter).await
    }

    /// The newest few transactions
    pub async fn recent(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let filter = TransactionFilter::new().limit(Some(RECENT_TRANSACTIONS));
        self.db.list_transactions(user_id, &filter).await
    }

    /// Reverse the balance effect, then remove the row
    pub async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<()> {
        let transaction = self
            .db
            .get_transaction(user_id, transaction_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", transaction_id)))?;

        if let Some(account_id) = transaction.account_id.as_deref() {
            let reversal = -transaction.kind.balance_effect(transaction.amount);
            self.db.adjust_account_balance(account_id, reversal).await?;
        }

        self.db.delete_transaction(user_id, transaction_id).await?;
        info!("Deleted transaction {}", transaction_id);
        Ok(())
    }
}
