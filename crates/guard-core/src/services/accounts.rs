//! Account service

use tracing::info;

use crate::analytics::round2;
use crate::budget::total_visible_balance;
use crate::db::RemoteDb;
use crate::error::{Error, Result};
use crate::models::{Account, AccountUpdate, NewAccount};

#[derive(Debug, Clone)]
pub struct AccountService {
    db: RemoteDb,
}

impl AccountService {
    pub fn new(db: RemoteDb) -> Self {
        Self { db }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Account>> {
        self.db.list_accounts(user_id).await
    }

    pub async fn create(&self, user_id: &str, account: &NewAccount) -> Result<Account> {
        account.validate()?;
        let created = self.db.insert_account(user_id, account).await?;
        info!("Created account {} ({})", created.name, created.id);
        Ok(created)
    }

    /// Rename, re-type, hide or re-currency an account; balances only move
    /// through transactions
    pub async fn update(
        &self,
        user_id: &str,
        account_id: &str,
        update: &AccountUpdate,
    ) -> Result<Account> {
        if update.is_empty() {
            return Err(Error::InvalidData("no fields to update".into()));
        }
        self.db
            .update_account(user_id, account_id, update)
            .await?
            .ok_or_else(|| Error::NotFound(format!("account {}", account_id)))
    }

    pub async fn delete(&self, user_id: &str, account_id: &str) -> Result<()> {
        self.db.delete_account(user_id, account_id).await?;
        info!("Deleted account {}", account_id);
        Ok(())
    }

    /// Sum of all visible balances
    pub async fn total_balance(&self, user_id: &str) -> Result<f64> {
        let accounts = self.db.list_accounts(user_id).await?;
        Ok(round2(total_visible_balance(&accounts)))
    }
}
