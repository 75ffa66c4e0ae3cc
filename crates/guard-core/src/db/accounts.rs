//! Account operations

use super::{Query, RemoteDb};
use crate::error::Result;
use crate::models::{Account, AccountUpdate, NewAccount};

const TABLE: &str = "accounts";

impl RemoteDb {
    /// List all accounts of a user, newest first
    pub async fn list_accounts(&self, user_id: &str) -> Result<Vec<Account>> {
        let query = Query::new()
            .eq("user_id", user_id)
            .order("created_at", false);
        self.select(TABLE, &query).await
    }

    /// Create an account
    pub async fn insert_account(&self, user_id: &str, account: &NewAccount) -> Result<Account> {
        self.insert_owned(TABLE, user_id, account).await
    }

    /// Update account fields; `None` when the account is not the user's
    pub async fn update_account(
        &self,
        user_id: &str,
        account_id: &str,
        update: &AccountUpdate,
    ) -> Result<Option<Account>> {
        let query = Query::new().eq("id", account_id).eq("user_id", user_id);
        self.update(TABLE, &query, update).await
    }

    pub async fn delete_account(&self, user_id: &str, account_id: &str) -> Result<()> {
        let query = Query::new().eq("id", account_id).eq("user_id", user_id);
        self.delete(TABLE, &query).await
    }
}
