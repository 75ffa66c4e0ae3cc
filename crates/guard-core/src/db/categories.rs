//! Category operations

use super::{Query, RemoteDb};
use crate::error::Result;
use crate::models::{Category, NewCategory};

const TABLE: &str = "categories";

impl RemoteDb {
    /// Global categories plus the user's own, ordered by name
    pub async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        let own = format!("user_id.eq.{}", user_id);
        let query = Query::new()
            .or(&["user_id.is.null", own.as_str()])
            .order("name", true);
        self.select(TABLE, &query).await
    }

    /// A category owned by `user_id`; global categories never match
    pub async fn get_owned_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<Option<Category>> {
        let query = Query::new().eq("id", category_id).eq("user_id", user_id);
        self.select_one(TABLE, query).await
    }

    pub async fn insert_category(&self, user_id: &str, category: &NewCategory) -> Result<Category> {
        self.insert_owned(TABLE, user_id, category).await
    }

    pub async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()> {
        let query = Query::new().eq("id", category_id).eq("user_id", user_id);
        self.delete(TABLE, &query).await
    }
}
