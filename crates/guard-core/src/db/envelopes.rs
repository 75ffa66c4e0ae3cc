//! Budget envelope operations

use serde::Deserialize;

use super::{Query, RemoteDb};
use crate::error::Result;
use crate::models::{de, BudgetEnvelope, EnvelopeUpdate, NewEnvelope};

const TABLE: &str = "budget_envelopes";

/// Envelope columns with the category embedded under `category`
const ENVELOPE_SELECT: &str =
    "id,budget_amount,period_month,period_year,category:categories(id,name,icon,color)";

#[derive(Deserialize)]
struct IdRow {
    #[serde(deserialize_with = "de::id")]
    id: String,
}

impl RemoteDb {
    /// Envelopes of one calendar month
    pub async fn list_envelopes(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Vec<BudgetEnvelope>> {
        let query = Query::new()
            .select(ENVELOPE_SELECT)
            .eq("user_id", user_id)
            .eq("period_month", month)
            .eq("period_year", year);
        self.select(TABLE, &query).await
    }

    /// Id of an existing envelope for the same category and month
    pub async fn find_envelope(
        &self,
        user_id: &str,
        category_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<String>> {
        let query = Query::new()
            .select("id")
            .eq("user_id", user_id)
            .eq("category_id", category_id)
            .eq("period_month", month)
            .eq("period_year", year);
        let row: Option<IdRow> = self.select_one(TABLE, query).await?;
        Ok(row.map(|r| r.id))
    }

    pub async fn insert_envelope(
        &self,
        user_id: &str,
        envelope: &NewEnvelope,
    ) -> Result<BudgetEnvelope> {
        self.insert_owned(TABLE, user_id, envelope).await
    }

    pub async fn update_envelope(
        &self,
        user_id: &str,
        envelope_id: &str,
        update: &EnvelopeUpdate,
    ) -> Result<Option<BudgetEnvelope>> {
        let query = Query::new().eq("id", envelope_id).eq("user_id", user_id);
        self.update(TABLE, &query, update).await
    }

    pub async fn delete_envelope(&self, user_id: &str, envelope_id: &str) -> Result<()> {
        let query = Query::new().eq("id", envelope_id).eq("user_id", user_id);
        self.delete(TABLE, &query).await
    }
}
