//! Subscription operations

use super::{Query, RemoteDb};
use crate::error::Result;
use crate::models::{NewSubscription, Subscription, SubscriptionUpdate};

const TABLE: &str = "subscriptions";

impl RemoteDb {
    /// List subscriptions ordered by next bill date
    pub async fn list_subscriptions(&self, user_id: &str) -> Result<Vec<Subscription>> {
        let query = Query::new()
            .eq("user_id", user_id)
            .order("next_bill_date", true);
        self.select(TABLE, &query).await
    }

    pub async fn insert_subscription(
        &self,
        user_id: &str,
        subscription: &NewSubscription,
    ) -> Result<Subscription> {
        self.insert_owned(TABLE, user_id, subscription).await
    }

    pub async fn update_subscription(
        &self,
        user_id: &str,
        subscription_id: &str,
        update: &SubscriptionUpdate,
    ) -> Result<Option<Subscription>> {
        let query = Query::new()
            .eq("id", subscription_id)
            .eq("user_id", user_id);
        self.update(TABLE, &query, update).await
    }

    pub async fn delete_subscription(&self, user_id: &str, subscription_id: &str) -> Result<()> {
        let query = Query::new()
            .eq("id", subscription_id)
            .eq("user_id", user_id);
        self.delete(TABLE, &query).await
    }
}
