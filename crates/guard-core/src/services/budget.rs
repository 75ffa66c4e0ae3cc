//! Budget service: monthly envelopes and recurring subscriptions

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

use crate::budget::{envelope_summaries, MonthPeriod};
use crate::db::RemoteDb;
use crate::error::{Error, Result};
use crate::models::{
    BudgetEnvelope, EnvelopeSummary, EnvelopeUpdate, NewEnvelope, NewSubscription, Subscription,
    SubscriptionSummary, SubscriptionUpdate,
};

#[derive(Debug, Clone)]
pub struct BudgetService {
    db: RemoteDb,
}

impl BudgetService {
    pub fn new(db: RemoteDb) -> Self {
        Self { db }
    }

    /// Envelopes of a month (default: the month of `today`) with spending
    pub async fn envelopes(
        &self,
        user_id: &str,
        month: Option<u32>,
        year: Option<i32>,
        today: NaiveDate,
    ) -> Result<Vec<EnvelopeSummary>> {
        let period = MonthPeriod::resolve(month, year, today)?;
        let envelopes = self
            .db
            .list_envelopes(user_id, period.month, period.year)
            .await?;

        let category_ids: Vec<String> = envelopes
            .iter()
            .filter_map(|e| e.category.as_ref().and_then(|c| c.id.clone()))
            .collect();
        if category_ids.is_empty() {
            return Ok(envelope_summaries(envelopes, &[]));
        }

        let start = period.first_day()?.and_time(NaiveTime::MIN).and_utc();
        let end = period
            .last_day()?
            .and_hms_milli_opt(23, 59, 59, 999)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| Error::InvalidData("invalid month end".into()))?;

        let expenses = self
            .db
            .expenses_for_categories(user_id, &category_ids, start, end)
            .await?;
        debug!(
            "{} envelopes, {} expenses in {}/{}",
            envelopes.len(),
            expenses.len(),
            period.month,
            period.year
        );

        Ok(envelope_summaries(envelopes, &expenses))
    }

    /// Create an envelope; one per category and month
    pub async fn create_envelope(
        &self,
        user_id: &str,
        envelope: &NewEnvelope,
    ) -> Result<BudgetEnvelope> {
        envelope.validate()?;

        if self
            .db
            .find_envelope(
                user_id,
                &envelope.category_id,
                envelope.period_month,
                envelope.period_year,
            )
            .await?
            .is_some()
        {
            return Err(Error::Conflict(format!(
                "an envelope for category {} already exists in {}/{}",
                envelope.category_id, envelope.period_month, envelope.period_year
            )));
        }

        let created = self.db.insert_envelope(user_id, envelope).await?;
        info!("Created envelope {}", created.id);
        Ok(created)
    }

    pub async fn update_envelope(
        &self,
        user_id: &str,
        envelope_id: &str,
        update: &EnvelopeUpdate,
    ) -> Result<BudgetEnvelope> {
        if let Some(amount) = update.budget_amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidData("budget_amount must be >= 0".into()));
            }
        }
        self.db
            .update_envelope(user_id, envelope_id, update)
            .await?
            .ok_or_else(|| Error::NotFound(format!("envelope {}", envelope_id)))
    }

    pub async fn delete_envelope(&self, user_id: &str, envelope_id: &str) -> Result<()> {
        self.db.delete_envelope(user_id, envelope_id).await?;
        info!("Deleted envelope {}", envelope_id);
        Ok(())
    }

    /// All subscriptions with their monthly drain
    pub async fn subscriptions(&self, user_id: &str) -> Result<SubscriptionSummary> {
        let subscriptions = self.db.list_subscriptions(user_id).await?;
        Ok(SubscriptionSummary::from_subscriptions(subscriptions))
    }

    pub async fn create_subscription(
        &self,
        user_id: &str,
        subscription: &NewSubscription,
    ) -> Result<Subscription> {
        subscription.validate()?;
        let created = self.db.insert_subscription(user_id, subscription).await?;
        info!("Tracking subscription {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn update_subscription(
        &self,
        user_id: &str,
        subscription_id: &str,
        update: &SubscriptionUpdate,
    ) -> Result<Subscription> {
        if let Some(amount) = update.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidData("amount must be >= 0".into()));
            }
        }
        self.db
            .update_subscription(user_id, subscription_id, update)
            .await?
            .ok_or_else(|| Error::NotFound(format!("subscription {}", subscription_id)))
    }

    pub async fn delete_subscription(&self, user_id: &str, subscription_id: &str) -> Result<()> {
        self.db.delete_subscription(user_id, subscription_id).await?;
        info!("Deleted subscription {}", subscription_id);
        Ok(())
    }
}
