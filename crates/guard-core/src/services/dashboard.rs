//! Dashboard service

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::dashboard::{DateRanges, Period};
use crate::db::RemoteDb;
use crate::error::Result;
use crate::models::DashboardStats;

#[derive(Debug, Clone)]
pub struct DashboardService {
    db: RemoteDb,
}

impl DashboardService {
    pub fn new(db: RemoteDb) -> Self {
        Self { db }
    }

    /// Balance, flows and charts for the period containing `now`
    pub async fn stats(
        &self,
        user_id: &str,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<DashboardStats> {
        let ranges = DateRanges::for_period(period, now);
        debug!(
            "Dashboard {} {} .. {} (prev {} .. {})",
            period, ranges.start, ranges.end, ranges.prev_start, ranges.prev_end
        );

        let (accounts, current, previous) = tokio::try_join!(
            self.db.list_accounts(user_id),
            self.db.transactions_between(user_id, ranges.start, ranges.end),
            self.db
                .transactions_between(user_id, ranges.prev_start, ranges.prev_end),
        )?;

        Ok(DashboardStats::compute(
            &accounts, &current, &previous, period, &ranges,
        ))
    }
}
