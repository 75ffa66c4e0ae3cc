//! Budget math: subscription drain, envelope spending, account totals

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};

use crate::analytics::round2;
use crate::error::{Error, Result};
use crate::models::{
    Account, BillingCycle, BudgetEnvelope, EnvelopeSummary, NormalizedSubscription, Subscription,
    SubscriptionSummary, Transaction,
};

/// Average weeks per month
const WEEKS_PER_MONTH: f64 = 4.33;

/// Average days per month
const DAYS_PER_MONTH: f64 = 30.44;

/// Monthly-equivalent cost of a recurring charge
pub fn normalized_monthly(amount: f64, cycle: &BillingCycle) -> f64 {
    match cycle {
        BillingCycle::Daily => amount * DAYS_PER_MONTH,
        BillingCycle::Weekly => amount * WEEKS_PER_MONTH,
        BillingCycle::Monthly | BillingCycle::Other(_) => amount,
        BillingCycle::Yearly => amount / 12.0,
    }
}

impl SubscriptionSummary {
    /// Annotate every subscription and total the active ones
    pub fn from_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        let mut total = 0.0;
        let subscriptions = subscriptions
            .into_iter()
            .map(|subscription| {
                let monthly = normalized_monthly(subscription.amount, &subscription.billing_cycle);
                if subscription.is_active {
                    total += monthly;
                }
                NormalizedSubscription {
                    subscription,
                    normalized_monthly: round2(monthly),
                }
            })
            .collect();

        Self {
            total_monthly_drain: round2(total),
            subscriptions,
        }
    }
}

/// Attach the spent amount of each envelope's category
///
/// `expenses` should already be limited to the envelopes' month.
pub fn envelope_summaries(
    envelopes: Vec<BudgetEnvelope>,
    expenses: &[Transaction],
) -> Vec<EnvelopeSummary> {
    let mut spent_by_category: HashMap<&str, f64> = HashMap::new();
    for expense in expenses {
        if let Some(category_id) = expense.category_id.as_deref() {
            *spent_by_category.entry(category_id).or_insert(0.0) += expense.amount;
        }
    }

    envelopes
        .into_iter()
        .map(|envelope| {
            let spent = envelope
                .category
                .as_ref()
                .and_then(|c| c.id.as_deref())
                .and_then(|id| spent_by_category.get(id))
                .copied()
                .unwrap_or(0.0);
            EnvelopeSummary {
                id: envelope.id,
                budget_amount: envelope.budget_amount,
                spent: round2(spent),
                period_month: envelope.period_month,
                period_year: envelope.period_year,
                category: envelope.category,
            }
        })
        .collect()
}

/// Sum of balances over accounts that are not hidden
pub fn total_visible_balance(accounts: &[Account]) -> f64 {
    accounts
        .iter()
        .filter(|account| !account.is_hidden)
        .map(|account| account.balance)
        .sum()
}

/// A calendar month used to scope envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    pub month: u32,
    pub year: i32,
}

impl MonthPeriod {
    /// Resolve an optional month/year against `today`
    pub fn resolve(month: Option<u32>, year: Option<i32>, today: NaiveDate) -> Result<Self> {
        let month = month.unwrap_or_else(|| today.month());
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self {
            month,
            year: year.unwrap_or_else(|| today.year()),
        })
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| {
            Error::InvalidData(format!("invalid month {}/{}", self.month, self.year))
        })
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        self.first_day()?
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| Error::InvalidData(format!("invalid month {}/{}", self.month, self.year)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryRef, TransactionType};
    use chrono::{TimeZone, Utc};

    fn sub(name: &str, amount: f64, cycle: BillingCycle, active: bool) -> Subscription {
        Subscription {
            id: name.to_lowercase(),
            user_id: None,
            name: name.to_string(),
            amount,
            billing_cycle: cycle,
            next_bill_date: None,
            is_active: active,
        }
    }

    fn envelope(id: &str, category_id: &str, budget: f64) -> BudgetEnvelope {
        BudgetEnvelope {
            id: id.to_string(),
            budget_amount: budget,
            period_month: 5,
            period_year: 2024,
            category: Some(CategoryRef {
                id: Some(category_id.to_string()),
                name: category_id.to_string(),
                icon: None,
                color: None,
            }),
        }
    }

    fn expense(category_id: Option<&str>, amount: f64) -> Transaction {
        Transaction {
            id: "t".into(),
            user_id: None,
            account_id: None,
            category_id: category_id.map(String::from),
            amount,
            kind: TransactionType::Expense,
            description: None,
            date: Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap(),
            categories: None,
            accounts: None,
        }
    }

    #[test]
    fn test_normalized_monthly() {
        assert_eq!(normalized_monthly(12.0, &BillingCycle::Monthly), 12.0);
        assert_eq!(normalized_monthly(120.0, &BillingCycle::Yearly), 10.0);
        assert!((normalized_monthly(10.0, &BillingCycle::Weekly) - 43.3).abs() < 1e-9);
        assert!((normalized_monthly(1.0, &BillingCycle::Daily) - 30.44).abs() < 1e-9);
        assert_eq!(
            normalized_monthly(7.0, &BillingCycle::Other("quarterly".into())),
            7.0
        );
    }

    #[test]
    fn test_drain_counts_only_active() {
        let summary = SubscriptionSummary::from_subscriptions(vec![
            sub("Netflix", 15.49, BillingCycle::Monthly, true),
            sub("Cloud", 120.0, BillingCycle::Yearly, true),
            sub("Gym", 40.0, BillingCycle::Monthly, false),
        ]);

        assert_eq!(summary.total_monthly_drain, 25.49);
        assert_eq!(summary.subscriptions.len(), 3);
        assert_eq!(summary.subscriptions[2].normalized_monthly, 40.0);
    }

    #[test]
    fn test_envelope_spent_matches_category() {
        let summaries = envelope_summaries(
            vec![envelope("e1", "food", 300.0), envelope("e2", "fun", 100.0)],
            &[
                expense(Some("food"), 45.5),
                expense(Some("food"), 4.5),
                expense(Some("rent"), 900.0),
                expense(None, 12.0),
            ],
        );

        assert_eq!(summaries[0].spent, 50.0);
        assert_eq!(summaries[1].spent, 0.0);
        assert_eq!(summaries[1].budget_amount, 100.0);
    }

    #[test]
    fn test_total_visible_balance() {
        let account = |balance: f64, is_hidden: bool| Account {
            id: "a".into(),
            user_id: None,
            name: "A".into(),
            account_type: None,
            balance,
            currency: None,
            is_hidden,
            created_at: None,
        };
        let accounts = vec![account(10.0, false), account(-4.0, false), account(50.0, true)];
        assert_eq!(total_visible_balance(&accounts), 6.0);
    }

    #[test]
    fn test_month_period_defaults_and_bounds() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        let period = MonthPeriod::resolve(None, None, today).unwrap();
        assert_eq!(period, MonthPeriod { month: 2, year: 2024 });
        assert_eq!(period.first_day().unwrap(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(period.last_day().unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let december = MonthPeriod::resolve(Some(12), Some(2023), today).unwrap();
        assert_eq!(
            december.last_day().unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );

        assert!(MonthPeriod::resolve(Some(13), None, today).is_err());
        assert!(MonthPeriod::resolve(Some(0), None, today).is_err());
    }
}
