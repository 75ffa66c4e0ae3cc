//! Remote database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockRemoteDb, MOCK_API_KEY};
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_list_goals_scoped_and_ordered() {
        let mock = MockRemoteDb::start().await;
        mock.seed(
            "goals",
            vec![
                json!({"id": "g1", "user_id": "u1", "name": "Old", "target_amount": 100, "created_at": "2024-01-01T00:00:00Z"}),
                json!({"id": "g2", "user_id": "u1", "name": "New", "target_amount": 200, "created_at": "2024-02-01T00:00:00Z"}),
                json!({"id": "g3", "user_id": "u2", "name": "Other", "target_amount": 300, "created_at": "2024-03-01T00:00:00Z"}),
            ],
        );
        let db = mock.client();

        let goals = db.list_goals("u1").await.unwrap();
        let ids: Vec<&str> = goals.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["g2", "g1"]);
    }

    #[tokio::test]
    async fn test_get_goal_of_other_user_is_none() {
        let mock = MockRemoteDb::start().await;
        mock.seed("goals", vec![json!({"id": "g1", "user_id": "u2", "target_amount": 50})]);
        let db = mock.client();

        assert!(db.get_goal("u1", "g1").await.unwrap().is_none());
        assert!(db.get_goal("u2", "g1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_insert_goal_sets_owner() {
        let mock = MockRemoteDb::start().await;
        let db = mock.client();

        let goal = db
            .insert_goal("u1", &NewGoal::new("Bike", 500.0))
            .await
            .unwrap();
        assert_eq!(goal.user_id.as_deref(), Some("u1"));
        assert_eq!(goal.name.as_deref(), Some("Bike"));
        assert!(goal.created_at.is_some());

        let rows = mock.rows("goals");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["currency"], json!("USD"));
    }

    #[tokio::test]
    async fn test_update_goal_returns_updated_row() {
        let mock = MockRemoteDb::start().await;
        mock.seed(
            "goals",
            vec![json!({"id": "g1", "user_id": "u1", "target_amount": 100, "saved_already": 10})],
        );
        let db = mock.client();

        let update = GoalUpdate {
            saved_already: 60.0,
            last_contribution_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            status: GoalStatus::Active,
            current_streak: 2,
        };
        let goal = db.update_goal("u1", "g1", &update).await.unwrap().unwrap();
        assert_eq!(goal.saved_already, 60.0);
        assert_eq!(goal.current_streak, 2);
        assert_eq!(
            goal.last_contribution_date,
            Some(update.last_contribution_date)
        );

        assert!(db.update_goal("u9", "g1", &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_only_touches_owner_rows() {
        let mock = MockRemoteDb::start().await;
        mock.seed(
            "accounts",
            vec![
                json!({"id": "a1", "user_id": "u1", "name": "Cash", "balance": 10}),
                json!({"id": "a2", "user_id": "u2", "name": "Bank", "balance": 20}),
            ],
        );
        let db = mock.client();

        db.delete_account("u1", "a2").await.unwrap();
        assert_eq!(mock.rows("accounts").len(), 2);

        db.delete_account("u2", "a2").await.unwrap();
        assert_eq!(mock.rows("accounts").len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_key_maps_to_remote_error() {
        let mock = MockRemoteDb::start().await;
        let db = RemoteDb::new(&DatabaseConfig {
            url: mock.url(),
            api_key: "wrong".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        match db.list_accounts("u1").await {
            Err(Error::Remote { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_row_maps_to_json_error() {
        let mock = MockRemoteDb::start().await;
        mock.seed(
            "goals",
            vec![json!({"id": "g1", "user_id": "u1", "target_amount": "lots"})],
        );
        let db = mock.client();

        let result = db.list_goals("u1").await;
        assert!(matches!(result, Err(Error::Json(_))), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_categories_global_and_own() {
        let mock = MockRemoteDb::start().await;
        mock.seed(
            "categories",
            vec![
                json!({"id": "c1", "name": "Transport", "type": "expense"}),
                json!({"id": "c2", "user_id": "u1", "name": "Hobbies", "type": "expense"}),
                json!({"id": "c3", "user_id": "u2", "name": "Yacht", "type": "expense"}),
            ],
        );
        let db = mock.client();

        let ids: Vec<String> = db
            .list_categories("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["c2", "c1"]);
        assert!(db.get_owned_category("u1", "c1").await.unwrap().is_none());
        assert!(db.get_owned_category("u1", "c2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_settings_stamps_time() {
        let mock = MockRemoteDb::start().await;
        mock.seed("user_settings", vec![json!({"user_id": "u1", "mode": "dark"})]);
        let db = mock.client();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        let update = SettingsUpdate {
            mode: Some("light".into()),
            ..Default::default()
        };
        let settings = db.update_settings("u1", &update, now).await.unwrap().unwrap();
        assert_eq!(settings.mode.as_deref(), Some("light"));
        assert_eq!(settings.updated_at, Some(now));
        assert!(db.update_settings("u9", &update, now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_trimmed() {
        let mock = MockRemoteDb::start().await;
        let db = RemoteDb::new(&DatabaseConfig {
            url: format!("{}/", mock.url()),
            api_key: MOCK_API_KEY.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert_eq!(db.base_url(), mock.url());
        assert!(db.list_goals("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transaction_filter_applied() {
        let mock = MockRemoteDb::start().await;
        mock.seed(
            "transactions",
            vec![
                json!({"id": "t1", "user_id": "u1", "account_id": "a1", "amount": 10, "type": "expense", "date": "2024-01-05T12:00:00Z"}),
                json!({"id": "t2", "user_id": "u1", "account_id": "a1", "amount": 20, "type": "income", "date": "2024-01-20T12:00:00Z"}),
                json!({"id": "t3", "user_id": "u1", "account_id": "a2", "amount": 30, "type": "expense", "date": "2024-02-02T12:00:00Z"}),
                json!({"id": "t4", "user_id": "u2", "account_id": "a9", "amount": 40, "type": "expense", "date": "2024-01-10T12:00:00Z"}),
            ],
        );
        let db = mock.client();

        let all = db
            .list_transactions("u1", &TransactionFilter::new())
            .await
            .unwrap();
        let ids: Vec<&str> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2", "t1"]);

        let january_expenses = db
            .list_transactions(
                "u1",
                &TransactionFilter::new()
                    .start_date(NaiveDate::from_ymd_opt(2024, 1, 1))
                    .end_date(NaiveDate::from_ymd_opt(2024, 1, 31))
                    .kind(Some(TransactionType::Expense)),
            )
            .await
            .unwrap();
        assert_eq!(january_expenses.len(), 1);
        assert_eq!(january_expenses[0].id, "t1");

        let limited = db
            .list_transactions("u1", &TransactionFilter::new().limit(Some(1)))
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_expenses_for_categories() {
        let mock = MockRemoteDb::start().await;
        mock.seed(
            "transactions",
            vec![
                json!({"id": "t1", "user_id": "u1", "category_id": "food", "amount": 10, "type": "expense", "date": "2024-03-05T00:00:00Z"}),
                json!({"id": "t2", "user_id": "u1", "category_id": "food", "amount": 99, "type": "income", "date": "2024-03-06T00:00:00Z"}),
                json!({"id": "t3", "user_id": "u1", "category_id": "rent", "amount": 500, "type": "expense", "date": "2024-03-01T00:00:00Z"}),
                json!({"id": "t4", "user_id": "u1", "category_id": "food", "amount": 7, "type": "expense", "date": "2024-04-01T00:00:00Z"}),
            ],
        );
        let db = mock.client();

        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap();
        let rows = db
            .expenses_for_categories("u1", &["food".to_string()], start, end)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "t1");
    }

    #[tokio::test]
    async fn test_adjust_account_balance_rpc() {
        let mock = MockRemoteDb::start().await;
        mock.seed(
            "accounts",
            vec![json!({"id": "a1", "user_id": "u1", "name": "Cash", "balance": 100.0})],
        );
        let db = mock.client();

        db.adjust_account_balance("a1", -25.5).await.unwrap();

        let calls = mock.rpc_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "adjust_account_balance");
        assert_eq!(
            calls[0].1,
            json!({"account_id_param": "a1", "amount_param": -25.5})
        );
        assert_eq!(mock.rows("accounts")[0]["balance"], json!(74.5));
    }

    #[tokio::test]
    async fn test_envelopes_by_month_and_duplicate_lookup() {
        let mock = MockRemoteDb::start().await;
        mock.seed(
            "budget_envelopes",
            vec![
                json!({"id": "e1", "user_id": "u1", "category_id": "food", "budget_amount": 300, "period_month": 3, "period_year": 2024,
                       "category": {"id": "food", "name": "Food", "icon": null, "color": "#f00"}}),
                json!({"id": "e2", "user_id": "u1", "category_id": "food", "budget_amount": 250, "period_month": 4, "period_year": 2024}),
            ],
        );
        let db = mock.client();

        let march = db.list_envelopes("u1", 3, 2024).await.unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(
            march[0].category.as_ref().map(|c| c.name.as_str()),
            Some("Food")
        );

        assert_eq!(
            db.find_envelope("u1", "food", 4, 2024).await.unwrap(),
            Some("e2".to_string())
        );
        assert_eq!(db.find_envelope("u1", "food", 5, 2024).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_subscriptions_ordered_by_next_bill() {
        let mock = MockRemoteDb::start().await;
        mock.seed(
            "subscriptions",
            vec![
                json!({"id": "s1", "user_id": "u1", "name": "Gym", "amount": 30, "billing_cycle": "monthly", "next_bill_date": "2024-05-20", "is_active": true}),
                json!({"id": "s2", "user_id": "u1", "name": "Music", "amount": 10, "billing_cycle": "monthly", "next_bill_date": "2024-05-02", "is_active": true}),
            ],
        );
        let db = mock.client();

        let subs = db.list_subscriptions("u1").await.unwrap();
        assert_eq!(subs[0].name, "Music");
        assert_eq!(subs[1].name, "Gym");
    }
}
