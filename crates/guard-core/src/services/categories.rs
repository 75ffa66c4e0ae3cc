//! Category service

use tracing::info;

use crate::db::RemoteDb;
use crate::error::{Error, Result};
use crate::models::{Category, NewCategory};

#[derive(Debug, Clone)]
pub struct CategoryService {
    db: RemoteDb,
}

impl CategoryService {
    pub fn new(db: RemoteDb) -> Self {
        Self { db }
    }

    /// Global categories and the user's own, by name
    pub async fn list(&self, user_id: &str) -> Result<Vec<Category>> {
        self.db.list_categories(user_id).await
    }

    pub async fn create(&self, user_id: &str, category: &NewCategory) -> Result<Category> {
        category.validate()?;
        let created = self.db.insert_category(user_id, category).await?;
        info!("Created category {} ({})", created.name, created.id);
        Ok(created)
    }

    /// Delete one of the user's categories; global ones are never owned
    pub async fn delete(&self, user_id: &str, category_id: &str) -> Result<()> {
        if self
            .db
            .get_owned_category(user_id, category_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound(format!("category {}", category_id)));
        }
        self.db.delete_category(user_id, category_id).await?;
        info!("Deleted category {}", category_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use crate::test_utils::MockRemoteDb;
    use serde_json::json;

    fn seed_categories(mock: &MockRemoteDb) {
        mock.seed(
            "categories",
            vec![
                json!({"id": 1, "user_id": null, "name": "Salary", "type": "income"}),
                json!({"id": 2, "user_id": null, "name": "Food", "type": "expense"}),
                json!({"id": "c3", "user_id": "u1", "name": "Games", "type": "expense"}),
                json!({"id": "c4", "user_id": "u2", "name": "Boat", "type": "expense"}),
            ],
        );
    }

    #[tokio::test]
    async fn test_list_global_and_own_by_name() {
        let mock = MockRemoteDb::start().await;
        seed_categories(&mock);
        let service = CategoryService::new(mock.client());

        let names: Vec<String> = service
            .list("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Food", "Games", "Salary"]);
    }

    #[tokio::test]
    async fn test_create_sets_owner() {
        let mock = MockRemoteDb::start().await;
        let service = CategoryService::new(mock.client());

        let input = NewCategory {
            name: "Streaming".into(),
            kind: TransactionType::Expense,
            icon: Some("Youtube".into()),
            color: Some("#FF0000".into()),
        };
        let created = service.create("u1", &input).await.unwrap();
        assert_eq!(created.user_id.as_deref(), Some("u1"));
        assert_eq!(created.kind, Some(TransactionType::Expense));
        assert!(!created.is_global());

        let rows = mock.rows("categories");
        assert_eq!(rows[0]["type"], json!("expense"));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_color() {
        let mock = MockRemoteDb::start().await;
        let service = CategoryService::new(mock.client());

        let input = NewCategory {
            name: "Streaming".into(),
            kind: TransactionType::Expense,
            icon: None,
            color: Some("crimson".into()),
        };
        let result = service.create("u1", &input).await;
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert!(mock.rows("categories").is_empty());
    }

    #[tokio::test]
    async fn test_delete_only_own_categories() {
        let mock = MockRemoteDb::start().await;
        seed_categories(&mock);
        let service = CategoryService::new(mock.client());

        let global = service.delete("u1", "2").await;
        assert!(matches!(global, Err(Error::NotFound(_))));
        let foreign = service.delete("u1", "c4").await;
        assert!(matches!(foreign, Err(Error::NotFound(_))));
        assert_eq!(mock.rows("categories").len(), 4);

        service.delete("u1", "c3").await.unwrap();
        assert_eq!(mock.rows("categories").len(), 3);
    }
}
