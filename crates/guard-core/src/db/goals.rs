//! Goal operations

use super::{Query, RemoteDb};
use crate::error::Result;
use crate::models::{Goal, GoalUpdate, NewGoal};

const TABLE: &str = "goals";

impl RemoteDb {
    /// List a user's goals, newest first
    pub async fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        let query = Query::new()
            .eq("user_id", user_id)
            .order("created_at", false);
        self.select(TABLE, &query).await
    }

    /// Get a goal owned by `user_id`
    pub async fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Option<Goal>> {
        let query = Query::new().eq("id", goal_id).eq("user_id", user_id);
        self.select_one(TABLE, query).await
    }

    /// Create a goal for `user_id`
    pub async fn insert_goal(&self, user_id: &str, goal: &NewGoal) -> Result<Goal> {
        self.insert_owned(TABLE, user_id, goal).await
    }

    /// Write back a contribution; `None` when the goal no longer exists
    pub async fn update_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        update: &GoalUpdate,
    ) -> Result<Option<Goal>> {
        let query = Query::new().eq("id", goal_id).eq("user_id", user_id);
        self.update(TABLE, &query, update).await
    }

    pub async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()> {
        let query = Query::new().eq("id", goal_id).eq("user_id", user_id);
        self.delete(TABLE, &query).await
    }
}
