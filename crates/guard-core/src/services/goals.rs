//! Goal service: CRUD plus analytics and contributions

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::analytics::compute_analytics;
use crate::db::RemoteDb;
use crate::error::{Error, Result};
use crate::goals::apply_contribution;
use crate::models::{Goal, GoalAnalytics, GoalWithAnalytics, NewGoal};

#[derive(Debug, Clone)]
pub struct GoalService {
    db: RemoteDb,
}

impl GoalService {
    pub fn new(db: RemoteDb) -> Self {
        Self { db }
    }

    /// Validate and store a new goal
    pub async fn create(&self, user_id: &str, goal: &NewGoal) -> Result<Goal> {
        goal.validate()?;
        let created = self.db.insert_goal(user_id, goal).await?;
        info!("Created goal {} for user {}", created.id, user_id);
        Ok(created)
    }

    /// Every goal of the user, each with analytics as of `today`
    pub async fn list_with_analytics(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<GoalWithAnalytics>> {
        let goals = self.db.list_goals(user_id).await?;
        debug!("Computing analytics for {} goals", goals.len());
        Ok(goals
            .into_iter()
            .map(|goal| {
                let analytics = compute_analytics(&goal, today);
                GoalWithAnalytics { goal, analytics }
            })
            .collect())
    }

    /// Analytics for one goal; `NotFound` when missing or owned by someone else
    pub async fn analytics(
        &self,
        user_id: &str,
        goal_id: &str,
        today: NaiveDate,
    ) -> Result<GoalAnalytics> {
        let goal = self.get(user_id, goal_id).await?;
        Ok(compute_analytics(&goal, today))
    }

    pub async fn get(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        self.db
            .get_goal(user_id, goal_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("goal {}", goal_id)))
    }

    /// Record a deposit made on `today` and return the stored goal
    pub async fn contribute(
        &self,
        user_id: &str,
        goal_id: &str,
        amount: f64,
        today: NaiveDate,
    ) -> Result<Goal> {
        let goal = self.get(user_id, goal_id).await?;
        let update = apply_contribution(&goal, amount, today)?;
        let updated = self
            .db
            .update_goal(user_id, goal_id, &update)
            .await?
            .ok_or_else(|| Error::NotFound(format!("goal {}", goal_id)))?;

        info!(
            "Goal {} now at {:.2} (streak {})",
            goal_id, update.saved_already, update.current_streak
        );
        Ok(updated)
    }

    pub async fn delete(&self, user_id: &str, goal_id: &str) -> Result<()> {
        self.get(user_id, goal_id).await?;
        self.db.delete_goal(user_id, goal_id).await?;
        info!("Deleted goal {}", goal_id);
        Ok(())
    }
}
