use std::sync::Arc;

use async_trait::async_trait;
use goalplan_core::goal::{CreateGoal, Goal, UpdateGoal};
use goalplan_core::task::{Task, UpdateTask};
use goalplan_db::{Db, DbError};
use goalplan_planner::{PlanSource, Planner};
use tracing::{info, warn};

use crate::{GoalService, ServiceError};

/// Local implementation backed by direct SQLite access and an in-process planner.
pub struct LocalService {
    db: Db,
    planner: Arc<Planner>,
}

impl LocalService {
    pub fn new(db: Db, planner: Arc<Planner>) -> Self {
        Self { db, planner }
    }

    /// Run a query on the blocking pool so the mutex-guarded connection
    /// never stalls the async runtime.
    async fn blocking<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&Db) -> Result<T, DbError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .map_err(ServiceError::from)
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ServiceError::NotFound(msg),
            DbError::InvalidInput(msg) => ServiceError::InvalidInput(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

#[async_trait]
impl GoalService for LocalService {
    async fn list_goals(&self) -> Result<Vec<Goal>, ServiceError> {
        self.blocking(|db| db.list_goals()).await
    }

    async fn get_goal(&self, id: &str) -> Result<Goal, ServiceError> {
        let id = id.to_string();
        self.blocking(move |db| db.get_goal(&id)).await
    }

    async fn create_goal(&self, input: &CreateGoal) -> Result<Goal, ServiceError> {
        input.validate()?;

        let create = input.clone();
        let goal = self.blocking(move |db| db.create_goal(&create)).await?;

        // A goal with no description is planned from its title.
        let subject = if goal.description.trim().is_empty() {
            goal.title.as_str()
        } else {
            goal.description.as_str()
        };
        let plan = self.planner.plan(subject, goal.deadline_days).await;
        match &plan.source {
            PlanSource::Model { backend, model } => info!(
                goal_id = %goal.id,
                tasks = plan.tasks.len(),
                "breakdown from {backend} {}",
                model.as_deref().unwrap_or("")
            ),
            PlanSource::Fallback(reason) => info!(
                goal_id = %goal.id,
                tasks = plan.tasks.len(),
                reason = reason.as_str(),
                "breakdown from fallback plan"
            ),
        }

        let goal_id = goal.id.clone();
        let tasks = plan.tasks;
        let stored = self
            .blocking(move |db| {
                db.insert_breakdown(&goal_id, &tasks)?;
                db.get_goal(&goal_id)
            })
            .await;

        if stored.is_err() {
            let goal_id = goal.id.clone();
            if let Err(e) = self.blocking(move |db| db.delete_goal(&goal_id)).await {
                warn!(goal_id = %goal.id, "could not remove goal after failed task insert: {e}");
            }
        }
        stored
    }

    async fn update_goal(&self, id: &str, update: &UpdateGoal) -> Result<Goal, ServiceError> {
        update.validate()?;
        let id = id.to_string();
        let update = update.clone();
        self.blocking(move |db| db.update_goal(&id, &update)).await
    }

    async fn delete_goal(&self, id: &str) -> Result<(), ServiceError> {
        let id = id.to_string();
        self.blocking(move |db| db.delete_goal(&id)).await
    }

    async fn get_task(&self, id: &str) -> Result<Task, ServiceError> {
        let id = id.to_string();
        self.blocking(move |db| db.get_task(&id)).await
    }

    async fn update_task(&self, id: &str, update: &UpdateTask) -> Result<Task, ServiceError> {
        update.validate()?;
        let id = id.to_string();
        let update = update.clone();
        self.blocking(move |db| db.update_task(&id, &update)).await
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        let id = id.to_string();
        self.blocking(move |db| db.delete_task(&id)).await
    }
}
