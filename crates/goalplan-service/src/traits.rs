use async_trait::async_trait;
use goalplan_core::goal::{CreateGoal, Goal, UpdateGoal};
use goalplan_core::task::{Task, UpdateTask};
use goalplan_core::GoalplanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<GoalplanError> for ServiceError {
    fn from(e: GoalplanError) -> Self {
        match e {
            GoalplanError::InvalidInput(msg) => ServiceError::InvalidInput(msg),
        }
    }
}

/// Abstraction over goal planning operations.
///
/// The HTTP server programs against this trait.
/// `LocalService` wraps SQLite plus the planner.
/// `HttpService` wraps an async HTTP client.
#[async_trait]
pub trait GoalService: Send + Sync {
    // -- Goals --
    async fn list_goals(&self) -> Result<Vec<Goal>, ServiceError>;
    async fn get_goal(&self, id: &str) -> Result<Goal, ServiceError>;
    /// Create a goal and its generated task breakdown.
    async fn create_goal(&self, input: &CreateGoal) -> Result<Goal, ServiceError>;
    async fn update_goal(&self, id: &str, update: &UpdateGoal) -> Result<Goal, ServiceError>;
    async fn delete_goal(&self, id: &str) -> Result<(), ServiceError>;

    // -- Tasks --
    async fn get_task(&self, id: &str) -> Result<Task, ServiceError>;
    async fn update_task(&self, id: &str, update: &UpdateTask) -> Result<Task, ServiceError>;
    async fn delete_task(&self, id: &str) -> Result<(), ServiceError>;
}
