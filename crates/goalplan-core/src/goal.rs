use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::breakdown::MAX_TASK_DAYS;
use crate::error::GoalplanError;
use crate::task::Task;

pub const DEFAULT_GOAL_TITLE: &str = "New Goal";
pub const DEFAULT_DEADLINE_DAYS: i64 = 14;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub deadline_days: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGoal {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_deadline")]
    pub deadline_days: i64,
}

fn default_title() -> String {
    DEFAULT_GOAL_TITLE.to_string()
}

fn default_deadline() -> i64 {
    DEFAULT_DEADLINE_DAYS
}

impl CreateGoal {
    pub fn validate(&self) -> Result<(), GoalplanError> {
        validate_deadline(self.deadline_days)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGoal {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline_days: Option<i64>,
}

impl UpdateGoal {
    pub fn validate(&self) -> Result<(), GoalplanError> {
        match self.deadline_days {
            Some(days) => validate_deadline(days),
            None => Ok(()),
        }
    }
}

fn validate_deadline(days: i64) -> Result<(), GoalplanError> {
    if !(1..=MAX_TASK_DAYS).contains(&days) {
        return Err(GoalplanError::InvalidInput(format!(
            "deadline_days must be between 1 and {MAX_TASK_DAYS}, got {days}"
        )));
    }
    Ok(())
}
