use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoalplanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
