use serde::{Deserialize, Serialize};

/// Upper bound on any start day or duration a task may carry (about a century).
pub const MAX_TASK_DAYS: i64 = 36_500;

/// One scheduled step of a goal, as produced by the planner before it is
/// persisted. Dependencies are positions within the same breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    pub description: String,
    pub duration_days: i64,
    pub dependencies: Vec<usize>,
    pub start_day: i64,
    pub end_day: i64,
    pub priority: String,
}

impl TaskRecord {
    /// Derive `end_day` from `start_day` and `duration_days`.
    pub fn recompute_end(&mut self) {
        self.end_day = self
            .start_day
            .saturating_add(self.duration_days)
            .saturating_sub(1);
    }
}

/// An ordered task breakdown for a single goal.
pub type Breakdown = Vec<TaskRecord>;

/// True when every task is internally consistent and ends before `deadline_days`.
pub fn fits_deadline(tasks: &[TaskRecord], deadline_days: i64) -> bool {
    tasks.iter().all(|t| {
        t.start_day >= 0
            && t.duration_days >= 1
            && t.end_day == t.start_day.saturating_add(t.duration_days).saturating_sub(1)
            && t.end_day < deadline_days
    })
}
