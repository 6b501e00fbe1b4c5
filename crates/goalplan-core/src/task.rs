use std::fmt;

use serde::{Deserialize, Serialize};

use crate::breakdown::MAX_TASK_DAYS;
use crate::error::GoalplanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: &[Status] = &[Status::Pending, Status::InProgress, Status::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Status::Pending),
            "in_progress" => Some(Status::InProgress),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Pending
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Task priority as the model is asked to emit it.
///
/// Stored and serialized as free text: a model that answers with
/// "Critical" keeps its word, while "high" is normalised to `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Case-insensitive match against the canonical names.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted task belonging to a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub description: String,
    pub duration_days: i64,
    pub dependencies: Vec<usize>,
    pub start_day: i64,
    pub end_day: i64,
    pub priority: String,
    pub status: Status,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_days: Option<i64>,
    pub priority: Option<String>,
    pub status: Option<Status>,
}

impl UpdateTask {
    pub fn validate(&self) -> Result<(), GoalplanError> {
        if let Some(days) = self.duration_days {
            if !(1..=MAX_TASK_DAYS).contains(&days) {
                return Err(GoalplanError::InvalidInput(format!(
                    "duration_days must be between 1 and {MAX_TASK_DAYS}, got {days}"
                )));
            }
        }
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(GoalplanError::InvalidInput("title must not be empty".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_str_round_trip() {
        for s in Status::ALL {
            assert_eq!(
                Status::parse_str(s.as_str()),
                Some(*s),
                "Status::{:?} should round-trip",
                s
            );
        }
    }

    #[test]
    fn test_status_parse_str_invalid() {
        assert_eq!(Status::parse_str("done"), None);
        assert_eq!(Status::parse_str(""), None);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse_str("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse_str(" medium "), Some(Priority::Medium));
        assert_eq!(Priority::parse_str("low"), Some(Priority::Low));
        assert_eq!(Priority::parse_str("critical"), None);
    }

    #[test]
    fn test_update_task_validation() {
        assert!(UpdateTask::default().validate().is_ok());
        let bad = UpdateTask {
            duration_days: Some(0),
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(GoalplanError::InvalidInput(_))));
        let blank = UpdateTask {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_update_task_rejects_huge_duration() {
        let huge = UpdateTask {
            duration_days: Some(i64::MAX),
            ..Default::default()
        };
        assert!(matches!(huge.validate(), Err(GoalplanError::InvalidInput(_))));
        let max = UpdateTask {
            duration_days: Some(MAX_TASK_DAYS),
            ..Default::default()
        };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn test_update_task_rejects_unknown_status() {
        let res = serde_json::from_str::<UpdateTask>(r#"{"status":"done"}"#);
        assert!(res.is_err());
        let ok: UpdateTask = serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert_eq!(ok.status, Some(Status::Completed));
    }

    #[test]
    fn test_task_serializes_dependencies_as_array() {
        let task = Task {
            id: "t1".into(),
            goal_id: "g1".into(),
            title: "Design".into(),
            description: String::new(),
            duration_days: 3,
            dependencies: vec![0, 1],
            start_day: 2,
            end_day: 4,
            priority: "High".into(),
            status: Status::Pending,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["dependencies"], serde_json::json!([0, 1]));
        assert_eq!(value["status"], "pending");
    }
}
