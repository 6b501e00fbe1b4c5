use goalplan_core::{Priority, TaskRecord};

/// Deterministic four-phase plan used when no model output is usable.
///
/// Durations are fixed fractions of the deadline with per-phase minimums;
/// phases run back to back and the last one stretches or shrinks so it ends
/// on `deadline_days - 1`. When the minimums alone overrun a short deadline
/// the last phase keeps its nominal length and the caller is expected to run
/// the result through [`crate::timeline::validate`].
pub fn fallback(goal_description: &str, deadline_days: i64) -> Vec<TaskRecord> {
    let goal = goal_description.trim();
    let d = deadline_days;

    let phases = [
        (
            format!("Research and Plan {goal}"),
            format!(
                "Conduct initial research, define requirements, and create detailed project plan for {goal}"
            ),
            (d / 5).max(2),
            Priority::High,
        ),
        (
            "Prepare and Setup".to_string(),
            format!("Gather resources, set up systems, and prepare for implementation of {goal}"),
            (d / 4).max(3),
            Priority::Medium,
        ),
        (
            "Execute Core Work".to_string(),
            format!("Implement the main components and do the primary work for {goal}"),
            (d / 2).max(4),
            Priority::High,
        ),
        (
            "Review and Finalize".to_string(),
            format!("Test, review outcomes, make final adjustments, and complete {goal}"),
            (d / 5).max(2),
            Priority::Medium,
        ),
    ];

    let mut tasks = Vec::with_capacity(phases.len());
    let mut next_start = 0;
    for (index, (title, description, duration_days, priority)) in phases.into_iter().enumerate() {
        let mut task = TaskRecord {
            title: title.trim_end().to_string(),
            description: description.trim_end().to_string(),
            duration_days,
            dependencies: if index == 0 { vec![] } else { vec![index - 1] },
            start_day: next_start,
            end_day: 0,
            priority: priority.as_str().to_string(),
        };
        task.recompute_end();
        next_start = task.end_day + 1;
        tasks.push(task);
    }

    if let Some(last) = tasks.last_mut() {
        if last.start_day <= d - 1 {
            last.end_day = d - 1;
            last.duration_days = last.end_day - last.start_day + 1;
        }
    }
    tasks
}
