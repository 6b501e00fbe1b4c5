use goalplan_core::{TaskRecord, MAX_TASK_DAYS};
use tracing::debug;

/// Make a task schedule fit inside `[0, deadline_days - 1]`.
///
/// Starts and durations are first clamped into `0..=MAX_TASK_DAYS` and
/// `1..=MAX_TASK_DAYS`, then end days are recomputed from them. If the latest end day
/// reaches the deadline, every start and duration is compressed by the same
/// factor `(deadline_days - 1) / max_end` (floored, durations kept at >= 1).
/// One pass; the last task may land short of the deadline after rounding.
pub fn validate(mut tasks: Vec<TaskRecord>, deadline_days: i64) -> Vec<TaskRecord> {
    if tasks.is_empty() {
        return tasks;
    }

    for task in &mut tasks {
        task.start_day = task.start_day.clamp(0, MAX_TASK_DAYS);
        task.duration_days = task.duration_days.clamp(1, MAX_TASK_DAYS);
        task.recompute_end();
    }

    let max_end = tasks.iter().map(|t| t.end_day).max().unwrap_or(0);
    if max_end < deadline_days {
        return tasks;
    }

    let span = (deadline_days - 1).max(0);
    debug!(max_end, deadline_days, "timeline: compressing schedule by {span}/{max_end}");
    for task in &mut tasks {
        task.start_day = scale(task.start_day, span, max_end);
        task.duration_days = scale(task.duration_days, span, max_end).max(1);
        task.recompute_end();
    }
    tasks
}

/// `floor(value * num / den)` without going through floating point.
fn scale(value: i64, num: i64, den: i64) -> i64 {
    (i128::from(value) * i128::from(num)).div_euclid(i128::from(den)) as i64
}
