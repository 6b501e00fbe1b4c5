/// Append the role line and the goal being planned.
pub fn append_preamble(prompt: &mut String, goal_description: &str, deadline_days: i64) {
    prompt.push_str(
        "You are a project management expert. \
         Break down this goal into specific tasks with timelines.\n\n",
    );
    prompt.push_str(&format!("GOAL: {goal_description}\n"));
    prompt.push_str(&format!("TOTAL TIMELINE: {deadline_days} days\n\n"));
}

/// Append the per-task field requirements and the output-format rule.
pub fn append_instructions(prompt: &mut String) {
    prompt.push_str(
        "Create 4-6 specific, actionable tasks. For each task provide:\n\
         - A clear, concise title\n\
         - Detailed description of what needs to be done\n\
         - Realistic duration in days (duration_days)\n\
         - Dependencies (list of task numbers this depends on, 0-based, empty list if none)\n\
         - Start day (start_day, 0-based)\n\
         - End day (end_day)\n\
         - Priority ('High', 'Medium', 'Low')\n\n\
         Format your response as a valid JSON array ONLY. No other text.\n\n",
    );
}

/// Append the schedule bound and the final reminder.
pub fn append_closing(prompt: &mut String, deadline_days: i64) {
    prompt.push_str(&format!(
        "\nEnsure the entire project completes within {deadline_days} days.\n"
    ));
    prompt.push_str("Make tasks specific and actionable.\n");
    prompt.push_str("Return only the JSON array.\n");
}
