pub mod breakdown;
pub mod example;

/// Assemble the task-breakdown prompt for a goal.
///
/// Pure and deterministic: the same goal and deadline always render the
/// same text, empty descriptions included.
pub fn build_prompt(goal_description: &str, deadline_days: i64) -> String {
    let mut prompt = String::new();
    breakdown::append_preamble(&mut prompt, goal_description, deadline_days);
    breakdown::append_instructions(&mut prompt);
    example::append_example(&mut prompt);
    breakdown::append_closing(&mut prompt, deadline_days);
    prompt
}
