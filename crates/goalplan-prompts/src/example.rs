use goalplan_core::TaskRecord;

/// The two sample tasks shown to the model to anchor its output shape.
pub fn sample_tasks() -> Vec<TaskRecord> {
    vec![
        TaskRecord {
            title: "Research and Planning".into(),
            description: "Define project scope, research requirements, and create project plan"
                .into(),
            duration_days: 3,
            dependencies: vec![],
            start_day: 0,
            end_day: 2,
            priority: "High".into(),
        },
        TaskRecord {
            title: "Design Phase".into(),
            description: "Create wireframes, design mockups, and user interface designs".into(),
            duration_days: 5,
            dependencies: vec![0],
            start_day: 3,
            end_day: 7,
            priority: "Medium".into(),
        },
    ]
}

/// Append the worked example as pretty-printed JSON.
pub fn append_example(prompt: &mut String) {
    prompt.push_str("Example format:\n");
    // Serializing a Vec of plain structs cannot fail.
    let rendered = serde_json::to_string_pretty(&sample_tasks()).unwrap_or_default();
    prompt.push_str(&rendered);
    prompt.push('\n');
}
