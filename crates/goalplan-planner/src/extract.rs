use std::sync::OnceLock;

use goalplan_core::{Priority, TaskRecord, MAX_TASK_DAYS};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

/// Clean raw model text down to the JSON array it (hopefully) contains.
///
/// Strips code fences wherever they occur, slices from the first `[` to the
/// last `]`, and deletes trailing commas before `}` or `]`. Returns `None`
/// when no bracketed region exists.
pub fn repair_json_text(raw: &str) -> Option<String> {
    let unfenced = strip_code_fences(raw.trim());
    let start = unfenced.find('[')?;
    let end = unfenced.rfind(']')?;
    if end < start {
        return None;
    }
    Some(remove_trailing_commas(&unfenced[start..=end]))
}

/// Turn raw model output into task records, or `None` if it is not a JSON
/// array of objects even after repair.
pub fn extract(raw: &str) -> Option<Vec<TaskRecord>> {
    let Some(repaired) = repair_json_text(raw) else {
        debug!("extract: no JSON array found");
        return None;
    };
    let items = match serde_json::from_str::<Value>(&repaired) {
        Ok(Value::Array(items)) => items,
        Ok(_) => return None,
        Err(e) => {
            debug!("extract: repaired text is not valid JSON: {e}");
            return None;
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| item.as_object().map(|obj| to_record(index, obj)))
        .collect()
}

fn strip_code_fences(text: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let re = FENCE.get_or_init(|| Regex::new(r"```[A-Za-z0-9_+-]*\s*").unwrap());
    re.replace_all(text, "").into_owned()
}

fn remove_trailing_commas(text: &str) -> String {
    static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING_COMMA.get_or_init(|| Regex::new(r",\s*([}\]])").unwrap());
    re.replace_all(text, "$1").into_owned()
}

fn to_record(index: usize, obj: &Map<String, Value>) -> TaskRecord {
    let title = string_field(obj, "title").unwrap_or_else(|| format!("Task {}", index + 1));
    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let duration_days = int_field(obj, "duration_days")
        .unwrap_or(1)
        .clamp(1, MAX_TASK_DAYS);
    let start_day = int_field(obj, "start_day")
        .unwrap_or(0)
        .clamp(0, MAX_TASK_DAYS);
    let end_day = int_field(obj, "end_day").unwrap_or(start_day + duration_days - 1);
    let priority = match string_field(obj, "priority") {
        Some(raw) => Priority::parse_str(&raw)
            .map(|p| p.as_str().to_string())
            .unwrap_or(raw),
        None => Priority::default().as_str().to_string(),
    };

    TaskRecord {
        title,
        description,
        duration_days,
        dependencies: dependencies(index, obj.get("dependencies")),
        start_day,
        end_day,
        priority,
    }
}

/// Non-blank string field, trimmed.
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn int_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(int_value)
}

/// Integers, floats (floored, saturating at the `i64` range) and numeric strings.
fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.floor() as i64)
            })
        }
        _ => None,
    }
}

/// Keep only references to earlier tasks, deduplicated, in original order.
fn dependencies(index: usize, value: Option<&Value>) -> Vec<usize> {
    let Some(Value::Array(raw)) = value else {
        return Vec::new();
    };
    let mut deps = Vec::with_capacity(raw.len());
    for entry in raw {
        match int_value(entry) {
            Some(dep) if dep >= 0 && (dep as usize) < index => {
                let dep = dep as usize;
                if !deps.contains(&dep) {
                    deps.push(dep);
                }
            }
            _ => debug!("extract: task {index} drops dependency {entry}"),
        }
    }
    deps
}
