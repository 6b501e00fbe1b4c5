use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use goalplan_core::task::{Status, Task, UpdateTask};
use goalplan_core::{TaskRecord, MAX_TASK_DAYS};

use crate::{Db, DbError};

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let deps_json: String = row.get("dependencies")?;
    let dependencies: Vec<usize> = serde_json::from_str(&deps_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
    })?;
    let status_str: String = row.get("status")?;
    Ok(Task {
        id: row.get("id")?,
        goal_id: row.get("goal_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        duration_days: row.get("duration_days")?,
        dependencies,
        start_day: row.get("start_day")?,
        end_day: row.get("end_day")?,
        priority: row.get("priority")?,
        status: Status::parse_str(&status_str).unwrap_or_default(),
    })
}

pub(crate) fn load_tasks(conn: &Connection, goal_id: &str) -> Result<Vec<Task>, DbError> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE goal_id = ?1 ORDER BY position")?;
    let tasks = stmt
        .query_map(params![goal_id], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

fn load_task(conn: &Connection, id: &str) -> Result<Task, DbError> {
    conn.query_row("SELECT * FROM tasks WHERE id = ?1", params![id], row_to_task)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("task {id}")),
            other => DbError::Sqlite(other),
        })
}

impl Db {
    /// Store a generated breakdown under `goal_id` in one transaction.
    ///
    /// Tasks keep their breakdown index as `position` and start `pending`.
    pub fn insert_breakdown(
        &self,
        goal_id: &str,
        records: &[TaskRecord],
    ) -> Result<Vec<Task>, DbError> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM goals WHERE id = ?1)",
                params![goal_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(DbError::NotFound(format!("goal {goal_id}")));
            }

            let now = Utc::now();
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO tasks (id, goal_id, position, title, description, duration_days,
                                        dependencies, start_day, end_day, priority, status,
                                        created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                )?;
                for (position, record) in records.iter().enumerate() {
                    let deps = serde_json::to_string(&record.dependencies).map_err(|e| {
                        rusqlite::Error::ToSqlConversionFailure(Box::new(e))
                    })?;
                    stmt.execute(params![
                        uuid::Uuid::new_v4().to_string(),
                        goal_id,
                        position as i64,
                        record.title,
                        record.description,
                        record.duration_days,
                        deps,
                        record.start_day,
                        record.end_day,
                        record.priority,
                        Status::Pending.as_str(),
                        now,
                        now,
                    ])?;
                }
            }
            tx.commit()?;
            load_tasks(conn, goal_id)
        })
    }

    pub fn get_task(&self, id: &str) -> Result<Task, DbError> {
        self.with_conn(|conn| load_task(conn, id))
    }

    pub fn list_tasks_for_goal(&self, goal_id: &str) -> Result<Vec<Task>, DbError> {
        self.with_conn(|conn| load_tasks(conn, goal_id))
    }

    /// Apply a partial update. Changing the duration moves `end_day` with it.
    pub fn update_task(&self, id: &str, update: &UpdateTask) -> Result<Task, DbError> {
        self.with_conn(|conn| {
            let mut sets = Vec::new();
            let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(ref title) = update.title {
                sets.push("title = ?");
                values.push(Box::new(title.clone()));
            }
            if let Some(ref description) = update.description {
                sets.push("description = ?");
                values.push(Box::new(description.clone()));
            }
            if let Some(duration_days) = update.duration_days {
                if !(1..=MAX_TASK_DAYS).contains(&duration_days) {
                    return Err(DbError::InvalidInput(format!(
                        "duration_days must be between 1 and {MAX_TASK_DAYS}, got {duration_days}"
                    )));
                }
                let start_day: i64 = conn
                    .query_row(
                        "SELECT start_day FROM tasks WHERE id = ?1",
                        params![id],
                        |row| row.get(0),
                    )
                    .optional()?
                    .ok_or_else(|| DbError::NotFound(format!("task {id}")))?;
                let end_day = start_day.checked_add(duration_days - 1).ok_or_else(|| {
                    DbError::InvalidInput(format!("task {id} would end past day {}", i64::MAX))
                })?;
                sets.push("duration_days = ?");
                values.push(Box::new(duration_days));
                sets.push("end_day = ?");
                values.push(Box::new(end_day));
            }
            if let Some(ref priority) = update.priority {
                sets.push("priority = ?");
                values.push(Box::new(priority.clone()));
            }
            if let Some(status) = update.status {
                sets.push("status = ?");
                values.push(Box::new(status.as_str().to_string()));
            }

            if sets.is_empty() {
                return load_task(conn, id);
            }

            sets.push("updated_at = ?");
            values.push(Box::new(Utc::now()));
            values.push(Box::new(id.to_string()));

            let sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));
            let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
            let changed = conn.execute(&sql, params.as_slice())?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("task {id}")));
            }
            load_task(conn, id)
        })
    }

    pub fn delete_task(&self, id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("task {id}")));
            }
            Ok(())
        })
    }
}
