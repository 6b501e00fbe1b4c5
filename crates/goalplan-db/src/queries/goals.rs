use chrono::Utc;
use rusqlite::{params, Connection, Row};

use goalplan_core::goal::{CreateGoal, Goal, UpdateGoal};

use super::tasks::load_tasks;
use crate::{Db, DbError};

fn row_to_goal(row: &Row) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        deadline_days: row.get("deadline_days")?,
        created_at: row.get("created_at")?,
        tasks: Vec::new(),
    })
}

/// Fetch a goal and its tasks on an already-locked connection.
fn load_goal(conn: &Connection, id: &str) -> Result<Goal, DbError> {
    let mut goal = conn
        .query_row(
            "SELECT * FROM goals WHERE id = ?1",
            params![id],
            row_to_goal,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("goal {id}")),
            other => DbError::Sqlite(other),
        })?;
    goal.tasks = load_tasks(conn, &goal.id)?;
    Ok(goal)
}

impl Db {
    pub fn create_goal(&self, input: &CreateGoal) -> Result<Goal, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO goals (id, title, description, deadline_days, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, input.title, input.description, input.deadline_days, now, now],
            )?;
            load_goal(conn, &id)
        })
    }

    pub fn get_goal(&self, id: &str) -> Result<Goal, DbError> {
        self.with_conn(|conn| load_goal(conn, id))
    }

    /// All goals with their tasks, newest first.
    pub fn list_goals(&self) -> Result<Vec<Goal>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM goals ORDER BY created_at DESC, rowid DESC")?;
            let mut goals = stmt
                .query_map([], row_to_goal)?
                .collect::<Result<Vec<_>, _>>()?;
            for goal in &mut goals {
                goal.tasks = load_tasks(conn, &goal.id)?;
            }
            Ok(goals)
        })
    }

    pub fn update_goal(&self, id: &str, update: &UpdateGoal) -> Result<Goal, DbError> {
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
            if let Some(deadline_days) = update.deadline_days {
                sets.push("deadline_days = ?");
                values.push(Box::new(deadline_days));
            }

            if sets.is_empty() {
                return load_goal(conn, id);
            }

            sets.push("updated_at = ?");
            values.push(Box::new(Utc::now()));
            values.push(Box::new(id.to_string()));

            let sql = format!("UPDATE goals SET {} WHERE id = ?", sets.join(", "));
            let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
            let changed = conn.execute(&sql, params.as_slice())?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("goal {id}")));
            }
            load_goal(conn, id)
        })
    }

    /// Delete a goal; its tasks go with it.
    pub fn delete_goal(&self, id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM goals WHERE id = ?1", params![id])?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("goal {id}")));
            }
            Ok(())
        })
    }
}
