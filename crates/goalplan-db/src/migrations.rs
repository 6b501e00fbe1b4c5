use rusqlite::Connection;

use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS goals (
            id            TEXT PRIMARY KEY,
            title         TEXT NOT NULL,
            description   TEXT NOT NULL DEFAULT '',
            deadline_days INTEGER NOT NULL CHECK(deadline_days >= 1),
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id            TEXT PRIMARY KEY,
            goal_id       TEXT NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
            position      INTEGER NOT NULL,
            title         TEXT NOT NULL,
            description   TEXT NOT NULL DEFAULT '',
            duration_days INTEGER NOT NULL DEFAULT 1,
            dependencies  TEXT NOT NULL DEFAULT '[]',
            start_day     INTEGER NOT NULL DEFAULT 0,
            end_day       INTEGER NOT NULL DEFAULT 0,
            priority      TEXT NOT NULL DEFAULT 'Medium',
            status        TEXT NOT NULL DEFAULT 'pending'
                              CHECK(status IN ('pending', 'in_progress', 'completed')),
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tasks_goal ON tasks(goal_id, position);
        ",
    )?;
    Ok(())
}
