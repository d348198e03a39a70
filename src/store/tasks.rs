//! Scheduled-task mirror — upsert by `task_id`, list by `next_run`.
//!
//! The external scheduler owns task execution and pushes its state here for
//! display. This module never computes recurrences or advances `next_run`.

use anyhow::Result;
use rusqlite::{params, Connection, Row};

use crate::store::now_ms;
use crate::store::types::{ScheduledTask, UpsertTask};

/// Create or refresh a task by its natural key.
///
/// One conditional statement: the insert either lands (setting
/// `created_at = updated_at = now`) or hits the `task_id` PRIMARY KEY and
/// patches every supplied field plus `updated_at`, preserving `created_at`.
/// Last write wins — no version check, and no separate existence lookup to
/// race against.
pub fn upsert_scheduled_task(conn: &Connection, task: &UpsertTask) -> Result<ScheduledTask> {
    let now = now_ms();
    let schedule_json = serde_json::to_string(&task.schedule)?;

    conn.execute(
        "INSERT INTO scheduled_tasks (task_id, name, description, schedule, next_run, model, enabled, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8) \
         ON CONFLICT(task_id) DO UPDATE SET \
             name = excluded.name, \
             description = excluded.description, \
             schedule = excluded.schedule, \
             next_run = excluded.next_run, \
             model = excluded.model, \
             enabled = excluded.enabled, \
             updated_at = excluded.updated_at",
        params![
            task.task_id,
            task.name,
            task.description,
            schedule_json,
            task.next_run,
            task.model,
            task.enabled,
            now,
        ],
    )?;

    let stored = conn.query_row(
        "SELECT task_id, name, description, schedule, next_run, model, enabled, created_at, updated_at \
         FROM scheduled_tasks WHERE task_id = ?1",
        params![task.task_id],
        task_from_row,
    )?;
    Ok(stored)
}

/// All tasks, ascending by `next_run` (ties break on `task_id`). Order is
/// computed fresh each call.
pub fn get_scheduled_tasks(conn: &Connection) -> Result<Vec<ScheduledTask>> {
    let mut stmt = conn.prepare(
        "SELECT task_id, name, description, schedule, next_run, model, enabled, created_at, updated_at \
         FROM scheduled_tasks ORDER BY next_run ASC, task_id ASC",
    )?;

    let tasks = stmt
        .query_map([], task_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Map one `scheduled_tasks` row to a [`ScheduledTask`].
pub(crate) fn task_from_row(row: &Row<'_>) -> rusqlite::Result<ScheduledTask> {
    let schedule_json: String = row.get(3)?;
    let schedule = serde_json::from_str(&schedule_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ScheduledTask {
        task_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        schedule,
        next_run: row.get(4)?,
        model: row.get(5)?,
        enabled: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
