use anyhow::Result;
use chrono::TimeZone;

use opsdeck::config::OpsdeckConfig;
use opsdeck::db;
use opsdeck::store;
use opsdeck::store::types::{Schedule, UpsertTask};

/// Create or refresh a task in the mirror. Generates a UUID task id when the
/// caller doesn't supply one.
#[allow(clippy::too_many_arguments)]
pub fn add(
    config: &OpsdeckConfig,
    task_id: Option<String>,
    name: String,
    description: Option<String>,
    schedule: Schedule,
    next_run: i64,
    model: Option<String>,
    enabled: bool,
) -> Result<()> {
    let task_id = task_id.unwrap_or_else(|| uuid::Uuid::now_v7().to_string());

    let conn = db::open_database(config.resolved_db_path())?;
    let stored = store::tasks::upsert_scheduled_task(
        &conn,
        &UpsertTask {
            task_id,
            name,
            description,
            schedule,
            next_run,
            model,
            enabled,
        },
    )?;

    println!("Upserted task {} ({})", stored.task_id, stored.name);
    Ok(())
}

/// Print all mirrored tasks, soonest first.
pub fn list(config: &OpsdeckConfig) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let tasks = store::tasks::get_scheduled_tasks(&conn)?;

    if tasks.is_empty() {
        println!("No scheduled tasks.");
        return Ok(());
    }

    println!("Scheduled Tasks");
    println!("{}", "=".repeat(60));
    for task in tasks {
        let next = chrono::Utc
            .timestamp_millis_opt(task.next_run)
            .single()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| task.next_run.to_string());
        let state = if task.enabled { "enabled" } else { "disabled" };
        println!("  {:<38} {:<10} next {}", task.name, state, next);
        match &task.schedule {
            Schedule::Cron { expr } => println!("      cron: {expr}"),
            Schedule::Every { every_ms } => println!("      every: {every_ms}ms"),
            Schedule::At { at_ms } => println!("      at: {at_ms}"),
        }
    }

    Ok(())
}
