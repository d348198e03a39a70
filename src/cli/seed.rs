use anyhow::Result;

use opsdeck::client::sample;
use opsdeck::config::OpsdeckConfig;
use opsdeck::db;
use opsdeck::store;
use opsdeck::store::types::{NewActivity, UpsertTask};

/// Load the illustrative sample dataset into the store for local
/// development. Activity rows go through the normal append path, so their
/// timestamps are assigned at seed time.
pub fn run(config: &OpsdeckConfig) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;

    let events = sample::activity_feed();
    for event in &events {
        store::activity::log_activity(
            &conn,
            &NewActivity {
                action: event.action.clone(),
                description: event.description.clone(),
                duration_ms: event.duration_ms,
                tokens_used: event.tokens_used,
                cost: event.cost,
                status: event.status,
                metadata: event.metadata.clone(),
            },
        )?;
    }

    let tasks = sample::scheduled_tasks();
    for task in &tasks {
        store::tasks::upsert_scheduled_task(
            &conn,
            &UpsertTask {
                task_id: task.task_id.clone(),
                name: task.name.clone(),
                description: task.description.clone(),
                schedule: task.schedule.clone(),
                next_run: task.next_run,
                model: task.model.clone(),
                enabled: task.enabled,
            },
        )?;
    }

    store::index::index_memory(
        &conn,
        "MEMORY.md",
        "Long-term notes: growth experiments, supplier contacts, brand voice.",
        &["notes".to_string(), "long-term".to_string()],
    )?;
    store::index::index_document(
        &conn,
        "projects/pouches/GROWTH-STRATEGY.md",
        "Golf Strategy: lean into the Masters window with influencer bundles.",
        "strategy",
    )?;

    println!(
        "Seeded {} activity events, {} tasks, 1 memory, 1 document.",
        events.len(),
        tasks.len()
    );
    Ok(())
}
