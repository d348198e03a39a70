#![allow(dead_code)]

use opsdeck::db;
use opsdeck::store::types::{ActivityStatus, NewActivity, Schedule, UpsertTask};
use rusqlite::{params, Connection};

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// A well-formed activity entry.
pub fn entry(action: &str, tokens: Option<i64>, cost: Option<f64>) -> NewActivity {
    NewActivity {
        action: action.into(),
        description: format!("{action} happened"),
        duration_ms: 1200,
        tokens_used: tokens,
        cost,
        status: ActivityStatus::Completed,
        metadata: None,
    }
}

/// Insert an event with an explicit timestamp, bypassing the append path.
///
/// The Write API cannot backdate events, so tests that need an old event
/// write the row directly.
pub fn insert_event_at(conn: &Connection, timestamp: i64, action: &str) -> i64 {
    conn.execute(
        "INSERT INTO activity_feed (timestamp, action, description, duration_ms, status) \
         VALUES (?1, ?2, 'backdated test event', 10, 'completed')",
        params![timestamp, action],
    )
    .unwrap();
    conn.last_insert_rowid()
}

/// A cron task with the given key and next fire time.
pub fn task(id: &str, next_run: i64) -> UpsertTask {
    UpsertTask {
        task_id: id.into(),
        name: "Daily Morning Brief".into(),
        description: Some("Daily news briefing at 7:30am".into()),
        schedule: Schedule::Cron {
            expr: "30 7 * * *".into(),
        },
        next_run,
        model: Some("haiku".into()),
        enabled: true,
    }
}
