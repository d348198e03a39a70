//! SQL DDL for all opsdeck tables.
//!
//! Defines the `activity_feed`, `scheduled_tasks`, `memories`, `documents`,
//! and `schema_meta` tables. All DDL uses `IF NOT EXISTS` for idempotent
//! initialization.
//!
//! Natural keys (`task_id`, `file_path`) are PRIMARY KEYs so that the upsert
//! operations are single conditional statements — there is no separate
//! existence check to race against.

use rusqlite::Connection;

/// All schema DDL statements for opsdeck's collections.
const SCHEMA_SQL: &str = r#"
-- Append-only log of agent actions. Rows are inserted with a server-assigned
-- timestamp and never updated or deleted.
CREATE TABLE IF NOT EXISTS activity_feed (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp INTEGER NOT NULL,
    action TEXT NOT NULL,
    description TEXT NOT NULL,
    duration_ms INTEGER NOT NULL CHECK(duration_ms >= 0),
    tokens_used INTEGER CHECK(tokens_used IS NULL OR tokens_used >= 0),
    cost REAL CHECK(cost IS NULL OR cost >= 0.0),
    status TEXT NOT NULL CHECK(status IN ('completed','failed','in_progress')),
    metadata TEXT
);

CREATE INDEX IF NOT EXISTS idx_activity_timestamp ON activity_feed(timestamp);

-- Read-mirror of an external scheduler. Nothing here executes tasks or
-- advances next_run; the scheduler pushes its own state for display.
CREATE TABLE IF NOT EXISTS scheduled_tasks (
    task_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    schedule TEXT NOT NULL,
    next_run INTEGER NOT NULL,
    model TEXT,
    enabled INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_next_run ON scheduled_tasks(next_run);

-- Indexed memory files, keyed by path. tags is a JSON array of strings.
CREATE TABLE IF NOT EXISTS memories (
    file_path TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    tags TEXT NOT NULL DEFAULT '[]',
    indexed_at INTEGER NOT NULL
);

-- Indexed project documents, keyed by path.
CREATE TABLE IF NOT EXISTS documents (
    file_path TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    doc_type TEXT NOT NULL,
    indexed_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_doc_type ON documents(doc_type);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
