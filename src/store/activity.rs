//! Activity log — append path, feed paging, and windowed stats.
//!
//! The log is append-only: [`log_activity`] is the single write entry point,
//! and no update or delete statement exists in this module or anywhere else
//! in the crate. The timestamp is assigned here, at insert, from the server
//! clock; callers cannot backdate events.

use anyhow::Result;
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;

use crate::store::now_ms;
use crate::store::types::{ActivityEvent, ActivityStats, NewActivity};

/// Append one event to the activity log. Returns the stored row, including
/// the server-assigned timestamp.
pub fn log_activity(conn: &Connection, entry: &NewActivity) -> Result<ActivityEvent> {
    let timestamp = now_ms();
    let metadata_json = entry
        .metadata
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO activity_feed (timestamp, action, description, duration_ms, tokens_used, cost, status, metadata) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            timestamp,
            entry.action,
            entry.description,
            entry.duration_ms,
            entry.tokens_used,
            entry.cost,
            entry.status.as_str(),
            metadata_json,
        ],
    )?;

    Ok(ActivityEvent {
        id: conn.last_insert_rowid(),
        timestamp,
        action: entry.action.clone(),
        description: entry.description.clone(),
        duration_ms: entry.duration_ms,
        tokens_used: entry.tokens_used,
        cost: entry.cost,
        status: entry.status,
        metadata: entry.metadata.clone(),
    })
}

/// The `limit` most recent events, newest first, via the timestamp index.
///
/// There is no pagination cursor; callers wanting older events ask for a
/// larger page. Events sharing a millisecond order newest-rowid first.
pub fn get_activity_feed(conn: &Connection, limit: usize) -> Result<Vec<ActivityEvent>> {
    let mut stmt = conn.prepare(
        "SELECT id, timestamp, action, description, duration_ms, tokens_used, cost, status, metadata \
         FROM activity_feed ORDER BY timestamp DESC, id DESC LIMIT ?1",
    )?;

    let events = stmt
        .query_map(params![limit as i64], event_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(events)
}

/// Aggregate the trailing `last_hours` window of the log: event count, token
/// and cost sums (missing values counted as 0), and a per-action histogram.
///
/// A linear scan bounded by the time filter — fine at dashboard scale; an
/// indexed rollup would be needed well before this becomes the bottleneck.
pub fn get_activity_stats(conn: &Connection, last_hours: i64) -> Result<ActivityStats> {
    let cutoff = now_ms() - last_hours * 3_600_000;

    let (total_actions, total_tokens, total_cost): (u64, i64, f64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(COALESCE(tokens_used, 0)), 0), COALESCE(SUM(COALESCE(cost, 0.0)), 0.0) \
         FROM activity_feed WHERE timestamp > ?1",
        params![cutoff],
        |row| Ok((row.get::<_, i64>(0)? as u64, row.get(1)?, row.get(2)?)),
    )?;

    let mut actions_by_type = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT action, COUNT(*) FROM activity_feed WHERE timestamp > ?1 GROUP BY action",
    )?;
    let rows = stmt.query_map(params![cutoff], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
    })?;
    for row in rows {
        let (action, count) = row?;
        actions_by_type.insert(action, count);
    }

    Ok(ActivityStats {
        total_actions,
        total_tokens,
        total_cost,
        actions_by_type,
    })
}

/// Map one `activity_feed` row to an [`ActivityEvent`].
pub(crate) fn event_from_row(row: &Row<'_>) -> rusqlite::Result<ActivityEvent> {
    let status_str: String = row.get(7)?;
    let status = status_str.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, e.into())
    })?;
    let metadata: Option<String> = row.get(8)?;

    Ok(ActivityEvent {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        action: row.get(2)?,
        description: row.get(3)?,
        duration_ms: row.get(4)?,
        tokens_used: row.get(5)?,
        cost: row.get(6)?,
        status,
        metadata: metadata.and_then(|s| serde_json::from_str(&s).ok()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::store::types::ActivityStatus;

    fn entry(action: &str, tokens: Option<i64>, cost: Option<f64>) -> NewActivity {
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

    #[test]
    fn append_assigns_server_timestamp() {
        let conn = db::open_memory_database().unwrap();
        let before = now_ms();
        let event = log_activity(&conn, &entry("search", Some(100), Some(0.01))).unwrap();
        let after = now_ms();

        assert!(event.timestamp >= before && event.timestamp <= after);
        assert_eq!(event.action, "search");
    }

    #[test]
    fn append_preserves_metadata_round_trip() {
        let conn = db::open_memory_database().unwrap();
        let mut e = entry("api_call", None, None);
        e.metadata = Some(serde_json::json!({"api_name": "brave", "endpoint": "/search"}));
        log_activity(&conn, &e).unwrap();

        let feed = get_activity_feed(&conn, 10).unwrap();
        assert_eq!(
            feed[0].metadata.as_ref().unwrap()["api_name"],
            "brave"
        );
    }

    #[test]
    fn feed_returns_newest_first() {
        let conn = db::open_memory_database().unwrap();
        // Insert with explicit timestamps so the ordering is unambiguous
        for ts in [100, 300, 200] {
            conn.execute(
                "INSERT INTO activity_feed (timestamp, action, description, duration_ms, status) \
                 VALUES (?1, 'search', 'x', 10, 'completed')",
                params![ts],
            )
            .unwrap();
        }

        let feed = get_activity_feed(&conn, 10).unwrap();
        let timestamps: Vec<i64> = feed.iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![300, 200, 100]);
    }

    #[test]
    fn feed_limit_caps_page_size() {
        let conn = db::open_memory_database().unwrap();
        for _ in 0..5 {
            log_activity(&conn, &entry("search", None, None)).unwrap();
        }
        assert_eq!(get_activity_feed(&conn, 3).unwrap().len(), 3);
        assert_eq!(get_activity_feed(&conn, 10).unwrap().len(), 5);
    }

    #[test]
    fn stats_sums_and_histogram() {
        let conn = db::open_memory_database().unwrap();
        log_activity(&conn, &entry("search", Some(100), Some(1.0))).unwrap();
        log_activity(&conn, &entry("search", Some(50), Some(0.5))).unwrap();
        log_activity(&conn, &entry("api_call", None, None)).unwrap();

        let stats = get_activity_stats(&conn, 24).unwrap();
        assert_eq!(stats.total_actions, 3);
        assert_eq!(stats.total_tokens, 150);
        assert!((stats.total_cost - 1.5).abs() < 1e-9);
        assert_eq!(stats.actions_by_type["search"], 2);
        assert_eq!(stats.actions_by_type["api_call"], 1);
    }

    #[test]
    fn stats_empty_window_is_zeroed() {
        let conn = db::open_memory_database().unwrap();
        let stats = get_activity_stats(&conn, 24).unwrap();
        assert_eq!(stats.total_actions, 0);
        assert_eq!(stats.total_tokens, 0);
        assert_eq!(stats.total_cost, 0.0);
        assert!(stats.actions_by_type.is_empty());
    }
}
