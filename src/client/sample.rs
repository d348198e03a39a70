//! Fixed, illustrative datasets shown while the store is empty.
//!
//! Purely a presentation fallback: nothing here is ever written to the
//! store, and the synthetic row ids are negative so they can never collide
//! with persisted rows.

use chrono::{Datelike, Duration, Utc};
use serde_json::json;

use crate::store::now_ms;
use crate::store::types::{
    ActivityEvent, ActivityStats, ActivityStatus, Schedule, ScheduledTask,
};

/// Sample agent activity, spaced five minutes apart ending now.
pub fn activity_feed() -> Vec<ActivityEvent> {
    let entries: Vec<(&str, &str, i64, i64, f64, serde_json::Value)> = vec![
        (
            "cron_executed",
            "Daily Morning Brief — news and market summary",
            8200,
            4200,
            0.063,
            json!({"job_id": "daily_morning_brief"}),
        ),
        (
            "api_call",
            "Searched for golf influencer trends via Brave API",
            2150,
            1240,
            0.0186,
            json!({"source": "brave", "query": "golf influencers"}),
        ),
        (
            "memory_indexed",
            "Indexed memory: MEMORY.md (342 lines)",
            450,
            0,
            0.0,
            json!({"file_path": "MEMORY.md", "lines": 342}),
        ),
        (
            "file_created",
            "Generated GROWTH-STRATEGY.md",
            3200,
            8542,
            0.1285,
            json!({"file": "GROWTH-STRATEGY.md"}),
        ),
        (
            "api_call",
            "Claude analysis: DTC customer acquisition trends",
            5100,
            15240,
            0.2286,
            json!({"model": "claude-opus"}),
        ),
        (
            "search",
            "Brave search: competitor market analysis",
            1840,
            980,
            0.0147,
            json!({"source": "brave", "results": 8}),
        ),
    ];

    let now = now_ms();
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (action, description, duration_ms, tokens, cost, metadata))| {
            ActivityEvent {
                // Negative synthetic id, never present in the store
                id: -(i as i64) - 1,
                // Newest first, matching the live feed's ordering
                timestamp: now - (i as i64) * 300_000,
                action: action.into(),
                description: description.into(),
                duration_ms,
                tokens_used: Some(tokens),
                cost: Some(cost),
                status: ActivityStatus::Completed,
                metadata: Some(metadata),
            }
        })
        .collect()
}

/// A week of morning-brief placeholders, one per day at 07:30.
pub fn scheduled_tasks() -> Vec<ScheduledTask> {
    let now = Utc::now();
    let sunday = now.date_naive() - Duration::days(now.weekday().num_days_from_sunday() as i64);
    let now_ms = now.timestamp_millis();

    (0..7)
        .map(|day| {
            let fire_at = (sunday + Duration::days(day))
                .and_hms_opt(7, 30, 0)
                .expect("07:30 is a valid time")
                .and_utc()
                .timestamp_millis();
            ScheduledTask {
                task_id: format!("sample_morning_brief_{day}"),
                name: "Daily Morning Brief".into(),
                description: Some("Daily news and market briefing at 7:30am".into()),
                schedule: Schedule::Cron {
                    expr: "30 7 * * *".into(),
                },
                next_run: fire_at,
                model: Some("haiku".into()),
                enabled: true,
                created_at: now_ms,
                updated_at: now_ms,
            }
        })
        .collect()
}

/// Stats consistent with [`activity_feed`].
pub fn activity_stats() -> ActivityStats {
    let feed = activity_feed();
    let mut stats = ActivityStats {
        total_actions: feed.len() as u64,
        ..Default::default()
    };
    for event in &feed {
        stats.total_tokens += event.tokens_used.unwrap_or(0);
        stats.total_cost += event.cost.unwrap_or(0.0);
        *stats.actions_by_type.entry(event.action.clone()).or_insert(0) += 1;
    }
    stats
}
