//! The fallback dataset is presentation-only: hooks must never write.

mod helpers;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use helpers::{entry, task, test_db};
use opsdeck::client::{DashboardHooks, HookData, ResultCache};
use opsdeck::live::ChangeHub;
use opsdeck::store;
use rusqlite::Connection;

fn hooks_over(conn: Connection, cache: Arc<ResultCache>) -> DashboardHooks {
    DashboardHooks::new(Arc::new(Mutex::new(conn)), ChangeHub::new(), cache)
}

#[test]
fn empty_store_renders_fallback_without_writing() {
    let db = Arc::new(Mutex::new(test_db()));
    let hooks = DashboardHooks::new(
        Arc::clone(&db),
        ChangeHub::new(),
        Arc::new(ResultCache::new(Duration::from_secs(300))),
    );

    let feed = hooks.activity_feed(50).unwrap();
    let tasks = hooks.scheduled_tasks().unwrap();
    let stats = hooks.activity_stats(24).unwrap();
    let search = hooks.search("golf").unwrap();

    assert!(matches!(feed, HookData::Fallback(_)));
    assert!(!feed.data().is_empty());
    assert!(matches!(tasks, HookData::Fallback(_)));
    assert!(matches!(stats, HookData::Fallback(_)));
    assert!(search.is_empty());

    // Nothing was persisted by rendering
    let conn = db.lock().unwrap();
    for table in ["activity_feed", "scheduled_tasks", "memories", "documents"] {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0, "{table} must stay empty");
    }
}

#[test]
fn live_data_replaces_fallback_after_first_write() {
    let db = Arc::new(Mutex::new(test_db()));
    let hooks = DashboardHooks::new(
        Arc::clone(&db),
        ChangeHub::new(),
        Arc::new(ResultCache::new(Duration::from_secs(300))),
    );

    {
        let conn = db.lock().unwrap();
        store::activity::log_activity(&conn, &entry("search", Some(10), None)).unwrap();
        store::tasks::upsert_scheduled_task(&conn, &task("brief", 100)).unwrap();
    }

    let feed = hooks.activity_feed(50).unwrap();
    assert!(feed.is_live());
    assert_eq!(feed.data().len(), 1);

    let tasks = hooks.scheduled_tasks().unwrap();
    assert!(tasks.is_live());

    let stats = hooks.activity_stats(24).unwrap();
    assert!(stats.is_live());
    assert_eq!(stats.data().total_actions, 1);
}

#[test]
fn warm_cache_outlives_the_store_it_was_filled_from() {
    let cache = Arc::new(ResultCache::new(Duration::from_secs(300)));

    // First hook set sees live data and fills the mirror
    let db_a = Arc::new(Mutex::new(test_db()));
    {
        let conn = db_a.lock().unwrap();
        store::activity::log_activity(&conn, &entry("search", Some(10), None)).unwrap();
    }
    let hooks_a = DashboardHooks::new(db_a, ChangeHub::new(), Arc::clone(&cache));
    assert!(hooks_a.activity_feed(50).unwrap().is_live());

    // Second hook set points at an empty store but keeps the warm mirror
    let hooks_b = hooks_over(test_db(), Arc::clone(&cache));
    let feed = hooks_b.activity_feed(50).unwrap();
    assert!(matches!(feed, HookData::Cached(_)));
    assert_eq!(feed.data().len(), 1);

    // Clearing the mirror drops back to the static sample
    cache.clear();
    let feed = hooks_b.activity_feed(50).unwrap();
    assert!(matches!(feed, HookData::Fallback(_)));
}
