//! Read-side data hooks for an embedded dashboard.
//!
//! Each hook is backed by exactly one Read API operation. When the live
//! result set is empty, the hook substitutes the last non-empty result it
//! saw (while fresh) or, failing that, the static [`sample`](crate::client::sample)
//! dataset — and says so in the returned [`HookData`] variant. Hooks never
//! write to the store.
//!
//! Presentation layers re-run hooks when [`DashboardHooks::changes`]
//! delivers a notice for the hook's collection; there is no poll loop.

use anyhow::Result;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

use crate::client::sample;
use crate::live::{ChangeHub, Collection};
use crate::store;
use crate::store::types::{ActivityEvent, ActivityStats, ScheduledTask, SearchResponse};

/// A hook result, labeled with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum HookData<T> {
    /// Fresh from the store.
    Live(T),
    /// The store is currently empty; this is the last non-empty live result,
    /// still within the cache's staleness window.
    Cached(T),
    /// The store is empty and no cached result is fresh; this is the static
    /// sample dataset.
    Fallback(T),
}

impl<T> HookData<T> {
    pub fn data(&self) -> &T {
        match self {
            Self::Live(t) | Self::Cached(t) | Self::Fallback(t) => t,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Live(t) | Self::Cached(t) | Self::Fallback(t) => t,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

/// Client-local result mirror with an explicit staleness policy.
///
/// Constructor-injected into [`DashboardHooks`] — there is no module-level
/// state. Entries older than the TTL are treated as absent.
pub struct ResultCache {
    ttl: Duration,
    slots: Mutex<HashMap<&'static str, (Instant, serde_json::Value)>>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let slots = self.slots.lock().ok()?;
        let (stored_at, value) = slots.get(key)?;
        if stored_at.elapsed() > self.ttl {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn set<T: Serialize>(&self, key: &'static str, value: &T) {
        if let (Ok(mut slots), Ok(json)) = (self.slots.lock(), serde_json::to_value(value)) {
            slots.insert(key, (Instant::now(), json));
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.clear();
        }
    }
}

const FEED_KEY: &str = "activity_feed";
const TASKS_KEY: &str = "scheduled_tasks";
const STATS_KEY: &str = "activity_stats";

/// Data accessors for the four dashboard surfaces.
pub struct DashboardHooks {
    db: Arc<Mutex<Connection>>,
    hub: ChangeHub,
    cache: Arc<ResultCache>,
}

impl DashboardHooks {
    /// The cache is injected so it can outlive one hook set (a dashboard
    /// reconnecting to a fresh store keeps its warm mirror).
    pub fn new(db: Arc<Mutex<Connection>>, hub: ChangeHub, cache: Arc<ResultCache>) -> Self {
        Self { db, hub, cache }
    }

    /// Change notices; re-run the relevant hook when one arrives.
    pub fn changes(&self) -> broadcast::Receiver<Collection> {
        self.hub.subscribe()
    }

    /// The activity feed surface.
    pub fn activity_feed(&self, limit: usize) -> Result<HookData<Vec<ActivityEvent>>> {
        let live = self.with_conn(|conn| store::activity::get_activity_feed(conn, limit))?;
        Ok(self.resolve(FEED_KEY, live, |v| v.is_empty(), sample::activity_feed))
    }

    /// The calendar surface.
    pub fn scheduled_tasks(&self) -> Result<HookData<Vec<ScheduledTask>>> {
        let live = self.with_conn(store::tasks::get_scheduled_tasks)?;
        Ok(self.resolve(TASKS_KEY, live, |v| v.is_empty(), sample::scheduled_tasks))
    }

    /// The summary-stats surface.
    pub fn activity_stats(&self, last_hours: i64) -> Result<HookData<ActivityStats>> {
        let live = self.with_conn(|conn| store::activity::get_activity_stats(conn, last_hours))?;
        Ok(self.resolve(
            STATS_KEY,
            live,
            |s| s.total_actions == 0,
            sample::activity_stats,
        ))
    }

    /// The search surface. No fallback: an empty result for a real query is
    /// meaningful and is shown as such.
    pub fn search(&self, query: &str) -> Result<SearchResponse> {
        self.with_conn(|conn| store::search::global_search(conn, query))
    }

    fn with_conn<T>(&self, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .db
            .lock()
            .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
        op(&conn)
    }

    /// Live data wins and refreshes the mirror; an empty result falls back to
    /// the fresh mirror, then to the static sample.
    fn resolve<T>(
        &self,
        key: &'static str,
        live: T,
        is_empty: impl Fn(&T) -> bool,
        fallback: impl FnOnce() -> T,
    ) -> HookData<T>
    where
        T: Serialize + DeserializeOwned,
    {
        if !is_empty(&live) {
            self.cache.set(key, &live);
            return HookData::Live(live);
        }
        match self.cache.get::<T>(key) {
            Some(cached) if !is_empty(&cached) => HookData::Cached(cached),
            _ => HookData::Fallback(fallback()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::store::types::{ActivityStatus, NewActivity};

    fn hooks() -> DashboardHooks {
        let conn = db::open_memory_database().unwrap();
        DashboardHooks::new(
            Arc::new(Mutex::new(conn)),
            ChangeHub::new(),
            Arc::new(ResultCache::new(Duration::from_secs(300))),
        )
    }

    #[test]
    fn empty_store_yields_fallback() {
        let hooks = hooks();
        assert!(matches!(
            hooks.activity_feed(50).unwrap(),
            HookData::Fallback(_)
        ));
        assert!(matches!(
            hooks.scheduled_tasks().unwrap(),
            HookData::Fallback(_)
        ));
        assert!(matches!(
            hooks.activity_stats(24).unwrap(),
            HookData::Fallback(_)
        ));
    }

    #[test]
    fn live_data_wins_once_present() {
        let hooks = hooks();
        {
            let conn = hooks.db.lock().unwrap();
            store::activity::log_activity(
                &conn,
                &NewActivity {
                    action: "search".into(),
                    description: "Web search".into(),
                    duration_ms: 100,
                    tokens_used: None,
                    cost: None,
                    status: ActivityStatus::Completed,
                    metadata: None,
                },
            )
            .unwrap();
        }

        let feed = hooks.activity_feed(50).unwrap();
        assert!(feed.is_live());
        assert_eq!(feed.data().len(), 1);
    }

    #[test]
    fn stale_cache_is_treated_as_absent() {
        let cache = ResultCache::new(Duration::from_millis(0));
        cache.set("k", &vec![1, 2, 3]);
        std::thread::sleep(Duration::from_millis(2));
        assert!(cache.get::<Vec<i32>>("k").is_none());
    }

    #[test]
    fn cache_clear_empties_all_slots() {
        let cache = ResultCache::new(Duration::from_secs(300));
        cache.set("k", &1);
        cache.clear();
        assert!(cache.get::<i32>("k").is_none());
    }

    #[test]
    fn search_has_no_fallback() {
        let hooks = hooks();
        let results = hooks.search("golf").unwrap();
        assert!(results.is_empty());
    }
}
