//! Write/Read API over the four collections.
//!
//! Every operation is one transaction against a borrowed connection; callers
//! in async contexts wrap these in `spawn_blocking`. Writes are an append
//! ([`activity::log_activity`]) and three conditional upserts; reads are the
//! four dashboard queries.

pub mod activity;
pub mod index;
pub mod search;
pub mod tasks;
pub mod types;

/// Current wall-clock time in epoch milliseconds, the authoritative clock
/// for every stored timestamp.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
