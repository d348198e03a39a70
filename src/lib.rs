//! Mission-control data hub for AI automation agents.
//!
//! Opsdeck is the persistence layer behind an agent dashboard: an external
//! automation agent reports everything it does to a small HTTP hub, and
//! presentation surfaces subscribe to live result sets instead of polling.
//!
//! Four collections, all in one SQLite file:
//!
//! | Collection | Key | Semantics |
//! |------------|-----|-----------|
//! | **Activity feed** | append-only | immutable log of agent actions (duration, tokens, cost, status) |
//! | **Scheduled tasks** | `task_id` | read-mirror of an external scheduler's state, upsert-by-key |
//! | **Memories** | `file_path` | indexed text artifacts with free-form tags |
//! | **Documents** | `file_path` | indexed text artifacts with a `doc_type` |
//!
//! # Architecture
//!
//! - **Storage**: SQLite (WAL) with a forward-only migration framework
//! - **Write API**: one append path plus conditional upserts (`ON CONFLICT`,
//!   no read-then-write race)
//! - **Read API**: feed paging, task listing, windowed stats, and naive
//!   case-insensitive substring search across both document collections
//! - **Live updates**: a broadcast [`live::ChangeHub`]; writers notify,
//!   subscribers re-run their read — no poll loop
//! - **Transport**: HTTP (axum) with SSE subscription streams
//! - **Agent side**: fire-and-forget logging clients; lost events are an
//!   accepted risk, never a blocked agent
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite initialization, schema, and migrations
//! - [`store`] — Write/Read API over the four collections
//! - [`live`] — Change notification hub for subscription push
//! - [`server`] — HTTP surface: write endpoint, queries, SSE streams
//! - [`client`] — Agent-side loggers and dashboard data hooks

pub mod client;
pub mod config;
pub mod db;
pub mod live;
pub mod server;
pub mod store;
