//! Record types for the four collections.
//!
//! Defines [`ActivityStatus`] and [`Schedule`] (closed enums where the wire
//! format used open strings and optional companion fields), the stored record
//! structs, and the search/stats response shapes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of one agent action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Completed,
    Failed,
    InProgress,
}

impl ActivityStatus {
    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::InProgress => "in_progress",
        }
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "in_progress" => Ok(Self::InProgress),
            _ => Err(format!("unknown activity status: {s}")),
        }
    }
}

/// When a scheduled task fires, as reported by the external scheduler.
///
/// A closed tagged union: each kind carries exactly the field that is valid
/// for it. The serialized form keeps the scheduler's wire names (`kind`,
/// `expr`, `everyMs`, `atMs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// Recurring, cron expression (e.g. `"30 7 * * *"`).
    Cron { expr: String },
    /// Recurring, fixed interval in milliseconds.
    Every {
        #[serde(rename = "everyMs")]
        every_ms: i64,
    },
    /// One-shot, at an absolute epoch-millisecond instant.
    At {
        #[serde(rename = "atMs")]
        at_ms: i64,
    },
}

/// An immutable fact about one action taken by the agent.
///
/// `timestamp` is assigned by the hub at insert; there is no path that
/// updates or deletes a row once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Storage rowid, ascending with insertion order.
    pub id: i64,
    /// Epoch milliseconds, server-assigned.
    pub timestamp: i64,
    /// Open action tag (e.g. `"search"`, `"api_call"`, `"cron_executed"`).
    pub action: String,
    pub description: String,
    pub duration_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<i64>,
    /// Cost in currency units (dollars).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub status: ActivityStatus,
    /// Open-ended key/value bag (file path, search query, etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Write-side shape for one activity append. Deliberately has no timestamp
/// field: the hub's clock is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    pub action: String,
    pub description: String,
    pub duration_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub status: ActivityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// A named job descriptor mirrored from an external scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Externally supplied natural key (the scheduler's own task UUID).
    pub task_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schedule: Schedule,
    /// Epoch ms the task is next expected to fire. Display-only; nothing in
    /// this crate advances it.
    pub next_run: i64,
    /// Execution profile running this task (e.g. `"haiku"`, `"opus"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub enabled: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Write-side shape for a task upsert. `created_at`/`updated_at` are managed
/// by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertTask {
    pub task_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schedule: Schedule,
    pub next_run: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub enabled: bool,
}

/// An indexed memory file, unique by path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDoc {
    pub file_path: String,
    pub content: String,
    /// Free-form labels; matched by search alongside content and path.
    pub tags: Vec<String>,
    /// Epoch ms of the last (re)index.
    pub indexed_at: i64,
}

/// An indexed project document, unique by path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub file_path: String,
    pub content: String,
    /// Category tag (e.g. `"strategy"`, `"research"`, `"marketing"`).
    pub doc_type: String,
    pub indexed_at: i64,
}

/// Which collection a search hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    Memory,
    Document,
}

/// One global-search match, tagged with its source collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "type")]
    pub source: SearchSource,
    pub file_path: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    pub indexed_at: i64,
}

/// Response from global search, grouped per collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub memories: Vec<SearchHit>,
    pub documents: Vec<SearchHit>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty() && self.documents.is_empty()
    }
}

/// Aggregates over the activity log for a trailing time window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityStats {
    pub total_actions: u64,
    /// Sum of `tokens_used`, missing values counted as 0.
    pub total_tokens: i64,
    /// Sum of `cost`, missing values counted as 0.
    pub total_cost: f64,
    /// Event counts keyed by action tag.
    pub actions_by_type: HashMap<String, u64>,
}
