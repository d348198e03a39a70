//! Fire-and-forget activity posters for the automation agent.
//!
//! Every call builds one activity payload and POSTs it to the hub's write
//! endpoint. Delivery is best-effort and at-most-once: a missing base URL, a
//! non-2xx response, or a transport error logs a warning and returns
//! normally — the agent is never blocked and never retries. Lost events are
//! an accepted risk.
//!
//! The payload carries no timestamp; the hub assigns one at insert.

use serde_json::json;
use tracing::warn;

use crate::store::types::{ActivityStatus, NewActivity};

/// Environment variable naming the hub's base URL.
pub const BASE_URL_ENV: &str = "OPSDECK_URL";

/// A file operation reported by [`ActivityLogger::log_file_operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Read,
    Write,
    Delete,
    Move,
}

impl FileOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Move => "move",
        }
    }

    /// Capitalized verb for descriptions.
    fn label(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Delete => "Delete",
            Self::Move => "Move",
        }
    }
}

/// Where a search ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Web,
    Local,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Local => "local",
        }
    }
}

/// Execution profiles with known per-token rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostModel {
    Haiku,
    Opus,
}

/// Dollar cost of `tokens` under the given model's per-token rate.
pub fn estimate_token_cost(tokens: i64, model: CostModel) -> f64 {
    let rate = match model {
        CostModel::Haiku => 0.000_000_80, // $0.80 per million tokens
        CostModel::Opus => 0.000_015_00,  // $15 per million tokens
    };
    tokens as f64 * rate
}

/// HTTP poster for activity events.
pub struct ActivityLogger {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl ActivityLogger {
    /// Logger posting to an explicit base URL (e.g. `http://localhost:7411`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            http: reqwest::Client::new(),
        }
    }

    /// Logger configured from the `OPSDECK_URL` environment variable. When
    /// the variable is unset, every call warns and skips — agent startup
    /// never fails over a missing dashboard.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(BASE_URL_ENV).ok(),
            http: reqwest::Client::new(),
        }
    }

    /// POST one activity event. Failures are logged and swallowed.
    pub async fn log(&self, entry: &NewActivity) {
        let Some(base_url) = &self.base_url else {
            warn!("{BASE_URL_ENV} not set, skipping activity log");
            return;
        };

        let url = format!("{}/api/logActivity", base_url.trim_end_matches('/'));
        match self.http.post(&url).json(entry).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(status = %response.status(), action = %entry.action, "failed to log activity");
            }
            Ok(_) => {}
            Err(e) => {
                warn!(action = %entry.action, "error logging activity: {e}");
            }
        }
    }

    /// Report a file operation (`file_read`, `file_write`, ...).
    pub async fn log_file_operation(
        &self,
        op: FileOp,
        file_path: &str,
        duration_ms: i64,
        tokens_used: Option<i64>,
        cost: Option<f64>,
        status: ActivityStatus,
    ) {
        self.log(&NewActivity {
            action: format!("file_{}", op.as_str()),
            description: format!("{} {file_path}", op.label()),
            duration_ms,
            tokens_used,
            cost,
            status,
            metadata: Some(json!({"file_path": file_path, "operation": op.as_str()})),
        })
        .await;
    }

    /// Report a search and its result count.
    pub async fn log_search(
        &self,
        query: &str,
        results_count: u64,
        duration_ms: i64,
        tokens_used: Option<i64>,
        cost: Option<f64>,
        kind: SearchKind,
    ) {
        let scope = match kind {
            SearchKind::Web => "Web",
            SearchKind::Local => "Local",
        };
        self.log(&NewActivity {
            action: "search".into(),
            description: format!("{scope} search: \"{query}\" ({results_count} results)"),
            duration_ms,
            tokens_used,
            cost,
            status: ActivityStatus::Completed,
            metadata: Some(json!({
                "query": query,
                "results_count": results_count,
                "search_type": kind.as_str(),
            })),
        })
        .await;
    }

    /// Report an outbound API call.
    pub async fn log_api_call(
        &self,
        api_name: &str,
        endpoint: &str,
        duration_ms: i64,
        tokens_used: Option<i64>,
        cost: Option<f64>,
        status: ActivityStatus,
    ) {
        self.log(&NewActivity {
            action: "api_call".into(),
            description: format!("{api_name} → {endpoint}"),
            duration_ms,
            tokens_used,
            cost,
            status,
            metadata: Some(json!({"api_name": api_name, "endpoint": endpoint})),
        })
        .await;
    }

    /// Report a cron job run.
    pub async fn log_cron_execution(
        &self,
        job_name: &str,
        job_id: &str,
        duration_ms: i64,
        tokens_used: Option<i64>,
        cost: Option<f64>,
        status: ActivityStatus,
    ) {
        self.log(&NewActivity {
            action: "cron_executed".into(),
            description: format!("Cron job: {job_name}"),
            duration_ms,
            tokens_used,
            cost,
            status,
            metadata: Some(json!({"job_name": job_name, "job_id": job_id})),
        })
        .await;
    }

    /// Report a memory file being (re)indexed.
    pub async fn log_memory_indexing(
        &self,
        file_path: &str,
        lines: u64,
        duration_ms: i64,
        tokens_used: Option<i64>,
        cost: Option<f64>,
    ) {
        self.log(&NewActivity {
            action: "memory_indexed".into(),
            description: format!("Indexed memory: {file_path} ({lines} lines)"),
            duration_ms,
            tokens_used,
            cost,
            status: ActivityStatus::Completed,
            metadata: Some(json!({"file_path": file_path, "lines": lines})),
        })
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_rates_match_published_pricing() {
        // $0.80 and $15 per million tokens
        assert!((estimate_token_cost(1_000_000, CostModel::Haiku) - 0.80).abs() < 1e-9);
        assert!((estimate_token_cost(1_000_000, CostModel::Opus) - 15.0).abs() < 1e-9);
        assert_eq!(estimate_token_cost(0, CostModel::Haiku), 0.0);
    }

    #[tokio::test]
    async fn missing_base_url_skips_without_error() {
        let logger = ActivityLogger {
            base_url: None,
            http: reqwest::Client::new(),
        };
        // Must return normally; nothing to assert beyond "does not panic"
        logger
            .log(&NewActivity {
                action: "search".into(),
                description: "Web search".into(),
                duration_ms: 100,
                tokens_used: None,
                cost: None,
                status: ActivityStatus::Completed,
                metadata: None,
            })
            .await;
    }
}
