//! HTTP surface of the hub: the agent-facing write endpoint, dashboard
//! queries, and SSE subscription streams.
//!
//! All routes live under `/api` and the router carries the shared database
//! handle plus the [`ChangeHub`]. Database work runs on `spawn_blocking`;
//! every successful write notifies the hub so subscribers re-push.
//!
//! `POST /api/logActivity` keeps the path and body shape the agent-side
//! loggers have always used. A client-supplied `timestamp` in that body is
//! accepted and ignored — the server clock is authoritative.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::Connection;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::OpsdeckConfig;
use crate::db;
use crate::live::{self, ChangeHub, Collection};
use crate::store;
use crate::store::types::{
    ActivityEvent, ActivityStats, Document, MemoryDoc, NewActivity, ScheduledTask,
    SearchResponse, UpsertTask,
};

const DEFAULT_FEED_LIMIT: usize = 50;
const DEFAULT_STATS_WINDOW_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// State and error handling
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub hub: ChangeHub,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            hub: ChangeHub::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(e) => {
                tracing::error!("internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

fn bad_request(msg: impl Into<String>) -> ApiError {
    ApiError::BadRequest(msg.into())
}

/// Run a store operation on the blocking pool against the shared connection.
async fn with_db<T, F>(db: &Arc<Mutex<Connection>>, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || {
        let conn = db
            .lock()
            .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
        op(&conn)
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("db task failed: {e}")))?
    .map_err(ApiError::Internal)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Construct the full router. All routes are nested under `/api`.
///
/// CORS is restrictive by default (localhost only). Set `OPSDECK_CORS_ORIGINS`
/// to a comma-separated list of allowed origins to override, or `*` to allow
/// all (not recommended for production).
pub fn router(state: AppState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .route("/api/logActivity", post(log_activity_handler))
        .route("/api/tasks", post(upsert_task_handler).get(tasks_handler))
        .route("/api/memories", post(index_memory_handler))
        .route("/api/documents", post(index_document_handler))
        .route("/api/feed", get(feed_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/search", get(search_handler))
        .route("/api/health", get(health_handler))
        .route("/api/subscribe/feed", get(subscribe_feed_handler))
        .route("/api/subscribe/tasks", get(subscribe_tasks_handler))
        .route("/api/subscribe/stats", get(subscribe_stats_handler))
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024)) // briefs can be large
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{HeaderName, Method};

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([HeaderName::from_static("content-type")])
        .max_age(std::time::Duration::from_secs(3600));

    match std::env::var("OPSDECK_CORS_ORIGINS") {
        Ok(val) if val == "*" => base.allow_origin(AllowOrigin::any()),
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            base.allow_origin(origins)
        }
        Err(_) => {
            // Default: localhost only
            let origins: Vec<_> = [
                "http://localhost:3000",
                "http://127.0.0.1:3000",
            ]
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
            base.allow_origin(origins)
        }
    }
}

// ---------------------------------------------------------------------------
// Write handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LogActivityBody {
    /// Accepted for wire compatibility with loggers that still send their own
    /// clock; the stored timestamp always comes from the server.
    #[serde(default)]
    #[allow(dead_code)]
    timestamp: Option<i64>,
    #[serde(flatten)]
    entry: NewActivity,
}

/// POST /api/logActivity -- append one event to the activity log.
async fn log_activity_handler(
    State(state): State<AppState>,
    Json(body): Json<LogActivityBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_entry(&body.entry)?;

    let entry = body.entry;
    let event = with_db(&state.db, move |conn| {
        store::activity::log_activity(conn, &entry)
    })
    .await?;

    tracing::debug!(id = event.id, action = %event.action, "activity logged");
    state.hub.notify(Collection::Activity);

    Ok(Json(serde_json::json!({"status": "ok"})))
}

fn validate_entry(entry: &NewActivity) -> Result<(), ApiError> {
    if entry.action.trim().is_empty() {
        return Err(bad_request("action must not be empty"));
    }
    if entry.description.trim().is_empty() {
        return Err(bad_request("description must not be empty"));
    }
    if entry.duration_ms < 0 {
        return Err(bad_request("duration_ms must be non-negative"));
    }
    if entry.tokens_used.is_some_and(|t| t < 0) {
        return Err(bad_request("tokens_used must be non-negative"));
    }
    if entry.cost.is_some_and(|c| c < 0.0) {
        return Err(bad_request("cost must be non-negative"));
    }
    Ok(())
}

/// POST /api/tasks -- create or refresh a scheduled task by `task_id`.
async fn upsert_task_handler(
    State(state): State<AppState>,
    Json(task): Json<UpsertTask>,
) -> Result<Json<ScheduledTask>, ApiError> {
    if task.task_id.trim().is_empty() {
        return Err(bad_request("task_id must not be empty"));
    }
    if task.name.trim().is_empty() {
        return Err(bad_request("name must not be empty"));
    }

    let stored = with_db(&state.db, move |conn| {
        store::tasks::upsert_scheduled_task(conn, &task)
    })
    .await?;

    state.hub.notify(Collection::Tasks);
    Ok(Json(stored))
}

#[derive(Debug, Deserialize)]
struct IndexMemoryBody {
    file_path: String,
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// POST /api/memories -- index (or re-index) a memory file.
async fn index_memory_handler(
    State(state): State<AppState>,
    Json(body): Json<IndexMemoryBody>,
) -> Result<Json<MemoryDoc>, ApiError> {
    if body.file_path.trim().is_empty() {
        return Err(bad_request("file_path must not be empty"));
    }

    let stored = with_db(&state.db, move |conn| {
        store::index::index_memory(conn, &body.file_path, &body.content, &body.tags)
    })
    .await?;

    state.hub.notify(Collection::Memories);
    Ok(Json(stored))
}

#[derive(Debug, Deserialize)]
struct IndexDocumentBody {
    file_path: String,
    content: String,
    doc_type: String,
}

/// POST /api/documents -- index (or re-index) a project document.
async fn index_document_handler(
    State(state): State<AppState>,
    Json(body): Json<IndexDocumentBody>,
) -> Result<Json<Document>, ApiError> {
    if body.file_path.trim().is_empty() {
        return Err(bad_request("file_path must not be empty"));
    }
    if body.doc_type.trim().is_empty() {
        return Err(bad_request("doc_type must not be empty"));
    }

    let stored = with_db(&state.db, move |conn| {
        store::index::index_document(conn, &body.file_path, &body.content, &body.doc_type)
    })
    .await?;

    state.hub.notify(Collection::Documents);
    Ok(Json(stored))
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FeedParams {
    limit: Option<usize>,
}

/// GET /api/feed?limit= -- the most recent events, newest first.
async fn feed_handler(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<ActivityEvent>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_FEED_LIMIT);
    let feed = with_db(&state.db, move |conn| {
        store::activity::get_activity_feed(conn, limit)
    })
    .await?;
    Ok(Json(feed))
}

/// GET /api/tasks -- all tasks ascending by next_run.
async fn tasks_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduledTask>>, ApiError> {
    let tasks = with_db(&state.db, store::tasks::get_scheduled_tasks).await?;
    Ok(Json(tasks))
}

#[derive(Debug, Deserialize)]
struct StatsParams {
    last_hours: Option<i64>,
}

/// GET /api/stats?last_hours= -- aggregates over a trailing window.
async fn stats_handler(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<ActivityStats>, ApiError> {
    let last_hours = params.last_hours.unwrap_or(DEFAULT_STATS_WINDOW_HOURS);
    if last_hours <= 0 {
        return Err(bad_request("last_hours must be positive"));
    }
    let stats = with_db(&state.db, move |conn| {
        store::activity::get_activity_stats(conn, last_hours)
    })
    .await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
}

/// GET /api/search?q= -- substring search across both document collections.
async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = with_db(&state.db, move |conn| {
        store::search::global_search(conn, &params.q)
    })
    .await?;
    Ok(Json(results))
}

/// GET /api/health
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// ---------------------------------------------------------------------------
// SSE subscriptions
// ---------------------------------------------------------------------------

type EventStream = Sse<KeepAliveStream<ReceiverStream<Result<Event, Infallible>>>>;

/// Stream a query's result set: one snapshot immediately, then a fresh one
/// after every change notice for `collection`. The stream ends when the
/// client disconnects or the hub shuts down.
fn live_stream<T, F>(state: AppState, collection: Collection, query: F) -> EventStream
where
    T: Serialize + Send + 'static,
    F: Fn(&Connection) -> Result<T> + Send + Sync + 'static,
{
    let (tx, rx_out) = mpsc::channel::<Result<Event, Infallible>>(8);
    let query = Arc::new(query);
    let mut changes = state.hub.subscribe();

    tokio::spawn(async move {
        loop {
            let db = Arc::clone(&state.db);
            let q = Arc::clone(&query);
            let snapshot = tokio::task::spawn_blocking(move || {
                let conn = db
                    .lock()
                    .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
                q(&conn)
            })
            .await;

            let event = match snapshot {
                Ok(Ok(value)) => match Event::default().json_data(&value) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!("subscription serialization failed: {e}");
                        break;
                    }
                },
                Ok(Err(e)) => {
                    tracing::warn!("subscription query failed: {e:#}");
                    break;
                }
                Err(e) => {
                    tracing::warn!("subscription db task failed: {e}");
                    break;
                }
            };

            if tx.send(Ok(event)).await.is_err() {
                break; // client went away
            }
            if !live::wait_for(&mut changes, collection).await {
                break;
            }
        }
    });

    Sse::new(ReceiverStream::new(rx_out)).keep_alive(KeepAlive::default())
}

/// GET /api/subscribe/feed?limit= -- live activity feed.
async fn subscribe_feed_handler(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> EventStream {
    let limit = params.limit.unwrap_or(DEFAULT_FEED_LIMIT);
    live_stream(state, Collection::Activity, move |conn| {
        store::activity::get_activity_feed(conn, limit)
    })
}

/// GET /api/subscribe/tasks -- live task list.
async fn subscribe_tasks_handler(State(state): State<AppState>) -> EventStream {
    live_stream(state, Collection::Tasks, store::tasks::get_scheduled_tasks)
}

/// GET /api/subscribe/stats?last_hours= -- live windowed stats.
async fn subscribe_stats_handler(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> EventStream {
    let last_hours = params.last_hours.unwrap_or(DEFAULT_STATS_WINDOW_HOURS).max(1);
    live_stream(state, Collection::Activity, move |conn| {
        store::activity::get_activity_stats(conn, last_hours)
    })
}

// ---------------------------------------------------------------------------
// Serve loop
// ---------------------------------------------------------------------------

/// Open the database and run the hub until ctrl-c.
pub async fn serve(config: OpsdeckConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;

    if let Some(authority) = db::migrations::get_timestamp_authority(&conn)? {
        tracing::info!(%authority, "activity timestamp authority");
    }

    let state = AppState::new(conn);
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "opsdeck hub listening at http://{bind_addr}/api");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
