//! Fire-and-forget delivery contract for the agent-side loggers, exercised
//! against a real hub on an ephemeral port.

use opsdeck::client::logger::{FileOp, SearchKind};
use opsdeck::client::ActivityLogger;
use opsdeck::db;
use opsdeck::server::{router, AppState};
use opsdeck::store::activity::get_activity_feed;
use opsdeck::store::types::{ActivityStatus, NewActivity};

async fn spawn_hub() -> (String, AppState) {
    let state = AppState::new(db::open_memory_database().unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn entry() -> NewActivity {
    NewActivity {
        action: "api_call".into(),
        description: "Brave → /search".into(),
        duration_ms: 2150,
        tokens_used: Some(1240),
        cost: Some(0.0186),
        status: ActivityStatus::Completed,
        metadata: None,
    }
}

#[tokio::test]
async fn posted_events_land_in_the_hub() {
    let (base_url, state) = spawn_hub().await;
    let logger = ActivityLogger::new(base_url);

    logger.log(&entry()).await;

    let conn = state.db.lock().unwrap();
    let feed = get_activity_feed(&conn, 10).unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].action, "api_call");
    assert_eq!(feed[0].tokens_used, Some(1240));
}

#[tokio::test]
async fn convenience_wrappers_shape_the_payload() {
    let (base_url, state) = spawn_hub().await;
    let logger = ActivityLogger::new(base_url);

    logger
        .log_search("golf influencers", 8, 1500, Some(980), Some(0.0147), SearchKind::Web)
        .await;
    logger
        .log_file_operation(
            FileOp::Read,
            "MEMORY.md",
            120,
            None,
            None,
            ActivityStatus::Completed,
        )
        .await;

    let conn = state.db.lock().unwrap();
    let feed = get_activity_feed(&conn, 10).unwrap();
    assert_eq!(feed.len(), 2);

    let search = feed.iter().find(|e| e.action == "search").unwrap();
    assert!(search.description.contains("golf influencers"));
    assert_eq!(search.metadata.as_ref().unwrap()["search_type"], "web");

    let file_op = feed.iter().find(|e| e.action == "file_read").unwrap();
    assert_eq!(file_op.description, "Read MEMORY.md");
    assert_eq!(file_op.metadata.as_ref().unwrap()["file_path"], "MEMORY.md");
}

#[tokio::test]
async fn unreachable_hub_degrades_to_silent_loss() {
    // Nothing listens here; the call must warn and return, not error or hang.
    let logger = ActivityLogger::new("http://127.0.0.1:9");
    logger.log(&entry()).await;
}

#[tokio::test]
async fn rejected_payloads_are_not_retried() {
    let (base_url, state) = spawn_hub().await;
    let logger = ActivityLogger::new(base_url);

    let mut bad = entry();
    bad.duration_ms = -1; // hub rejects with 400; logger swallows it
    logger.log(&bad).await;

    let conn = state.db.lock().unwrap();
    assert!(get_activity_feed(&conn, 10).unwrap().is_empty());
}
