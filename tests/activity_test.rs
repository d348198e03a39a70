mod helpers;

use helpers::{entry, insert_event_at, test_db};
use opsdeck::store::activity::{get_activity_feed, log_activity};

#[test]
fn collection_size_equals_number_of_appends() {
    let conn = test_db();
    for i in 0..5 {
        log_activity(&conn, &entry(&format!("action_{i}"), None, None)).unwrap();
    }

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM activity_feed", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 5);
}

#[test]
fn appends_never_alter_prior_events() {
    let conn = test_db();
    let first = log_activity(&conn, &entry("search", Some(100), Some(0.01))).unwrap();
    let before = serde_json::to_value(&first).unwrap();

    for _ in 0..10 {
        log_activity(&conn, &entry("api_call", Some(5), None)).unwrap();
    }

    let after = get_activity_feed(&conn, 100)
        .unwrap()
        .into_iter()
        .find(|e| e.id == first.id)
        .expect("first event still present");
    assert_eq!(serde_json::to_value(&after).unwrap(), before);
}

#[test]
fn feed_is_strictly_descending_by_timestamp() {
    let conn = test_db();
    // Distinct timestamps, inserted out of order
    for ts in [500, 100, 900, 300, 700] {
        insert_event_at(&conn, ts, "search");
    }

    let feed = get_activity_feed(&conn, 10).unwrap();
    let timestamps: Vec<i64> = feed.iter().map(|e| e.timestamp).collect();
    assert_eq!(timestamps, vec![900, 700, 500, 300, 100]);
    assert!(timestamps.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn feed_returns_min_of_limit_and_total() {
    let conn = test_db();
    for ts in [100, 200, 300] {
        insert_event_at(&conn, ts, "search");
    }

    assert_eq!(get_activity_feed(&conn, 2).unwrap().len(), 2);
    assert_eq!(get_activity_feed(&conn, 3).unwrap().len(), 3);
    assert_eq!(get_activity_feed(&conn, 50).unwrap().len(), 3);
    assert_eq!(get_activity_feed(&conn, 0).unwrap().len(), 0);
}

#[test]
fn callers_cannot_backdate_appends() {
    let conn = test_db();
    let before = opsdeck::store::now_ms();
    let event = log_activity(&conn, &entry("search", None, None)).unwrap();
    assert!(event.timestamp >= before);
}
