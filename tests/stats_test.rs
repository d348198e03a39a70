mod helpers;

use helpers::{entry, insert_event_at, test_db};
use opsdeck::store::activity::{get_activity_stats, log_activity};
use opsdeck::store::now_ms;

#[test]
fn stats_sum_tokens_and_cost_across_the_window() {
    let conn = test_db();
    log_activity(&conn, &entry("search", Some(100), Some(1.0))).unwrap();
    log_activity(&conn, &entry("search", Some(50), Some(0.5))).unwrap();

    let stats = get_activity_stats(&conn, 24).unwrap();
    assert_eq!(stats.total_actions, 2);
    assert_eq!(stats.total_tokens, 150);
    assert!((stats.total_cost - 1.5).abs() < 1e-9);
}

#[test]
fn events_older_than_the_cutoff_are_excluded() {
    let conn = test_db();
    let two_hours_ago = now_ms() - 2 * 3_600_000;
    insert_event_at(&conn, two_hours_ago, "stale_action");
    log_activity(&conn, &entry("fresh_action", Some(10), None)).unwrap();

    let narrow = get_activity_stats(&conn, 1).unwrap();
    assert_eq!(narrow.total_actions, 1);
    assert!(!narrow.actions_by_type.contains_key("stale_action"));
    assert_eq!(narrow.actions_by_type["fresh_action"], 1);

    let wide = get_activity_stats(&conn, 3).unwrap();
    assert_eq!(wide.total_actions, 2);
    assert_eq!(wide.actions_by_type["stale_action"], 1);
}

#[test]
fn missing_tokens_and_cost_count_as_zero() {
    let conn = test_db();
    log_activity(&conn, &entry("search", None, None)).unwrap();
    log_activity(&conn, &entry("search", Some(40), Some(0.2))).unwrap();

    let stats = get_activity_stats(&conn, 24).unwrap();
    assert_eq!(stats.total_actions, 2);
    assert_eq!(stats.total_tokens, 40);
    assert!((stats.total_cost - 0.2).abs() < 1e-9);
}

#[test]
fn histogram_counts_per_action_tag() {
    let conn = test_db();
    for action in ["search", "search", "api_call", "file_created"] {
        log_activity(&conn, &entry(action, None, None)).unwrap();
    }

    let stats = get_activity_stats(&conn, 24).unwrap();
    assert_eq!(stats.actions_by_type.len(), 3);
    assert_eq!(stats.actions_by_type["search"], 2);
    assert_eq!(stats.actions_by_type["api_call"], 1);
    assert_eq!(stats.actions_by_type["file_created"], 1);
}
