use anyhow::Result;

use opsdeck::config::OpsdeckConfig;
use opsdeck::db;
use opsdeck::store;

/// Display activity statistics in the terminal.
pub fn run(config: &OpsdeckConfig, last_hours: i64) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let stats = store::activity::get_activity_stats(&conn, last_hours)?;

    println!("Activity Statistics (last {last_hours}h)");
    println!("{}", "=".repeat(40));
    println!("  Total actions:       {}", stats.total_actions);
    println!("  Total tokens:        {}", stats.total_tokens);
    println!("  Total cost:          ${:.4}", stats.total_cost);
    println!();

    if stats.actions_by_type.is_empty() {
        println!("No activity in this window.");
        return Ok(());
    }

    println!("By Action:");
    let mut actions: Vec<_> = stats.actions_by_type.iter().collect();
    actions.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (action, count) in actions {
        println!("  {:<20} {}", action, count);
    }

    Ok(())
}
