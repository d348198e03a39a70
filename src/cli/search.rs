use anyhow::Result;

use opsdeck::config::OpsdeckConfig;
use opsdeck::db;
use opsdeck::store;
use opsdeck::store::types::SearchHit;

/// Run a global search and print the hits.
pub fn run(config: &OpsdeckConfig, query: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let results = store::search::global_search(&conn, query)?;

    if results.is_empty() {
        println!("No results for \"{query}\".");
        return Ok(());
    }

    if !results.memories.is_empty() {
        println!("Memories ({}):", results.memories.len());
        for hit in &results.memories {
            print_hit(hit);
        }
    }
    if !results.documents.is_empty() {
        println!("Documents ({}):", results.documents.len());
        for hit in &results.documents {
            print_hit(hit);
        }
    }

    Ok(())
}

fn print_hit(hit: &SearchHit) {
    let preview: String = hit.content.chars().take(80).collect();
    println!("  {}", hit.file_path);
    if let Some(doc_type) = &hit.doc_type {
        println!("      type: {doc_type}");
    }
    if !hit.tags.is_empty() {
        println!("      tags: {}", hit.tags.join(", "));
    }
    println!("      {preview}");
}
