use anyhow::{Context, Result};
use std::path::Path;

use opsdeck::config::OpsdeckConfig;
use opsdeck::db;
use opsdeck::store;

/// Index a memory file straight into the store.
pub fn memory(config: &OpsdeckConfig, file: &Path, tags: &[String]) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let conn = db::open_database(config.resolved_db_path())?;
    let doc = store::index::index_memory(&conn, &file.to_string_lossy(), &content, tags)?;

    println!(
        "Indexed memory {} ({} bytes, {} tags)",
        doc.file_path,
        doc.content.len(),
        doc.tags.len()
    );
    Ok(())
}

/// Index a project document straight into the store.
pub fn document(config: &OpsdeckConfig, file: &Path, doc_type: &str) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let conn = db::open_database(config.resolved_db_path())?;
    let doc = store::index::index_document(&conn, &file.to_string_lossy(), &content, doc_type)?;

    println!(
        "Indexed document {} ({} bytes, type {})",
        doc.file_path,
        doc.content.len(),
        doc.doc_type
    );
    Ok(())
}
