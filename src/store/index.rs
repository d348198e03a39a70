//! Document indexing — upsert by `file_path` for both collections.

use anyhow::Result;
use rusqlite::{params, Connection, Row};

use crate::store::now_ms;
use crate::store::types::{Document, MemoryDoc};

/// Index (or re-index) a memory file. Conflict on `file_path` patches
/// `content`, `tags`, and `indexed_at`.
pub fn index_memory(
    conn: &Connection,
    file_path: &str,
    content: &str,
    tags: &[String],
) -> Result<MemoryDoc> {
    let now = now_ms();
    let tags_json = serde_json::to_string(tags)?;

    conn.execute(
        "INSERT INTO memories (file_path, content, tags, indexed_at) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(file_path) DO UPDATE SET \
             content = excluded.content, \
             tags = excluded.tags, \
             indexed_at = excluded.indexed_at",
        params![file_path, content, tags_json, now],
    )?;

    Ok(MemoryDoc {
        file_path: file_path.to_string(),
        content: content.to_string(),
        tags: tags.to_vec(),
        indexed_at: now,
    })
}

/// Index (or re-index) a project document. Conflict on `file_path` patches
/// `content`, `doc_type`, and `indexed_at`.
pub fn index_document(
    conn: &Connection,
    file_path: &str,
    content: &str,
    doc_type: &str,
) -> Result<Document> {
    let now = now_ms();

    conn.execute(
        "INSERT INTO documents (file_path, content, doc_type, indexed_at) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(file_path) DO UPDATE SET \
             content = excluded.content, \
             doc_type = excluded.doc_type, \
             indexed_at = excluded.indexed_at",
        params![file_path, content, doc_type, now],
    )?;

    Ok(Document {
        file_path: file_path.to_string(),
        content: content.to_string(),
        doc_type: doc_type.to_string(),
        indexed_at: now,
    })
}

/// Map one `memories` row to a [`MemoryDoc`].
pub(crate) fn memory_from_row(row: &Row<'_>) -> rusqlite::Result<MemoryDoc> {
    let tags_json: String = row.get(2)?;
    let tags = serde_json::from_str(&tags_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(MemoryDoc {
        file_path: row.get(0)?,
        content: row.get(1)?,
        tags,
        indexed_at: row.get(3)?,
    })
}

/// Map one `documents` row to a [`Document`].
pub(crate) fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        file_path: row.get(0)?,
        content: row.get(1)?,
        doc_type: row.get(2)?,
        indexed_at: row.get(3)?,
    })
}
