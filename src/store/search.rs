//! Global search — case-insensitive substring match across both document
//! collections.
//!
//! A match is binary: the folded query occurs literally in the content, the
//! path, or (for memories) a tag. No ranking, no tokenization; results come
//! back in collection-scan order, each hit tagged with its source. The scan
//! is linear in collection size, which is exactly right for the handful of
//! indexed files this system holds.

use anyhow::Result;
use rusqlite::Connection;

use crate::store::index::{document_from_row, memory_from_row};
use crate::store::types::{SearchHit, SearchResponse, SearchSource};

/// Search memories (content, path, tags) and documents (content, path).
///
/// The empty query matches every row — literal substring semantics.
pub fn global_search(conn: &Connection, query: &str) -> Result<SearchResponse> {
    let needle = query.to_lowercase();

    let mut stmt = conn.prepare(
        "SELECT file_path, content, tags, indexed_at FROM memories ORDER BY rowid",
    )?;
    let memories = stmt
        .query_map([], memory_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT file_path, content, doc_type, indexed_at FROM documents ORDER BY rowid",
    )?;
    let documents = stmt
        .query_map([], document_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let memory_hits = memories
        .into_iter()
        .filter(|m| {
            m.content.to_lowercase().contains(&needle)
                || m.file_path.to_lowercase().contains(&needle)
                || m.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .map(|m| SearchHit {
            source: SearchSource::Memory,
            file_path: m.file_path,
            content: m.content,
            tags: m.tags,
            doc_type: None,
            indexed_at: m.indexed_at,
        })
        .collect();

    let document_hits = documents
        .into_iter()
        .filter(|d| {
            d.content.to_lowercase().contains(&needle)
                || d.file_path.to_lowercase().contains(&needle)
        })
        .map(|d| SearchHit {
            source: SearchSource::Document,
            file_path: d.file_path,
            content: d.content,
            tags: Vec::new(),
            doc_type: Some(d.doc_type),
            indexed_at: d.indexed_at,
        })
        .collect();

    Ok(SearchResponse {
        memories: memory_hits,
        documents: document_hits,
    })
}
