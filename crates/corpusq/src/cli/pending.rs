//! Persists the options from an `ambiguous` outcome across CLI invocations.
//!
//! Each `corpusq` invocation is a fresh process; `corpusq-pipeline`'s second
//! `Invoke` call needs the `RetrievalOption`s the first call produced, so
//! `ask` writes them to a small JSON sidecar file and `select` reads it back.
//! This is purely a CLI-layer convenience — `corpusq-types::RetrievalOption`
//! itself carries no (de)serialization contract beyond display.

use std::path::{Path, PathBuf};

use corpusq_types::{Document, DocumentMetadata, RetrievalOption};
use serde::{Deserialize, Serialize};

const PENDING_FILE: &str = ".corpusq_pending.json";

#[derive(Serialize, Deserialize)]
struct PendingDoc {
    content: String,
    source: Option<String>,
    page: Option<i64>,
    doc_type: Option<String>,
    domain: Option<String>,
    vendor: Option<String>,
    product: Option<String>,
    version: Option<String>,
    entities: Vec<String>,
}

impl From<&Document> for PendingDoc {
    fn from(doc: &Document) -> Self {
        Self {
            content: doc.content.clone(),
            source: doc.metadata.source.clone(),
            page: doc.metadata.page,
            doc_type: doc.metadata.doc_type.clone(),
            domain: doc.metadata.domain.clone(),
            vendor: doc.metadata.vendor.clone(),
            product: doc.metadata.product.clone(),
            version: doc.metadata.version.clone(),
            entities: doc.metadata.entities.iter().cloned().collect(),
        }
    }
}

impl From<PendingDoc> for Document {
    fn from(pending: PendingDoc) -> Self {
        Document::new(
            pending.content,
            DocumentMetadata {
                source: pending.source,
                page: pending.page,
                doc_type: pending.doc_type,
                domain: pending.domain,
                vendor: pending.vendor,
                product: pending.product,
                version: pending.version,
                entities: pending.entities.into_iter().collect(),
                ..Default::default()
            },
        )
    }
}

#[derive(Serialize, Deserialize)]
struct PendingOption {
    option_id: u32,
    docs: Vec<PendingDoc>,
    best_distance: f64,
}

#[derive(Serialize, Deserialize)]
struct PendingOptions {
    query: String,
    options: Vec<PendingOption>,
}

fn pending_path(cwd: &Path) -> PathBuf {
    cwd.join(PENDING_FILE)
}

/// Writes `options` for `query` to the pending-options sidecar file.
pub fn save(cwd: &Path, query: &str, options: &[RetrievalOption]) -> std::io::Result<()> {
    let pending = PendingOptions {
        query: query.to_string(),
        options: options
            .iter()
            .map(|o| PendingOption {
                option_id: o.option_id,
                docs: o.docs.iter().map(PendingDoc::from).collect(),
                best_distance: o.best_distance,
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&pending).expect("pending options always serialize");
    std::fs::write(pending_path(cwd), json)
}

/// Loads previously saved options for `query`, if the sidecar file exists
/// and names the same query. Returns `None` on a mismatch so the caller can
/// report a clear "nothing pending" error rather than silently resolving
/// against a stale query.
pub fn load(cwd: &Path, query: &str) -> Option<Vec<RetrievalOption>> {
    let raw = std::fs::read_to_string(pending_path(cwd)).ok()?;
    let pending: PendingOptions = serde_json::from_str(&raw).ok()?;
    if pending.query != query {
        return None;
    }
    Some(
        pending
            .options
            .into_iter()
            .map(|o| {
                let docs: Vec<Document> = o.docs.into_iter().map(Document::from).collect();
                let sources = corpusq_types::collect_sources(&docs);
                RetrievalOption {
                    option_id: o.option_id,
                    docs,
                    sources,
                    best_distance: o.best_distance,
                }
            })
            .collect(),
    )
}

/// Removes the pending-options sidecar file, if any.
pub fn clear(cwd: &Path) {
    let _ = std::fs::remove_file(pending_path(cwd));
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpusq_types::DocumentMetadata as Meta;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![Document::new(
            "body",
            Meta {
                source: Some("a.pdf".to_string()),
                page: Some(1),
                ..Default::default()
            },
        )];
        let sources = corpusq_types::collect_sources(&docs);
        let options = vec![RetrievalOption {
            option_id: 1,
            docs,
            sources,
            best_distance: 0.1,
        }];

        save(dir.path(), "what is mqtt", &options).unwrap();
        let loaded = load(dir.path(), "what is mqtt").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].docs[0].metadata.source.as_deref(), Some("a.pdf"));
    }

    #[test]
    fn mismatched_query_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), "original query", &[]).unwrap();
        assert!(load(dir.path(), "a different query").is_none());
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), "q", &[]).unwrap();
        clear(dir.path());
        assert!(load(dir.path(), "q").is_none());
    }
}
