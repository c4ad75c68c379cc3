//! An in-memory, bag-of-words vector store for the CLI demo.
//!
//! The real vector store and embedding model are out of this crate's hands
//! entirely: callers supply their own [`corpusq_types::VectorStore`]. This
//! module exists only so `corpusq ask` has something to run against without
//! a network dependency. It is not meant to produce relevance-quality
//! results, only to exercise the pipeline end to end over a small, curated
//! JSON corpus fixture.

use std::collections::BTreeMap;

use corpusq_types::{
    Document, DocumentMetadata, EmbedderId, Embedder, PipelineError, ScoredDocument, VectorStore,
};
use serde::Deserialize;

/// One entry in a demo corpus JSON file.
#[derive(Debug, Deserialize)]
pub struct CorpusEntry {
    /// Chunk text.
    pub content: String,
    /// Source filename.
    pub source: Option<String>,
    /// Page number within the source.
    pub page: Option<i64>,
    /// Curator-assigned domain.
    pub domain: Option<String>,
    /// Curator-assigned document type.
    pub doc_type: Option<String>,
    /// Curator-assigned product.
    pub product: Option<String>,
    /// Curator-assigned vendor.
    pub vendor: Option<String>,
    /// Curator-assigned version.
    pub version: Option<String>,
    /// Canonical entity keys this chunk is tagged with.
    #[serde(default)]
    pub entities: Vec<String>,
}

impl From<CorpusEntry> for Document {
    fn from(entry: CorpusEntry) -> Self {
        Document::new(
            entry.content,
            DocumentMetadata {
                source: entry.source,
                page: entry.page,
                domain: entry.domain,
                doc_type: entry.doc_type,
                vendor: entry.vendor,
                product: entry.product,
                version: entry.version,
                entities: entry.entities.into_iter().collect(),
                ..Default::default()
            },
        )
    }
}

/// A whitespace bag-of-words embedding: a sparse term-count map, compared by
/// cosine distance. Deterministic and dependency-free, which is all the demo
/// needs — `corpusq-pipeline` never inspects embedding values itself, only
/// the distances and cosine similarities this produces.
fn bag_of_words(text: &str) -> BTreeMap<String, f32> {
    let mut counts = BTreeMap::new();
    for word in text.to_lowercase().split_whitespace() {
        let word: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
        if !word.is_empty() {
            *counts.entry(word).or_insert(0.0) += 1.0;
        }
    }
    counts
}

fn cosine_distance(a: &BTreeMap<String, f32>, b: &BTreeMap<String, f32>) -> f64 {
    let dot: f32 = a.iter().map(|(k, v)| v * b.get(k).copied().unwrap_or(0.0)).sum();
    let norm_a = a.values().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    let cosine = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    (1.0 - f64::from(cosine)).max(0.0)
}

/// A fixed, in-memory corpus scored by bag-of-words cosine distance.
pub struct DemoStore {
    documents: Vec<(Document, BTreeMap<String, f32>)>,
}

impl DemoStore {
    /// Builds a store from already-loaded corpus entries.
    pub fn from_entries(entries: Vec<CorpusEntry>) -> Self {
        let documents = entries
            .into_iter()
            .map(|entry| {
                let doc: Document = entry.into();
                let bow = bag_of_words(&doc.content);
                (doc, bow)
            })
            .collect();
        Self { documents }
    }

    /// Loads a corpus from a JSON file containing an array of [`CorpusEntry`].
    pub fn load(path: &std::path::Path) -> Result<Self, PipelineError> {
        let raw = std::fs::read_to_string(path).map_err(|err| PipelineError::BackendFailure {
            message: format!("reading corpus file {}: {err}", path.display()),
        })?;
        let entries: Vec<CorpusEntry> =
            serde_json::from_str(&raw).map_err(|err| PipelineError::BackendFailure {
                message: format!("parsing corpus file {}: {err}", path.display()),
            })?;
        Ok(Self::from_entries(entries))
    }
}

impl VectorStore for DemoStore {
    fn similarity_search_with_score(
        &self,
        query_text: &str,
        k: usize,
    ) -> Result<Vec<ScoredDocument>, PipelineError> {
        let query_bow = bag_of_words(query_text);
        let mut scored: Vec<ScoredDocument> = self
            .documents
            .iter()
            .map(|(doc, bow)| ScoredDocument::new(doc.clone(), cosine_distance(&query_bow, bow)))
            .collect();
        scored.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// An [`Embedder`] over the same bag-of-words space as [`DemoStore`], used
/// for the signature and anchor-content tie-breakers.
pub struct DemoEmbedder;

impl Embedder for DemoEmbedder {
    fn embed_query(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        let bow = bag_of_words(text);
        Ok(bow.into_values().collect())
    }

    fn identity(&self) -> EmbedderId {
        EmbedderId("demo-bag-of-words".to_string())
    }
}
