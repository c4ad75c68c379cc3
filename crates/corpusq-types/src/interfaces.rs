//! External trait boundaries the pipeline is built against.
//!
//! The pipeline never depends on a concrete vector store or embedding
//! provider; callers supply implementations of these traits. Keeping them
//! here (rather than in `corpusq-pipeline`) lets `corpusq-context` reason
//! about embedder identity without depending on the pipeline crate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::document::ScoredDocument;
use crate::error::PipelineError;

/// Opaque identifier for an embedding model/provider pairing.
///
/// Used as half of the embedding cache key: two embedders with
/// different identities never share cached vectors, even if they happen to
/// embed the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmbedderId(pub String);

impl std::fmt::Display for EmbedderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A k-nearest-neighbor vector store.
///
/// The store owns embedding of the query internally; the pipeline never
/// embeds a query for search, only for the signature and anchor-content
/// tie-breakers.
pub trait VectorStore: Send + Sync {
    /// Returns up to `k` candidates nearest `query_text`, sorted ascending
    /// by L2 distance, breaking ties by the store's own insertion order.
    fn similarity_search_with_score(
        &self,
        query_text: &str,
        k: usize,
    ) -> Result<Vec<ScoredDocument>, PipelineError>;
}

/// An embedding provider.
pub trait Embedder: Send + Sync {
    /// Embeds a single query string.
    fn embed_query(&self, text: &str) -> Result<Vec<f32>, PipelineError>;

    /// Embeds a batch of strings in one call. Implementations that have no
    /// genuine batching benefit may embed sequentially; callers rely only on
    /// the per-input ordering being preserved.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        texts.iter().map(|t| self.embed_query(t)).collect()
    }

    /// This embedder's identity, used as the cache-partitioning key.
    fn identity(&self) -> EmbedderId;
}

/// A cooperative cancellation flag shared between a caller and an
/// in-flight `Orchestrator::invoke` call.
///
/// Pipeline stages check this between expensive steps (embedding calls,
/// vector-store round trips) and return [`PipelineError::Cancelled`] once
/// it is set; cancellation is advisory and never interrupts a stage
/// mid-computation.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a fresh, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks this token (and every clone of it) as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once [`CancellationToken::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns `Err(PipelineError::Cancelled)` if this token has been
    /// cancelled, otherwise `Ok(())`. Intended for `?`-style checkpoints
    /// between pipeline stages.
    pub fn check(&self) -> Result<(), PipelineError> {
        if self.is_cancelled() {
            Err(PipelineError::Cancelled)
        } else {
            Ok(())
        }
    }
}
