//! k-NN candidate fetch from the vector store.

use corpusq_config::PipelineConfig;
use corpusq_types::{PipelineError, ScoredDocument, VectorStore};

/// Fetches up to `config.effective_fetch_k()` candidates for `input`,
/// sorted ascending by L2 distance.
///
/// The store owns embedding of the query text itself; this stage never
/// computes an embedding. A backend error is wrapped as
/// [`PipelineError::BackendFailure`].
pub fn retrieve(
    input: &str,
    store: &dyn VectorStore,
    config: &PipelineConfig,
) -> Result<Vec<ScoredDocument>, PipelineError> {
    let k = config.effective_fetch_k();
    let candidates = store
        .similarity_search_with_score(input, k)
        .map_err(|err| PipelineError::BackendFailure {
            message: err.to_string(),
        })?;
    tracing::debug!(
        target: "corpusq_pipeline::retriever",
        fetched = candidates.len(),
        k,
        "retrieved candidates"
    );
    Ok(candidates)
}
