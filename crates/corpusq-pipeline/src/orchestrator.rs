//! Composing the stages and handling the two `Invoke` entry patterns.

use corpusq_config::PipelineConfig;
use corpusq_context::extract_query_entities;
use corpusq_types::{
    CancellationToken, EmbeddingCache, Embedder, Outcome, PipelineError, RetrievalOption,
    ScoredDocument, State, Status, VectorStore,
};

use crate::ambiguity::Resolution;
use crate::gate::GateOutcome;
use crate::{ambiguity, augment, cluster, coverage, gate, ood, present, retriever};

/// Runs the full pipeline against a single, freshly constructed `State`.
///
/// Holds references to the caller-supplied vector store, embedder, and
/// shared embedding cache plus the immutable config; none of these are
/// owned, so a caller typically builds one `Orchestrator` per query behind
/// shared `Arc`s.
pub struct Orchestrator<'a> {
    store: &'a dyn VectorStore,
    embedder: &'a dyn Embedder,
    cache: &'a EmbeddingCache,
    config: &'a PipelineConfig,
}

impl<'a> Orchestrator<'a> {
    /// Builds an orchestrator over the given backends and configuration.
    pub fn new(
        store: &'a dyn VectorStore,
        embedder: &'a dyn Embedder,
        cache: &'a EmbeddingCache,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            cache,
            config,
        }
    }

    /// First `Invoke` call: runs OODGate → Retriever → GateEngine →
    /// (TagClusterer → AmbiguityResolver, if ambiguous) → CoverageGate →
    /// EntityAugmenter.
    pub fn invoke(&self, input: &str, cancel: &CancellationToken) -> Outcome {
        let state = State::new(input.trim());
        Self::finalize(self.run(state, cancel))
    }

    /// Second `Invoke` call: the caller selects among previously presented
    /// options. Skips retrieval entirely.
    pub fn invoke_with_selection(
        &self,
        input: &str,
        selected_option: u32,
        options: Vec<RetrievalOption>,
        cancel: &CancellationToken,
    ) -> Outcome {
        let _ = cancel;
        let state = State::with_selection(input.trim(), selected_option, options);
        let chosen = state
            .options
            .iter()
            .find(|o| o.option_id == selected_option)
            .cloned();

        let state = match chosen {
            Some(option) => state.into_ok(option.docs),
            None => state.into_refuse(
                PipelineError::InvalidSelection {
                    option_id: selected_option,
                }
                .refusal_reason(),
            ),
        };

        Self::finalize(state)
    }

    fn run(&self, state: State, cancel: &CancellationToken) -> State {
        let state = ood::apply(state, &self.config.ood);
        if state.is_terminal_non_ok() {
            return state;
        }

        if let Err(err) = cancel.check() {
            return state.into_refuse(err.refusal_reason());
        }

        let candidates = match retriever::retrieve(&state.input, self.store, self.config) {
            Ok(candidates) => candidates,
            Err(err) => return state.into_refuse(err.refusal_reason()),
        };

        if let Err(err) = cancel.check() {
            return state.into_refuse(err.refusal_reason());
        }

        let (state, picked) = match gate::apply(&candidates, self.config) {
            GateOutcome::Refuse(reason) => (state.into_refuse(reason), None),
            GateOutcome::Pass(docs) => {
                let plain = docs.iter().map(|d| d.doc.clone()).collect();
                (state.into_ok(plain), Some(docs))
            }
            GateOutcome::Ambiguous(kept) => {
                let buckets = cluster::bucket(kept, self.config.strict_sig);
                match ambiguity::resolve(
                    &state.input,
                    buckets,
                    self.config,
                    self.embedder,
                    self.cache,
                    cancel,
                ) {
                    Ok(Resolution::Resolved(docs)) => {
                        let plain = docs.iter().map(|d| d.doc.clone()).collect();
                        (state.into_ok(plain), Some(docs))
                    }
                    Ok(Resolution::Options(buckets)) => {
                        let options = present::present(&buckets, self.config.final_k);
                        if options.len() < 2 {
                            // A single surviving option after dedup means every
                            // ambiguous bucket cited the same sources: there is
                            // nothing left to ask the user to choose between, so
                            // this resolves to `ok` directly.
                            let docs = options
                                .into_iter()
                                .next()
                                .map(|o| o.docs)
                                .unwrap_or_default();
                            let scored = docs.iter().map(|d| ScoredDocument::new(d.clone(), 0.0)).collect();
                            (state.into_ok(docs), Some(scored))
                        } else {
                            (state.into_ambiguous(options), None)
                        }
                    }
                    Err(err) => (state.into_refuse(err.refusal_reason()), None),
                }
            }
        };

        if state.status != Some(Status::Ok) {
            return state;
        }

        let state = coverage::apply(state, &self.config.coverage);
        if state.status != Some(Status::Ok) {
            return state;
        }

        let query_entities = extract_query_entities(&state.input, &self.config.coverage.entity_aliases);
        let picked = picked.unwrap_or_default();
        let docs = augment::augment(picked, &candidates, &query_entities, self.config.final_k);
        let docs = docs.into_iter().map(|d| d.doc).collect();
        state.into_ok(docs)
    }

    /// Validates a terminal state's invariants before deriving its
    /// [`Outcome`]: an `ok` state with no cited documents, or a state that
    /// somehow reached this point with no status at all, is always a bug —
    /// never forwarded to the caller as anything but `refuse("Internal
    /// error")`.
    fn finalize(state: State) -> Outcome {
        let needs_internal_refusal =
            state.status.is_none() || (state.status == Some(Status::Ok) && state.docs.is_empty());
        let state = if needs_internal_refusal {
            state.into_refuse(PipelineError::Internal("no status set".to_string()).refusal_reason())
        } else {
            state
        };
        Outcome::from_state(&state)
    }
}
