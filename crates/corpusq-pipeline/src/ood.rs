//! Pre-retrieval out-of-domain gate.

use corpusq_config::OodConfig;
use corpusq_types::State;

/// Applies the OOD gate to `state`.
///
/// Refuses when the input is empty/blank, any `deny_patterns` matches, or
/// no `allow_patterns` matches. Deny is checked before allow so an explicit
/// ban always wins over a broad allow pattern (invariant 8). A disabled
/// gate is a no-op.
pub fn apply(state: State, config: &OodConfig) -> State {
    if state.input.trim().is_empty() {
        tracing::debug!(target: "corpusq_pipeline::ood", "empty query");
        return state.into_refuse("Out of domain");
    }

    if !config.enabled {
        return state;
    }

    if config.deny_patterns.matches_any(&state.input) {
        tracing::debug!(target: "corpusq_pipeline::ood", "deny pattern matched");
        return state.into_refuse("Out of domain");
    }

    if !config.allow_patterns.is_empty() && !config.allow_patterns.matches_any(&state.input) {
        tracing::debug!(target: "corpusq_pipeline::ood", "no allow pattern matched");
        return state.into_refuse("Out of domain");
    }

    state
}
