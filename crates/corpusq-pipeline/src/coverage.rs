//! Post-retrieval entity-coverage check.

use std::collections::BTreeSet;

use corpusq_config::CoverageConfig;
use corpusq_context::extract_query_entities;
use corpusq_types::State;

/// Refuses an `ok` state when a comparison or generic query cites documents
/// that do not cover every entity the query names. A no-op unless
/// `state.status == Ok`, and a no-op entirely when disabled.
pub fn apply(state: State, config: &CoverageConfig) -> State {
    if state.status != Some(corpusq_types::Status::Ok) || !config.enabled {
        return state;
    }

    if state.input.trim().is_empty() {
        return state.into_refuse("Empty or invalid query");
    }

    let query_entities = extract_query_entities(&state.input, &config.entity_aliases);
    let doc_entities: BTreeSet<&String> = state
        .docs
        .iter()
        .flat_map(|d| d.metadata.entities.iter())
        .collect();
    let missing: Vec<&String> = query_entities
        .iter()
        .filter(|e| !doc_entities.contains(e))
        .collect();

    if missing.is_empty() {
        return state;
    }

    let is_compare = config.compare_markers.matches_any(&state.input) && query_entities.len() >= 2;
    let is_generic = config.generic_markers.matches_any(&state.input) && !query_entities.is_empty();

    if is_compare || is_generic {
        let missing_text = missing
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        tracing::debug!(target: "corpusq_pipeline::coverage", missing = %missing_text, "coverage gate refused");
        return state.into_refuse(format!("Missing document coverage for: {missing_text}"));
    }

    state
}
