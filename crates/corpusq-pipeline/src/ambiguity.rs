//! Cascading ambiguity resolution.

use std::collections::BTreeSet;

use corpusq_config::PipelineConfig;
use corpusq_context::{accept_top, extract_query_entities, is_generic_query, rank_by_cosine};
use corpusq_types::{CancellationToken, EmbeddingCache, Embedder, PipelineError, ScoredDocument};

use crate::cluster::Bucket;

/// The AmbiguityResolver's verdict.
pub enum Resolution {
    /// A single bucket was chosen; these are its top `final_k` documents.
    Resolved(Vec<ScoredDocument>),
    /// No step could resolve the ambiguity; present these buckets as
    /// options (already capped at `max_options`).
    Options(Vec<Bucket>),
}

/// Runs the ambiguity-resolution cascade over `buckets`, entered only when
/// the gate engine returned ambiguous. Each step either resolves to a
/// single bucket or falls through to the next; if nothing resolves, the
/// remaining buckets are presented as options.
pub fn resolve(
    input: &str,
    buckets: Vec<Bucket>,
    config: &PipelineConfig,
    embedder: &dyn Embedder,
    cache: &EmbeddingCache,
    cancel: &CancellationToken,
) -> Result<Resolution, PipelineError> {
    // Overview-query override.
    if config.ambiguity.keep_ambiguous_for_generic_queries
        && buckets.len() >= 2
        && is_generic_query(input, &config.ambiguity)
    {
        tracing::debug!(target: "corpusq_pipeline::ambiguity", "overview override");
        return Ok(present(buckets, config.max_options));
    }

    // Single-bucket shortcut.
    if buckets.len() == 1 {
        tracing::debug!(target: "corpusq_pipeline::ambiguity", "single bucket");
        return Ok(Resolution::Resolved(take_final_k(&buckets[0], config.final_k)));
    }

    let query_entities = extract_query_entities(input, &config.coverage.entity_aliases);

    // Generic, underspecified, no extractable entities.
    if is_generic_query(input, &config.ambiguity) && query_entities.is_empty() {
        tracing::debug!(target: "corpusq_pipeline::ambiguity", "generic underspecified");
        return Ok(present(buckets, config.max_options));
    }

    // Entity-coverage resolve, possibly narrowing the working set.
    let mut working = buckets;
    if config.enable_entity_resolve && !query_entities.is_empty() {
        match resolve_by_entity_coverage(&working, &query_entities, config) {
            EntityOutcome::Resolved(index) => {
                tracing::debug!(target: "corpusq_pipeline::ambiguity", "entity coverage resolved");
                return Ok(Resolution::Resolved(take_final_k(&working[index], config.final_k)));
            }
            EntityOutcome::Narrowed(indices) => {
                working = indices.into_iter().map(|i| working[i].clone()).collect();
            }
            EntityOutcome::NoMatch => {}
        }
    }

    // Group-gap resolve.
    if working.len() >= 2 {
        let gap = working[1].best_distance() - working[0].best_distance();
        if gap >= config.min_group_gap {
            tracing::debug!(target: "corpusq_pipeline::ambiguity", gap, "group gap resolved");
            return Ok(Resolution::Resolved(take_final_k(&working[0], config.final_k)));
        }
    }

    // Signature-embedding tie-break.
    if config.enable_sig_tiebreak {
        cancel.check()?;
        let texts: Vec<String> = working.iter().map(|b| b.signature.render_text()).collect();
        if let Some(index) = cosine_tiebreak(
            input,
            &texts,
            embedder,
            cache,
            config.min_sig_sim,
            config.min_sig_sim_gap,
        )? {
            tracing::debug!(target: "corpusq_pipeline::ambiguity", "signature tie-break resolved");
            return Ok(Resolution::Resolved(take_final_k(&working[index], config.final_k)));
        }
    }

    // Anchor-content tie-break.
    if config.enable_anchor_tiebreak {
        cancel.check()?;
        let texts: Vec<String> = working
            .iter()
            .map(|b| b.anchor().doc.clipped_content(800))
            .collect();
        if let Some(index) = cosine_tiebreak(
            input,
            &texts,
            embedder,
            cache,
            config.min_anchor_sim,
            config.min_anchor_sim_gap,
        )? {
            tracing::debug!(target: "corpusq_pipeline::ambiguity", "anchor tie-break resolved");
            return Ok(Resolution::Resolved(take_final_k(&working[index], config.final_k)));
        }
    }

    // Fail open to options.
    tracing::debug!(target: "corpusq_pipeline::ambiguity", "failing open to options");
    Ok(present(working, config.max_options))
}

fn present(mut buckets: Vec<Bucket>, max_options: usize) -> Resolution {
    buckets.truncate(max_options);
    Resolution::Options(buckets)
}

fn take_final_k(bucket: &Bucket, final_k: usize) -> Vec<ScoredDocument> {
    bucket.members.iter().take(final_k).cloned().collect()
}

enum EntityOutcome {
    Resolved(usize),
    Narrowed(Vec<usize>),
    NoMatch,
}

fn resolve_by_entity_coverage(
    buckets: &[Bucket],
    query_entities: &[String],
    config: &PipelineConfig,
) -> EntityOutcome {
    let hits: Vec<usize> = buckets
        .iter()
        .map(|b| group_hit(b, query_entities))
        .collect();
    let max_hit = *hits.iter().max().unwrap_or(&0);

    if max_hit == 0 {
        return EntityOutcome::NoMatch;
    }
    if config.require_full_entity_coverage && max_hit < query_entities.len() {
        return EntityOutcome::NoMatch;
    }

    let winners: Vec<usize> = hits
        .iter()
        .enumerate()
        .filter(|&(_, &h)| h == max_hit)
        .map(|(i, _)| i)
        .collect();

    if winners.len() == 1 {
        return EntityOutcome::Resolved(winners[0]);
    }

    let mut ranked: Vec<usize> = winners;
    ranked.sort_by(|&a, &b| {
        tiebreak_key(&buckets[a], query_entities)
            .partial_cmp(&tiebreak_key(&buckets[b], query_entities))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let best_key = tiebreak_key(&buckets[ranked[0]], query_entities);
    let narrowed: Vec<usize> = ranked
        .into_iter()
        .filter(|&i| tiebreak_key(&buckets[i], query_entities) == best_key)
        .collect();

    if narrowed.len() == 1 {
        EntityOutcome::Resolved(narrowed[0])
    } else {
        EntityOutcome::Narrowed(narrowed)
    }
}

/// `(-anchor_hits, -docs_hits, -group_hits, best_distance)`, ascending.
fn tiebreak_key(bucket: &Bucket, query_entities: &[String]) -> (i64, i64, i64, f64) {
    let anchor_hits = entity_intersection_count(&bucket.anchor().doc.metadata.entities, query_entities);
    let docs_hits = bucket
        .members
        .iter()
        .filter(|m| entity_intersection_count(&m.doc.metadata.entities, query_entities) > 0)
        .count();
    let group_hits = group_hit(bucket, query_entities);
    (
        -(anchor_hits as i64),
        -(docs_hits as i64),
        -(group_hits as i64),
        bucket.best_distance(),
    )
}

fn group_hit(bucket: &Bucket, query_entities: &[String]) -> usize {
    let union: BTreeSet<&String> = bucket
        .members
        .iter()
        .flat_map(|m| m.doc.metadata.entities.iter())
        .collect();
    query_entities
        .iter()
        .filter(|e| union.contains(e))
        .count()
}

fn entity_intersection_count(entities: &BTreeSet<String>, query_entities: &[String]) -> usize {
    query_entities.iter().filter(|e| entities.contains(*e)).count()
}

fn cosine_tiebreak(
    query: &str,
    texts: &[String],
    embedder: &dyn Embedder,
    cache: &EmbeddingCache,
    min_sim: f64,
    min_sim_gap: f64,
) -> Result<Option<usize>, PipelineError> {
    let query_vec = embed_cached(query, embedder, cache)?;
    let candidate_vecs: Vec<Vec<f32>> = texts
        .iter()
        .map(|t| embed_cached(t, embedder, cache))
        .collect::<Result<_, _>>()?;
    let ranked = rank_by_cosine(&query_vec, &candidate_vecs);
    Ok(accept_top(&ranked, min_sim, min_sim_gap))
}

fn embed_cached(text: &str, embedder: &dyn Embedder, cache: &EmbeddingCache) -> Result<Vec<f32>, PipelineError> {
    let identity = embedder.identity();
    if let Some(cached) = cache.get(&identity, text) {
        return Ok(cached);
    }
    let embedding = embedder.embed_query(text)?;
    cache.put(identity, text, embedding.clone());
    Ok(embedding)
}
