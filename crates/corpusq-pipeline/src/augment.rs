//! Entity-coverage top-up after a resolution.

use std::collections::BTreeSet;

use corpusq_types::ScoredDocument;

/// Tops up `picked` with candidates from `pool` so the union of entity sets
/// covers `query_entities`, without exceeding `final_k` and without ever
/// displacing the anchor (`picked[0]`).
///
/// `pool` is the full retrieved candidate list; members already in `picked`
/// are skipped. A no-op when `query_entities` is empty.
pub fn augment(
    mut picked: Vec<ScoredDocument>,
    pool: &[ScoredDocument],
    query_entities: &[String],
    final_k: usize,
) -> Vec<ScoredDocument> {
    if query_entities.is_empty() || picked.is_empty() {
        picked.truncate(final_k);
        return picked;
    }

    let mut covered: BTreeSet<String> = picked
        .iter()
        .flat_map(|d| d.doc.metadata.entities.iter().cloned())
        .collect();
    let mut missing: Vec<&String> = query_entities.iter().filter(|e| !covered.contains(*e)).collect();

    if missing.is_empty() {
        picked.truncate(final_k);
        return picked;
    }

    if picked.len() >= final_k {
        let keep = (final_k.saturating_sub(missing.len().max(1))).max(1);
        picked.truncate(keep);
    }

    let already_present: BTreeSet<(String, Option<i64>)> = picked
        .iter()
        .map(|d| (d.doc.metadata.filename(), d.doc.metadata.page))
        .collect();

    for candidate in pool {
        if picked.len() >= final_k {
            break;
        }
        if missing.is_empty() {
            break;
        }
        let key = (candidate.doc.metadata.filename(), candidate.doc.metadata.page);
        if already_present.contains(&key) {
            continue;
        }
        let intersects = candidate
            .doc
            .metadata
            .entities
            .iter()
            .any(|e| missing.iter().any(|m| *m == e));
        if !intersects {
            continue;
        }

        covered.extend(candidate.doc.metadata.entities.iter().cloned());
        missing = query_entities.iter().filter(|e| !covered.contains(*e)).collect();
        picked.push(candidate.clone());
    }

    picked
}
