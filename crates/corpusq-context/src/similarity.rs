//! Cosine similarity and the generic cosine-rank-and-accept shape shared by
//! the signature and anchor-content tie-breaks.

/// Cosine similarity between two vectors, computed with explicit norms.
///
/// Never assumes the embedder returns unit vectors.
/// Returns `0.0` if either vector has zero magnitude, since that candidate
/// can never win a similarity-ranked tie-break anyway.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// One candidate's index (into the caller's original list) and its cosine
/// similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    /// Index into the original candidate list.
    pub index: usize,
    /// Cosine similarity to the query embedding.
    pub similarity: f64,
}

/// Ranks each candidate embedding against the query embedding, descending
/// by cosine similarity. Ties keep the candidates' original relative order.
pub fn rank_by_cosine(query: &[f32], candidates: &[Vec<f32>]) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| RankedCandidate {
            index,
            similarity: cosine_similarity(query, candidate),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Accepts the top-ranked candidate iff `best_sim >= min_sim` and
/// `best_sim - second_sim >= min_sim_gap`; this is the acceptance rule
/// shared by both embedding tie-breaks.
///
/// A single-candidate ranking has no second place to compare against, so
/// only the `min_sim` floor applies.
pub fn accept_top(ranked: &[RankedCandidate], min_sim: f64, min_sim_gap: f64) -> Option<usize> {
    let best = ranked.first()?;
    if best.similarity < min_sim {
        return None;
    }
    match ranked.get(1) {
        Some(second) if best.similarity - second.similarity < min_sim_gap => None,
        _ => Some(best.index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_similarity_one() {
        let v = vec![1.0_f32, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_vectors_have_similarity_zero() {
        assert!((cosine_similarity(&[1.0, 0.0], &[0.0, 1.0])).abs() < 1e-9);
    }

    #[test]
    fn does_not_assume_unit_vectors() {
        let a = vec![10.0_f32, 0.0];
        let b = vec![1.0_f32, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_yields_zero_similarity() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn rank_by_cosine_orders_descending() {
        let query = vec![1.0_f32, 0.0];
        let candidates = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.7, 0.7]];
        let ranked = rank_by_cosine(&query, &candidates);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked.last().unwrap().index, 0);
    }

    #[test]
    fn accept_top_requires_both_floor_and_gap() {
        let ranked = vec![
            RankedCandidate { index: 0, similarity: 0.62 },
            RankedCandidate { index: 1, similarity: 0.60 },
        ];
        assert_eq!(accept_top(&ranked, 0.6, 0.05), None); // gap too small
        assert_eq!(accept_top(&ranked, 0.65, 0.0), None); // below floor

        let ranked = vec![
            RankedCandidate { index: 0, similarity: 0.9 },
            RankedCandidate { index: 1, similarity: 0.3 },
        ];
        assert_eq!(accept_top(&ranked, 0.6, 0.05), Some(0));
    }

    #[test]
    fn single_candidate_only_checks_floor() {
        let ranked = vec![RankedCandidate { index: 0, similarity: 0.8 }];
        assert_eq!(accept_top(&ranked, 0.6, 0.5), Some(0));
        assert_eq!(accept_top(&ranked, 0.9, 0.0), None);
    }

    #[test]
    fn empty_ranking_accepts_nothing() {
        assert_eq!(accept_top(&[], 0.0, 0.0), None);
    }
}
