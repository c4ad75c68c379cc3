//! Bucketing candidates by tag signature.

use corpusq_types::{ScoredDocument, TagSignature};

/// One cluster of candidates sharing a tag signature, sorted ascending by
/// distance. Never empty.
#[derive(Debug, Clone)]
pub struct Bucket {
    /// The shared signature for every candidate in this bucket.
    pub signature: TagSignature,
    /// Members, ascending by distance; `members[0]` is the anchor.
    pub members: Vec<ScoredDocument>,
}

impl Bucket {
    /// The anchor (lowest-distance) candidate.
    pub fn anchor(&self) -> &ScoredDocument {
        &self.members[0]
    }

    /// The anchor's distance, used to order buckets.
    pub fn best_distance(&self) -> f64 {
        self.anchor().distance
    }
}

/// Groups `candidates` by core (or strict, when `strict_sig`) tag
/// signature. Buckets are sorted ascending by best distance; each bucket's
/// members are already ascending by distance since `candidates` is.
pub fn bucket(candidates: Vec<ScoredDocument>, strict_sig: bool) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();

    for candidate in candidates {
        let signature = TagSignature::for_document(&candidate.doc, strict_sig);
        match buckets.iter_mut().find(|b| b.signature == signature) {
            Some(existing) => existing.members.push(candidate),
            None => buckets.push(Bucket {
                signature,
                members: vec![candidate],
            }),
        }
    }

    buckets.sort_by(|a, b| {
        a.best_distance()
            .partial_cmp(&b.best_distance())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    buckets
}
