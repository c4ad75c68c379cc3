//! User-selectable interpretations presented when the pipeline is ambiguous.

use crate::document::{Document, SourceRef};

/// One disjoint interpretation of an ambiguous query.
///
/// `option_id` is contiguous starting at 1 after deduplication; `sources`
/// always matches `docs` (same filenames and pages, deduplicated by
/// `(filename, page)`, stably sorted).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RetrievalOption {
    /// 1-based, contiguous identifier the caller echoes back to select this
    /// option.
    pub option_id: u32,
    /// The documents this option would cite if chosen.
    pub docs: Vec<Document>,
    /// Deduplicated, sorted source references for `docs`.
    pub sources: Vec<SourceRef>,
    /// The best (smallest) distance among `docs`' originating bucket.
    pub best_distance: f64,
}

impl RetrievalOption {
    /// The signature used to detect two options that cite the same sources:
    /// two buckets producing the same source set collapse into one.
    pub fn source_signature(&self) -> Vec<(String, String)> {
        let mut sig: Vec<(String, String)> = self
            .sources
            .iter()
            .map(|s| (s.filename.clone(), s.page.as_sort_key()))
            .collect();
        sig.sort();
        sig
    }
}

/// Deduplicates options by their source signature and renumbers the
/// survivors contiguously from 1.
pub fn deduplicate_options(options: Vec<RetrievalOption>) -> Vec<RetrievalOption> {
    let mut seen = std::collections::HashSet::new();
    let mut kept = Vec::new();

    for option in options {
        let sig = option.source_signature();
        if seen.insert(sig) {
            kept.push(option);
        }
    }

    kept.into_iter()
        .enumerate()
        .map(|(i, mut option)| {
            option.option_id = (i + 1) as u32;
            option
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentMetadata;

    fn doc(source: &str, page: i64) -> Document {
        Document::new(
            "body",
            DocumentMetadata {
                source: Some(source.to_string()),
                page: Some(page),
                ..Default::default()
            },
        )
    }

    #[test]
    fn dedup_collapses_identical_source_sets_and_renumbers() {
        let docs = vec![doc("a.pdf", 1), doc("a.pdf", 2)];
        let sources = crate::document::collect_sources(&docs);

        let opt_a = RetrievalOption {
            option_id: 1,
            docs: docs.clone(),
            sources: sources.clone(),
            best_distance: 0.1,
        };
        let opt_b = RetrievalOption {
            option_id: 2,
            docs,
            sources,
            best_distance: 0.2,
        };
        let opt_c = RetrievalOption {
            option_id: 3,
            docs: vec![doc("b.pdf", 1)],
            sources: crate::document::collect_sources(&[doc("b.pdf", 1)]),
            best_distance: 0.3,
        };

        let deduped = deduplicate_options(vec![opt_a, opt_b, opt_c]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].option_id, 1);
        assert_eq!(deduped[1].option_id, 2);
    }
}
