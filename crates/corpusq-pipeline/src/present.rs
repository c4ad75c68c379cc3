//! Building stable, deduplicated user-selectable options.

use std::collections::HashSet;

use corpusq_types::{collect_sources, deduplicate_options, Document, RetrievalOption, ScoredDocument};

use crate::cluster::Bucket;

/// Builds one option per bucket and deduplicates by source signature,
/// renumbering survivors contiguously from 1.
pub fn present(buckets: &[Bucket], final_k: usize) -> Vec<RetrievalOption> {
    let options: Vec<RetrievalOption> = buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| build_option(bucket, final_k, (i + 1) as u32))
        .collect();
    deduplicate_options(options)
}

fn build_option(bucket: &Bucket, final_k: usize, option_id: u32) -> RetrievalOption {
    let anchor = bucket.anchor().doc.clone();
    let remaining: Vec<&ScoredDocument> = bucket.members[1..].iter().collect();
    let (same_file, other_file): (Vec<&ScoredDocument>, Vec<&ScoredDocument>) =
        remaining.into_iter().partition(|c| c.doc.is_same_file(&anchor));
    let ordered: Vec<&ScoredDocument> = same_file.into_iter().chain(other_file).collect();

    let max_companions = final_k.saturating_sub(1);
    let mut picked_docs: Vec<Document> = vec![anchor.clone()];
    let mut used = vec![false; ordered.len()];
    let mut seen_pages: HashSet<(String, Option<i64>)> = HashSet::new();
    seen_pages.insert((anchor.metadata.filename(), anchor.metadata.page));
    let mut seen_files: HashSet<String> = HashSet::new();
    seen_files.insert(anchor.metadata.filename());

    for phase in 0..3 {
        if picked_docs.len() - 1 >= max_companions {
            break;
        }
        for (i, candidate) in ordered.iter().enumerate() {
            if picked_docs.len() - 1 >= max_companions {
                break;
            }
            if used[i] {
                continue;
            }
            let key = (candidate.doc.metadata.filename(), candidate.doc.metadata.page);
            let admit = match phase {
                0 => !seen_pages.contains(&key),
                1 => !seen_files.contains(&candidate.doc.metadata.filename()),
                _ => true,
            };
            if admit {
                used[i] = true;
                seen_pages.insert(key);
                seen_files.insert(candidate.doc.metadata.filename());
                picked_docs.push(candidate.doc.clone());
            }
        }
    }

    let sources = collect_sources(&picked_docs);
    RetrievalOption {
        option_id,
        docs: picked_docs,
        sources,
        best_distance: bucket.best_distance(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpusq_types::DocumentMetadata;

    fn bucket(domain: &str, docs: Vec<(&str, i64, f64)>) -> Bucket {
        let members: Vec<ScoredDocument> = docs
            .into_iter()
            .map(|(source, page, distance)| {
                let meta = DocumentMetadata {
                    domain: Some(domain.to_string()),
                    source: Some(source.to_string()),
                    page: Some(page),
                    ..Default::default()
                };
                ScoredDocument::new(Document::new("body", meta), distance)
            })
            .collect();
        Bucket {
            signature: corpusq_types::TagSignature::core(&members[0].doc),
            members,
        }
    }

    #[test]
    fn prefers_same_file_companions_first() {
        let b = bucket(
            "mqtt",
            vec![("a.pdf", 1, 0.1), ("b.pdf", 1, 0.11), ("a.pdf", 2, 0.12)],
        );
        let options = present(&[b], 3);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].docs[1].metadata.source.as_deref(), Some("a.pdf"));
    }

    #[test]
    fn caps_companions_at_final_k_minus_one() {
        let b = bucket(
            "mqtt",
            vec![
                ("a.pdf", 1, 0.1),
                ("a.pdf", 2, 0.11),
                ("a.pdf", 3, 0.12),
                ("a.pdf", 4, 0.13),
            ],
        );
        let options = present(&[b], 2);
        assert_eq!(options[0].docs.len(), 2);
    }

    #[test]
    fn identical_source_sets_collapse_and_renumber() {
        let b1 = bucket("mqtt", vec![("a.pdf", 1, 0.1)]);
        let b2 = bucket("kafka", vec![("a.pdf", 1, 0.2)]);
        let b3 = bucket("aws", vec![("b.pdf", 1, 0.3)]);
        let options = present(&[b1, b2, b3], 1);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].option_id, 1);
        assert_eq!(options[1].option_id, 2);
    }
}
