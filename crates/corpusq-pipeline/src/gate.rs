//! Distance, density, and confidence-gap gating.

use corpusq_config::PipelineConfig;
use corpusq_types::{ScoredDocument, TagSignature};

/// The GateEngine's verdict.
#[derive(Debug)]
pub enum GateOutcome {
    /// The first `final_k` kept candidates, ready for `ok`.
    Pass(Vec<ScoredDocument>),
    /// No threshold admitted enough candidates; carries the refusal reason.
    Refuse(&'static str),
    /// Two or more candidates are too close to call; carries every kept
    /// candidate for [`crate::cluster`] to bucket.
    Ambiguous(Vec<ScoredDocument>),
}

/// Applies the three gates in order: threshold selection, density, and
/// confidence-gap.
pub fn apply(candidates: &[ScoredDocument], config: &PipelineConfig) -> GateOutcome {
    let Some(best) = candidates.first() else {
        tracing::debug!(target: "corpusq_pipeline::gate", "no candidates retrieved");
        return GateOutcome::Refuse("Insufficient relevance");
    };

    let threshold = if best.distance <= config.max_l2 {
        config.max_l2
    } else if let Some(soft) = config.soft_max_l2.filter(|soft| best.distance <= *soft) {
        soft
    } else {
        tracing::debug!(
            target: "corpusq_pipeline::gate",
            best_distance = best.distance,
            "best candidate exceeds hard and soft thresholds"
        );
        return GateOutcome::Refuse("Insufficient relevance");
    };

    let kept: Vec<ScoredDocument> = candidates
        .iter()
        .filter(|c| c.distance <= threshold)
        .cloned()
        .collect();

    if kept.len() < config.min_keep {
        tracing::debug!(
            target: "corpusq_pipeline::gate",
            kept = kept.len(),
            min_keep = config.min_keep,
            "density gate rejected"
        );
        return GateOutcome::Refuse("Insufficient relevance");
    }

    if kept.len() > 1 {
        let gap = kept[1].distance - kept[0].distance;
        if gap < config.min_gap && !gap_exempt(&kept[0], &kept[1]) {
            tracing::debug!(
                target: "corpusq_pipeline::gate",
                gap,
                min_gap = config.min_gap,
                "confidence-gap gate is ambiguous"
            );
            return GateOutcome::Ambiguous(kept);
        }
    }

    let final_k = config.final_k;
    GateOutcome::Pass(kept.into_iter().take(final_k).collect())
}

/// True if the top two kept candidates are exempt from the gap gate: either
/// the same source file within 2 pages of each other, or an identical
/// non-synthetic core tag signature. Both signals are independent checks,
/// not mutually exclusive.
fn gap_exempt(first: &ScoredDocument, second: &ScoredDocument) -> bool {
    let same_close_pages = match (&first.doc.metadata.source, &second.doc.metadata.source) {
        (Some(a), Some(b)) if a == b => match (first.doc.metadata.page, second.doc.metadata.page) {
            (Some(p1), Some(p2)) => (p1 - p2).abs() <= 2,
            _ => false,
        },
        _ => false,
    };

    let same_core_signature = {
        let sig_a = TagSignature::core(&first.doc);
        let sig_b = TagSignature::core(&second.doc);
        sig_a == sig_b && !sig_a.is_file_fallback()
    };

    same_close_pages || same_core_signature
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpusq_types::{Document, DocumentMetadata};

    fn doc_with(source: &str, page: i64, domain: &str) -> Document {
        Document::new(
            "body",
            DocumentMetadata {
                source: Some(source.to_string()),
                page: Some(page),
                domain: Some(domain.to_string()),
                doc_type: Some("spec".to_string()),
                product: Some(domain.to_string()),
                ..Default::default()
            },
        )
    }

    fn config(toml: &str) -> PipelineConfig {
        PipelineConfig::from_toml_str(toml).unwrap()
    }

    #[test]
    fn empty_candidates_refuse() {
        let outcome = apply(&[], &config(""));
        assert!(matches!(outcome, GateOutcome::Refuse(_)));
    }

    #[test]
    fn best_beyond_hard_and_soft_refuses() {
        let candidates = vec![ScoredDocument::new(doc_with("a.pdf", 1, "mqtt"), 0.9)];
        let outcome = apply(&candidates, &config("max_l2 = 0.45\nsoft_max_l2 = 0.6\n"));
        assert!(matches!(outcome, GateOutcome::Refuse(_)));
    }

    #[test]
    fn soft_band_admits_borderline_best() {
        let candidates = vec![ScoredDocument::new(doc_with("a.pdf", 1, "mqtt"), 0.5)];
        let outcome = apply(&candidates, &config("max_l2 = 0.45\nsoft_max_l2 = 0.6\n"));
        assert!(matches!(outcome, GateOutcome::Pass(_)));
    }

    #[test]
    fn density_gate_rejects_too_few_kept() {
        let candidates = vec![ScoredDocument::new(doc_with("a.pdf", 1, "mqtt"), 0.1)];
        let outcome = apply(&candidates, &config("min_keep = 2\n"));
        assert!(matches!(outcome, GateOutcome::Refuse(_)));
    }

    #[test]
    fn close_gap_without_exemption_is_ambiguous() {
        let candidates = vec![
            ScoredDocument::new(doc_with("a.pdf", 1, "mqtt"), 0.10),
            ScoredDocument::new(doc_with("b.pdf", 9, "kafka"), 0.11),
        ];
        let outcome = apply(&candidates, &config("min_gap = 0.05\n"));
        assert!(matches!(outcome, GateOutcome::Ambiguous(_)));
    }

    #[test]
    fn close_gap_same_file_close_pages_is_exempt() {
        let candidates = vec![
            ScoredDocument::new(doc_with("a.pdf", 10, "mqtt"), 0.10),
            ScoredDocument::new(doc_with("a.pdf", 11, "mqtt"), 0.11),
        ];
        let outcome = apply(&candidates, &config("min_gap = 0.05\n"));
        assert!(matches!(outcome, GateOutcome::Pass(_)));
    }

    #[test]
    fn close_gap_same_core_signature_is_exempt() {
        let candidates = vec![
            ScoredDocument::new(doc_with("a.pdf", 1, "mqtt"), 0.10),
            ScoredDocument::new(doc_with("b.pdf", 99, "mqtt"), 0.11),
        ];
        let outcome = apply(&candidates, &config("min_gap = 0.05\n"));
        assert!(matches!(outcome, GateOutcome::Pass(_)));
    }

    #[test]
    fn large_gap_passes_without_exemption() {
        let candidates = vec![
            ScoredDocument::new(doc_with("a.pdf", 1, "mqtt"), 0.10),
            ScoredDocument::new(doc_with("b.pdf", 99, "kafka"), 0.30),
        ];
        let outcome = apply(&candidates, &config("min_gap = 0.05\n"));
        assert!(matches!(outcome, GateOutcome::Pass(_)));
    }

    #[test]
    fn pass_truncates_to_final_k() {
        let candidates: Vec<ScoredDocument> = (0..10)
            .map(|i| ScoredDocument::new(doc_with("a.pdf", i, "mqtt"), 0.05 + i as f64 * 0.001))
            .collect();
        let outcome = apply(&candidates, &config("final_k = 3\nmin_gap = 0.0\n"));
        match outcome {
            GateOutcome::Pass(docs) => assert_eq!(docs.len(), 3),
            other => panic!("expected Pass, got {other:?}"),
        }
    }
}
