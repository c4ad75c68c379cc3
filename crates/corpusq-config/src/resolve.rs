//! Base-plus-override layering for raw, deserialized configuration.
//!
//! Mirrors the base/override precedence a curator expects when one TOML
//! file supplies defaults and a second, more specific file overrides a
//! handful of keys. Merge is last-write-wins, field by field; an override's
//! `None` leaves the base's value untouched.

use crate::RawPipelineConfig;

/// Merges `override_cfg` onto `base`, field by field, last-write-wins.
///
/// Scalar fields in `override_cfg` that are `Some` replace `base`'s value;
/// `None` leaves `base` untouched. Pattern-list fields replace wholesale
/// when present in the override rather than concatenating, since a curator
/// overriding `deny_patterns` almost always means to replace the list, not
/// append to it.
pub fn merge(base: RawPipelineConfig, override_cfg: RawPipelineConfig) -> RawPipelineConfig {
    RawPipelineConfig {
        fetch_k: override_cfg.fetch_k.or(base.fetch_k),
        final_k: override_cfg.final_k.or(base.final_k),
        min_keep: override_cfg.min_keep.or(base.min_keep),
        max_l2: override_cfg.max_l2.or(base.max_l2),
        soft_max_l2: override_cfg.soft_max_l2.or(base.soft_max_l2),
        min_gap: override_cfg.min_gap.or(base.min_gap),
        min_group_gap: override_cfg.min_group_gap.or(base.min_group_gap),
        max_options: override_cfg.max_options.or(base.max_options),
        strict_sig: override_cfg.strict_sig.or(base.strict_sig),
        enable_sig_tiebreak: override_cfg.enable_sig_tiebreak.or(base.enable_sig_tiebreak),
        min_sig_sim: override_cfg.min_sig_sim.or(base.min_sig_sim),
        min_sig_sim_gap: override_cfg.min_sig_sim_gap.or(base.min_sig_sim_gap),
        enable_anchor_tiebreak: override_cfg
            .enable_anchor_tiebreak
            .or(base.enable_anchor_tiebreak),
        min_anchor_sim: override_cfg.min_anchor_sim.or(base.min_anchor_sim),
        min_anchor_sim_gap: override_cfg.min_anchor_sim_gap.or(base.min_anchor_sim_gap),
        enable_entity_resolve: override_cfg
            .enable_entity_resolve
            .or(base.enable_entity_resolve),
        require_full_entity_coverage: override_cfg
            .require_full_entity_coverage
            .or(base.require_full_entity_coverage),
        ood: override_cfg.ood.or(base.ood),
        coverage: override_cfg.coverage.or(base.coverage),
        ambiguity: override_cfg.ambiguity.or(base.ambiguity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_replaces_only_present_fields() {
        let base = RawPipelineConfig {
            fetch_k: Some(20),
            final_k: Some(4),
            ..Default::default()
        };
        let over = RawPipelineConfig {
            final_k: Some(6),
            ..Default::default()
        };
        let merged = merge(base, over);
        assert_eq!(merged.fetch_k, Some(20));
        assert_eq!(merged.final_k, Some(6));
    }
}
