//! Typed, construction-validated configuration for the retrieval pipeline.
//!
//! Configuration is authored as TOML and loaded once at process start into
//! an immutable [`PipelineConfig`]. Deserialization first produces a
//! [`RawPipelineConfig`] of all-optional fields (so a curator's override
//! file only needs to name the keys it changes), which is then merged with
//! [`resolve::merge`], validated with [`validate::validate_thresholds`], and
//! compiled (regex patterns, entity aliases) into the typed config the
//! pipeline actually consumes. Invalid regex or an out-of-range threshold
//! fails at this point, not on a query.

#![warn(missing_docs)]

mod error;
mod patterns;
mod resolve;
mod validate;

use std::collections::HashMap;

use serde::Deserialize;

pub use error::ConfigError;
pub use patterns::{EntityAliases, PatternList};

// =============================================================================
// Default value constants.
// =============================================================================

/// Default number of candidates fetched from the vector store before gating.
pub const DEFAULT_FETCH_K: usize = 20;
/// Default number of documents returned to the caller on an `ok` outcome.
pub const DEFAULT_FINAL_K: usize = 4;
/// Default minimum surviving candidates required by the density gate.
pub const DEFAULT_MIN_KEEP: usize = 1;
/// Default hard L2 distance cutoff.
pub const DEFAULT_MAX_L2: f64 = 0.45;
/// Default confidence-gap threshold.
pub const DEFAULT_MIN_GAP: f64 = 0.05;
/// Default group-gap threshold for the group-gap resolution step.
pub const DEFAULT_MIN_GROUP_GAP: f64 = 0.08;
/// Default cap on presented options.
pub const DEFAULT_MAX_OPTIONS: usize = 3;
/// Default minimum cosine similarity for the signature tie-break.
pub const DEFAULT_MIN_SIG_SIM: f64 = 0.6;
/// Default minimum similarity gap for the signature tie-break.
pub const DEFAULT_MIN_SIG_SIM_GAP: f64 = 0.05;
/// Default minimum cosine similarity for the anchor-content tie-break.
pub const DEFAULT_MIN_ANCHOR_SIM: f64 = 0.6;
/// Default minimum similarity gap for the anchor-content tie-break.
pub const DEFAULT_MIN_ANCHOR_SIM_GAP: f64 = 0.05;

/// Raw, fully optional deserialization target for one TOML configuration
/// source. Every field is `Option` so a partial override file only needs to
/// name the keys it changes; [`resolve::merge`] combines two of these with
/// last-write-wins semantics before validation and compilation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPipelineConfig {
    /// See [`DEFAULT_FETCH_K`].
    pub fetch_k: Option<usize>,
    /// See [`DEFAULT_FINAL_K`].
    pub final_k: Option<usize>,
    /// See [`DEFAULT_MIN_KEEP`].
    pub min_keep: Option<usize>,
    /// See [`DEFAULT_MAX_L2`].
    pub max_l2: Option<f64>,
    /// Soft L2 band above `max_l2`; `None` disables the soft band.
    pub soft_max_l2: Option<f64>,
    /// See [`DEFAULT_MIN_GAP`].
    pub min_gap: Option<f64>,
    /// See [`DEFAULT_MIN_GROUP_GAP`].
    pub min_group_gap: Option<f64>,
    /// See [`DEFAULT_MAX_OPTIONS`].
    pub max_options: Option<usize>,
    /// Use the 5-field strict signature instead of the 3-field core one.
    pub strict_sig: Option<bool>,
    /// Enable the signature-embedding tie-break.
    pub enable_sig_tiebreak: Option<bool>,
    /// See [`DEFAULT_MIN_SIG_SIM`].
    pub min_sig_sim: Option<f64>,
    /// See [`DEFAULT_MIN_SIG_SIM_GAP`].
    pub min_sig_sim_gap: Option<f64>,
    /// Enable the anchor-content tie-break.
    pub enable_anchor_tiebreak: Option<bool>,
    /// See [`DEFAULT_MIN_ANCHOR_SIM`].
    pub min_anchor_sim: Option<f64>,
    /// See [`DEFAULT_MIN_ANCHOR_SIM_GAP`].
    pub min_anchor_sim_gap: Option<f64>,
    /// Enable entity-coverage resolution.
    pub enable_entity_resolve: Option<bool>,
    /// Require `max_hit == |query_entities|` for entity-coverage resolution
    /// to resolve.
    pub require_full_entity_coverage: Option<bool>,
    /// Out-of-domain gate settings.
    pub ood: Option<RawOodConfig>,
    /// Coverage gate settings.
    pub coverage: Option<RawCoverageConfig>,
    /// Ambiguity-resolution settings.
    pub ambiguity: Option<RawAmbiguityConfig>,
}

impl RawPipelineConfig {
    /// Parses a raw config from a TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    fn fetch_k(&self) -> usize {
        self.fetch_k.unwrap_or(DEFAULT_FETCH_K)
    }
    fn final_k(&self) -> usize {
        self.final_k.unwrap_or(DEFAULT_FINAL_K)
    }
    fn min_keep(&self) -> usize {
        self.min_keep.unwrap_or(DEFAULT_MIN_KEEP)
    }
    fn max_l2(&self) -> f64 {
        self.max_l2.unwrap_or(DEFAULT_MAX_L2)
    }
    fn min_gap(&self) -> f64 {
        self.min_gap.unwrap_or(DEFAULT_MIN_GAP)
    }
    fn min_group_gap(&self) -> f64 {
        self.min_group_gap.unwrap_or(DEFAULT_MIN_GROUP_GAP)
    }
    fn max_options(&self) -> usize {
        self.max_options.unwrap_or(DEFAULT_MAX_OPTIONS)
    }
    fn min_sig_sim(&self) -> f64 {
        self.min_sig_sim.unwrap_or(DEFAULT_MIN_SIG_SIM)
    }
    fn min_sig_sim_gap(&self) -> f64 {
        self.min_sig_sim_gap.unwrap_or(DEFAULT_MIN_SIG_SIM_GAP)
    }
    fn min_anchor_sim(&self) -> f64 {
        self.min_anchor_sim.unwrap_or(DEFAULT_MIN_ANCHOR_SIM)
    }
    fn min_anchor_sim_gap(&self) -> f64 {
        self.min_anchor_sim_gap.unwrap_or(DEFAULT_MIN_ANCHOR_SIM_GAP)
    }
}

/// Raw out-of-domain gate settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOodConfig {
    /// Whether the gate runs at all.
    pub enabled: Option<bool>,
    /// Patterns that, if none match, cause a refusal.
    pub allow_patterns: Vec<String>,
    /// Patterns that, if any match, cause a refusal (checked first).
    pub deny_patterns: Vec<String>,
}

/// Raw coverage gate settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCoverageConfig {
    /// Whether the gate runs at all.
    pub enabled: Option<bool>,
    /// Markers indicating a comparison query (e.g. "vs", "compared to").
    pub compare_markers: Vec<String>,
    /// Markers indicating a broad/generic query.
    pub generic_markers: Vec<String>,
    /// Canonical entity name to alias pattern list.
    pub entity_aliases: HashMap<String, Vec<String>>,
}

/// Raw ambiguity-resolution settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAmbiguityConfig {
    /// Whether a generic, non-facet query with ≥ 2 buckets skips
    /// auto-resolution entirely.
    pub keep_ambiguous_for_generic_queries: Option<bool>,
    /// Patterns identifying a broad/overview query.
    pub generic_query_patterns: Vec<String>,
    /// Patterns identifying a query that names a specific facet, overriding
    /// the generic classification.
    pub facet_query_patterns: Vec<String>,
}

/// Compiled out-of-domain gate configuration.
#[derive(Debug, Clone)]
pub struct OodConfig {
    /// Whether the gate runs at all.
    pub enabled: bool,
    /// Compiled allow-list.
    pub allow_patterns: PatternList,
    /// Compiled deny-list.
    pub deny_patterns: PatternList,
}

/// Compiled coverage gate configuration.
#[derive(Debug, Clone)]
pub struct CoverageConfig {
    /// Whether the gate runs at all.
    pub enabled: bool,
    /// Compiled comparison-query markers.
    pub compare_markers: PatternList,
    /// Compiled generic-query markers.
    pub generic_markers: PatternList,
    /// Compiled entity alias patterns.
    pub entity_aliases: EntityAliases,
}

/// Compiled ambiguity-resolution configuration.
#[derive(Debug, Clone)]
pub struct AmbiguityConfig {
    /// See [`RawAmbiguityConfig::keep_ambiguous_for_generic_queries`].
    pub keep_ambiguous_for_generic_queries: bool,
    /// Compiled generic-query patterns.
    pub generic_query_patterns: PatternList,
    /// Compiled facet-query patterns.
    pub facet_query_patterns: PatternList,
}

/// The fully resolved, immutable configuration the pipeline runs against.
///
/// Built once via [`PipelineConfig::load`] or [`PipelineConfig::from_toml_str`]
/// and shared (typically behind an `Arc`) by every subsequent query.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Candidate fan-out from the vector store.
    pub fetch_k: usize,
    /// Result size cap shown to the caller.
    pub final_k: usize,
    /// Density gate floor.
    pub min_keep: usize,
    /// Hard L2 threshold.
    pub max_l2: f64,
    /// Soft L2 threshold; `None` disables the soft band.
    pub soft_max_l2: Option<f64>,
    /// Confidence-gap threshold.
    pub min_gap: f64,
    /// Group-gap resolution threshold.
    pub min_group_gap: f64,
    /// Options cap.
    pub max_options: usize,
    /// Use the 5-field strict signature.
    pub strict_sig: bool,
    /// Signature tie-break controls.
    pub enable_sig_tiebreak: bool,
    /// Signature tie-break controls.
    pub min_sig_sim: f64,
    /// Signature tie-break controls.
    pub min_sig_sim_gap: f64,
    /// Anchor-content tie-break controls.
    pub enable_anchor_tiebreak: bool,
    /// Anchor-content tie-break controls.
    pub min_anchor_sim: f64,
    /// Anchor-content tie-break controls.
    pub min_anchor_sim_gap: f64,
    /// Entity-coverage resolution controls.
    pub enable_entity_resolve: bool,
    /// Entity-coverage resolution controls.
    pub require_full_entity_coverage: bool,
    /// Out-of-domain gate settings.
    pub ood: OodConfig,
    /// Coverage gate settings.
    pub coverage: CoverageConfig,
    /// Ambiguity-resolution settings.
    pub ambiguity: AmbiguityConfig,
}

impl PipelineConfig {
    /// Loads a single TOML document as the complete configuration.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let raw = RawPipelineConfig::from_toml_str(toml)?;
        Self::from_raw(raw)
    }

    /// Loads a base TOML document and an optional override, merged with the
    /// override taking precedence key by key.
    pub fn load(base_toml: &str, override_toml: Option<&str>) -> Result<Self, ConfigError> {
        let base = RawPipelineConfig::from_toml_str(base_toml)?;
        let raw = match override_toml {
            Some(over) => resolve::merge(base, RawPipelineConfig::from_toml_str(over)?),
            None => base,
        };
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawPipelineConfig) -> Result<Self, ConfigError> {
        validate::validate_thresholds(&raw)?;

        let ood_raw = raw.ood.clone().unwrap_or_default();
        let coverage_raw = raw.coverage.clone().unwrap_or_default();
        let ambiguity_raw = raw.ambiguity.clone().unwrap_or_default();

        Ok(Self {
            fetch_k: raw.fetch_k(),
            final_k: raw.final_k(),
            min_keep: raw.min_keep(),
            max_l2: raw.max_l2(),
            soft_max_l2: raw.soft_max_l2,
            min_gap: raw.min_gap(),
            min_group_gap: raw.min_group_gap(),
            max_options: raw.max_options(),
            strict_sig: raw.strict_sig.unwrap_or(false),
            enable_sig_tiebreak: raw.enable_sig_tiebreak.unwrap_or(true),
            min_sig_sim: raw.min_sig_sim(),
            min_sig_sim_gap: raw.min_sig_sim_gap(),
            enable_anchor_tiebreak: raw.enable_anchor_tiebreak.unwrap_or(true),
            min_anchor_sim: raw.min_anchor_sim(),
            min_anchor_sim_gap: raw.min_anchor_sim_gap(),
            enable_entity_resolve: raw.enable_entity_resolve.unwrap_or(true),
            require_full_entity_coverage: raw.require_full_entity_coverage.unwrap_or(false),
            ood: OodConfig {
                enabled: ood_raw.enabled.unwrap_or(true),
                allow_patterns: PatternList::compile(&ood_raw.allow_patterns)?,
                deny_patterns: PatternList::compile(&ood_raw.deny_patterns)?,
            },
            coverage: CoverageConfig {
                enabled: coverage_raw.enabled.unwrap_or(true),
                compare_markers: PatternList::compile(&coverage_raw.compare_markers)?,
                generic_markers: PatternList::compile(&coverage_raw.generic_markers)?,
                entity_aliases: EntityAliases::compile(&coverage_raw.entity_aliases)?,
            },
            ambiguity: AmbiguityConfig {
                keep_ambiguous_for_generic_queries: ambiguity_raw
                    .keep_ambiguous_for_generic_queries
                    .unwrap_or(true),
                generic_query_patterns: PatternList::compile(
                    &ambiguity_raw.generic_query_patterns,
                )?,
                facet_query_patterns: PatternList::compile(&ambiguity_raw.facet_query_patterns)?,
            },
        })
    }

    /// Computes the effective retrieval fan-out:
    /// `max(fetch_k, final_k + 2*max_options + 2)`.
    pub fn effective_fetch_k(&self) -> usize {
        self.fetch_k
            .max(self.final_k + 2 * self.max_options + 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_when_empty() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config.fetch_k, DEFAULT_FETCH_K);
        assert_eq!(config.final_k, DEFAULT_FINAL_K);
        assert!(config.ood.enabled);
        assert!(config.ood.deny_patterns.is_empty());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let toml = r#"
            fetch_k = 30
            final_k = 6

            [ood]
            enabled = true
            deny_patterns = ["weather"]
        "#;
        let config = PipelineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.fetch_k, 30);
        assert_eq!(config.final_k, 6);
        assert!(config.ood.deny_patterns.matches_any("What is the weather?"));
    }

    #[test]
    fn invalid_regex_fails_at_load_time() {
        let toml = r#"
            [ood]
            deny_patterns = ["(unclosed"]
        "#;
        let err = PipelineConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn invalid_threshold_fails_at_load_time() {
        let toml = "fetch_k = 2\nmin_keep = 10\n";
        let err = PipelineConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn load_merges_base_and_override() {
        let base = "fetch_k = 20\nfinal_k = 4\n";
        let over = "final_k = 8\n";
        let config = PipelineConfig::load(base, Some(over)).unwrap();
        assert_eq!(config.fetch_k, 20);
        assert_eq!(config.final_k, 8);
    }

    #[test]
    fn effective_fetch_k_guarantees_retrieval_headroom() {
        let toml = "fetch_k = 5\nfinal_k = 4\nmax_options = 3\n";
        let config = PipelineConfig::from_toml_str(toml).unwrap();
        // final_k + 2*max_options + 2 = 4 + 6 + 2 = 12 > configured fetch_k of 5
        assert_eq!(config.effective_fetch_k(), 12);
    }

    #[test]
    fn entity_aliases_compile_from_toml_table() {
        let toml = r#"
            [coverage]
            [coverage.entity_aliases]
            mqtt = ["mqtt"]
            aws_iot_jobs = ["\\bjobs?\\b"]
        "#;
        let config = PipelineConfig::from_toml_str(toml).unwrap();
        let hits = config.coverage.entity_aliases.extract("AWS IoT Jobs");
        assert_eq!(hits, vec!["aws_iot_jobs"]);
    }
}
