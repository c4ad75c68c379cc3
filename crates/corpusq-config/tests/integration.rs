//! Integration tests for the resolve -> validate -> compile pipeline.

#![allow(clippy::tests_outside_test_module)]

use std::fs;

use corpusq_config::{ConfigError, PipelineConfig};

fn write_toml(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_layered_config_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = write_toml(
        &dir,
        "base.toml",
        r#"
            fetch_k = 20
            final_k = 4

            [ood]
            deny_patterns = ["weather"]
            allow_patterns = ["mqtt", "aws"]
        "#,
    );
    let override_path = write_toml(&dir, "override.toml", "final_k = 6\n");

    let base = fs::read_to_string(&base_path).unwrap();
    let over = fs::read_to_string(&override_path).unwrap();
    let config = PipelineConfig::load(&base, Some(&over)).unwrap();

    assert_eq!(config.fetch_k, 20);
    assert_eq!(config.final_k, 6);
    assert!(config.ood.deny_patterns.matches_any("weather forecast"));
    assert!(config.ood.allow_patterns.matches_any("MQTT broker"));
}

#[test]
fn missing_override_keeps_base_values() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = write_toml(&dir, "base.toml", "fetch_k = 15\n");
    let base = fs::read_to_string(&base_path).unwrap();

    let config = PipelineConfig::load(&base, None).unwrap();
    assert_eq!(config.fetch_k, 15);
    assert_eq!(config.final_k, corpusq_config::DEFAULT_FINAL_K);
}

#[test]
fn malformed_toml_is_rejected_at_load_time() {
    let err = PipelineConfig::from_toml_str("fetch_k = [").unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml(_)));
}

#[test]
fn full_corpus_style_config_compiles() {
    let toml = r#"
        fetch_k = 20
        final_k = 4
        min_keep = 1
        max_l2 = 0.45
        soft_max_l2 = 0.55
        min_gap = 0.05
        min_group_gap = 0.08
        max_options = 3
        strict_sig = false
        enable_sig_tiebreak = true
        min_sig_sim = 0.6
        min_sig_sim_gap = 0.05
        enable_anchor_tiebreak = true
        min_anchor_sim = 0.6
        min_anchor_sim_gap = 0.05
        enable_entity_resolve = true
        require_full_entity_coverage = false

        [ood]
        enabled = true
        deny_patterns = ["weather", "sports"]
        allow_patterns = ["mqtt", "aws iot", "kafka"]

        [coverage]
        enabled = true
        compare_markers = ["\\bvs\\b", "compared to"]
        generic_markers = ["overview", "overall"]

        [coverage.entity_aliases]
        mqtt = ["\\bmqtt\\b"]
        kafka = ["\\bkafka\\b"]
        aws_iot_jobs = ["(?=.*\\bjob\\b)(?=.*\\baws\\b)"]

        [ambiguity]
        keep_ambiguous_for_generic_queries = true
        generic_query_patterns = ["overall", "what is", "how to"]
        facet_query_patterns = ["v\\d+\\.\\d+", "\\brole\\b"]
    "#;

    let config = PipelineConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.max_options, 3);
    assert!(config.coverage.compare_markers.matches_any("MQTT vs Kafka"));
    assert_eq!(
        config.coverage.entity_aliases.extract("MQTT vs Kafka"),
        vec!["kafka", "mqtt"]
    );
    assert!(
        config
            .ambiguity
            .facet_query_patterns
            .matches_any("What changed in v3.1.1?")
    );
}
