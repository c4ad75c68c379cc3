//! Generic/facet query classification.

use corpusq_config::AmbiguityConfig;

/// True if `query` matches a configured generic/overview marker and does
/// *not* match any facet marker.
///
/// A query naming a specific state, version, or role is never treated as a
/// broad overview even if it also happens to contain a generic word like
/// "what is".
pub fn is_generic_query(query: &str, config: &AmbiguityConfig) -> bool {
    config.generic_query_patterns.matches_any(query) && !is_facet_query(query, config)
}

/// True if `query` matches a configured facet marker (specific version,
/// state, or role name).
pub fn is_facet_query(query: &str, config: &AmbiguityConfig) -> bool {
    config.facet_query_patterns.matches_any(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpusq_config::PatternList;

    fn config() -> AmbiguityConfig {
        AmbiguityConfig {
            keep_ambiguous_for_generic_queries: true,
            generic_query_patterns: PatternList::compile(&[
                "overall".to_string(),
                "what is".to_string(),
                "how to".to_string(),
            ])
            .unwrap(),
            facet_query_patterns: PatternList::compile(&[
                r"v\d+\.\d+".to_string(),
                r"\brole\b".to_string(),
            ])
            .unwrap(),
        }
    }

    #[test]
    fn generic_marker_without_facet_is_generic() {
        assert!(is_generic_query("What is MQTT?", &config()));
    }

    #[test]
    fn facet_marker_overrides_generic_marker() {
        assert!(!is_generic_query("What is new in v3.1.1?", &config()));
        assert!(is_facet_query("What is new in v3.1.1?", &config()));
    }

    #[test]
    fn neither_marker_is_not_generic() {
        assert!(!is_generic_query("MQTT QoS levels", &config()));
    }
}
