//! Query-side entity extraction.

use corpusq_config::EntityAliases;

/// Extracts the canonical entity keys a query names, via alias-pattern
/// matching. Returns an empty set for a query that names no configured
/// entity; callers distinguish "zero entities" from "no config" by simply
/// checking emptiness, matching the source's `EntityExtractor`.
pub fn extract_query_entities(query: &str, aliases: &EntityAliases) -> Vec<String> {
    aliases.extract(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn aliases() -> EntityAliases {
        let mut raw = HashMap::new();
        raw.insert("mqtt".to_string(), vec!["mqtt".to_string()]);
        raw.insert(
            "aws_iot_jobs".to_string(),
            vec![r"(?=.*\bjobs?\b)(?=.*\baws\b)".to_string()],
        );
        EntityAliases::compile(&raw).unwrap()
    }

    #[test]
    fn extracts_multiple_entities() {
        let hits = extract_query_entities("AWS IoT Jobs rollout timeout", &aliases());
        assert_eq!(hits, vec!["aws_iot_jobs"]);
    }

    #[test]
    fn no_match_returns_empty() {
        let hits = extract_query_entities("what is the weather today?", &aliases());
        assert!(hits.is_empty());
    }
}
