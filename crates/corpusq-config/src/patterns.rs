//! Compiled regex pattern lists.
//!
//! All lists here are compiled once, case-insensitively, with
//! [`fancy_regex::Regex`] rather than the `regex` crate because curated
//! patterns in practice use lookaheads (e.g. `(?=.*\bjob\b)`), which `regex`
//! cannot express.

use std::collections::HashMap;

use fancy_regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// An ordered list of compiled, case-insensitive patterns.
///
/// Used for `deny_patterns`/`allow_patterns`, `compare_markers`/
/// `generic_markers`, and `generic_query_patterns`/`facet_query_patterns`.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<Regex>,
}

impl PatternList {
    /// Compiles a list of pattern strings, case-insensitively.
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        let compiled = patterns
            .iter()
            .map(|p| compile_one(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns: compiled })
    }

    /// True if `text` matches any pattern in this list.
    pub fn matches_any(&self, text: &str) -> bool {
        self.patterns
            .iter()
            .any(|re| re.is_match(text).unwrap_or(false))
    }

    /// True if this list has no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Compiled alias patterns keyed by canonical entity name.
///
/// A query matches an entity when any of that entity's alias patterns
/// matches the query text; extraction returns the set of canonical keys
/// with at least one match.
#[derive(Debug, Clone, Default)]
pub struct EntityAliases {
    aliases: HashMap<String, PatternList>,
}

impl EntityAliases {
    /// Compiles a map of canonical entity name to alias pattern strings.
    pub fn compile(raw: &HashMap<String, Vec<String>>) -> Result<Self, ConfigError> {
        let aliases = raw
            .iter()
            .map(|(entity, patterns)| Ok((entity.clone(), PatternList::compile(patterns)?)))
            .collect::<Result<HashMap<_, _>, ConfigError>>()?;
        Ok(Self { aliases })
    }

    /// Returns the canonical entity keys whose alias patterns match `text`,
    /// in a stable (sorted) order.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut hits: Vec<String> = self
            .aliases
            .iter()
            .filter(|(_, patterns)| patterns.matches_any(text))
            .map(|(entity, _)| entity.clone())
            .collect();
        hits.sort();
        hits
    }
}

fn compile_one(pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
