//! Query-side analysis the retrieval pipeline runs before and during
//! ambiguity resolution: entity extraction, generic/facet classification,
//! and the cosine-similarity machinery behind the signature and
//! anchor-content tie-breaks.
//!
//! This crate has no notion of `State` or pipeline stages; it is a library
//! of pure functions `corpusq-pipeline` composes.

#![warn(missing_docs)]

mod classify;
mod entity;
mod similarity;

pub use classify::{is_facet_query, is_generic_query};
pub use entity::extract_query_entities;
pub use similarity::{accept_top, cosine_similarity, rank_by_cosine, RankedCandidate};
