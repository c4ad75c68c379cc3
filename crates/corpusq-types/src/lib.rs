//! Core data model and external interfaces for the retrieval pipeline.
//!
//! This crate has no pipeline logic of its own: it defines the documents,
//! signatures, options, errors, and state the pipeline crate operates on,
//! plus the [`interfaces::VectorStore`]/[`interfaces::Embedder`] traits
//! callers implement against their own backends. Keeping these free of
//! pipeline control flow lets `corpusq-context` and `corpusq-pipeline`
//! depend on a single, stable vocabulary.

#![warn(missing_docs)]

mod cache;
mod document;
mod error;
mod interfaces;
mod option;
mod signature;
mod state;

pub use cache::EmbeddingCache;
pub use document::{
    collect_sources, Document, DocumentMetadata, PageLabel, ScoredDocument, SourceRef,
};
pub use error::PipelineError;
pub use interfaces::{CancellationToken, Embedder, EmbedderId, VectorStore};
pub use option::{deduplicate_options, RetrievalOption};
pub use signature::TagSignature;
pub use state::{Outcome, State, Status};
