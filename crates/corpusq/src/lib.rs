//! corpusq: retrieval orchestration over a fixed technical-documentation
//! corpus.
//!
//! This crate has no pipeline logic of its own — `corpusq-pipeline::Orchestrator`
//! owns that — it is a thin facade plus a demo CLI binary: installing
//! structured logging, loading configuration, and wiring a caller's
//! [`corpusq_types::VectorStore`]/[`corpusq_types::Embedder`] pair into a
//! running [`corpusq_pipeline::Orchestrator`].

#![warn(missing_docs)]

pub mod demo_store;
mod text;

pub use corpusq_pipeline::Orchestrator;
pub use text::normalize_answer_for_cli;

/// Installs a `tracing-subscriber` formatter honoring `RUST_LOG`/`CORPUSQ_LOG`.
///
/// Mirrors the Python source's `DEBUG_CONFIG` toggle map: set
/// `CORPUSQ_LOG=corpusq_pipeline::gate=debug,corpusq_pipeline::ambiguity=trace`
/// to turn on a single stage's instrumentation without touching every other
/// target. Falls back to `info` for everything when unset. Safe to call more
/// than once; only the first call installs a subscriber.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_env("CORPUSQ_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
