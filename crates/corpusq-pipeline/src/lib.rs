//! The retrieval orchestration pipeline: out-of-domain gating, distance and
//! density gates, tag-signature clustering, cascading ambiguity resolution,
//! post-retrieval coverage checking, entity top-up, and option
//! presentation, composed by a single [`Orchestrator`].
//!
//! Every stage is a pure function; [`Orchestrator`] is the only type that
//! owns the caller-supplied backends ([`corpusq_types::VectorStore`],
//! [`corpusq_types::Embedder`]) and threads a [`corpusq_types::State`]
//! through them.

#![warn(missing_docs)]

mod ambiguity;
mod augment;
mod cluster;
mod coverage;
mod gate;
mod ood;
mod orchestrator;
mod present;
mod retriever;

pub use cluster::Bucket;
pub use orchestrator::Orchestrator;
