//! The pipeline's exhaustive error kind.

use thiserror::Error;

/// Everything a pipeline stage can fail or refuse with.
///
/// No variant crosses the `Orchestrator::invoke` boundary as a raw error:
/// every one maps to a `Refuse` outcome via
/// [`PipelineError::refusal_reason`], including backend failures and
/// internal bugs, so callers only ever observe a terminal [`crate::Outcome`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The query's embedding has no nearby neighbor within the configured
    /// distance budget, or matched no recognized entity/vocabulary.
    #[error("Out of domain")]
    OutOfDomain,

    /// The query was empty or contained only whitespace.
    #[error("Out of domain")]
    EmptyQuery,

    /// Candidates were retrieved but none passed the post-retrieval
    /// relevance gates.
    #[error("Insufficient relevance")]
    InsufficientRelevance,

    /// The query resolved to more than one disjoint interpretation; see the
    /// accompanying options on the returned state rather than this error.
    #[error("Ambiguous query")]
    Ambiguous,

    /// Candidates covered only some of the entities the query asked about.
    #[error("Coverage missing for: {missing:?}")]
    CoverageMissing {
        /// Canonical entity keys the corpus has no coverage for.
        missing: Vec<String>,
    },

    /// The caller's `selected_option` on a follow-up call does not match
    /// any option from the preceding `Ambiguous` response.
    #[error("Invalid selection: option {option_id}")]
    InvalidSelection {
        /// The option id the caller supplied.
        option_id: u32,
    },

    /// The vector store or embedder returned an error.
    #[error("Backend failure: {message}")]
    BackendFailure {
        /// The backend's error message.
        message: String,
    },

    /// The query was cancelled via a [`crate::interfaces::CancellationToken`]
    /// before it reached a terminal state.
    #[error("Cancelled")]
    Cancelled,

    /// A pipeline invariant was violated; always a bug, never a user-facing
    /// refusal.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// The machine-readable refusal reason text shown to a caller.
    pub fn refusal_reason(&self) -> String {
        match self {
            Self::OutOfDomain | Self::EmptyQuery => "Out of domain".to_string(),
            Self::InsufficientRelevance => "Insufficient relevance".to_string(),
            Self::Ambiguous => "Ambiguous query".to_string(),
            Self::CoverageMissing { missing } => {
                format!("Coverage missing for: {}", missing.join(", "))
            }
            Self::InvalidSelection { option_id } => {
                format!("Invalid selection: option {option_id}")
            }
            Self::Cancelled => "Cancelled".to_string(),
            Self::BackendFailure { message } => format!("Backend error: {message}"),
            Self::Internal(_) => "Internal error".to_string(),
        }
    }
}
