//! The mutable snapshot threaded through pipeline stages, and the
//! user-visible value derived from it.

use serde::Serialize;

use crate::document::Document;
use crate::option::RetrievalOption;

/// Terminal classification of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// A grounded answer with cited sources is available.
    Ok,
    /// The query was refused; see the accompanying reason.
    Refuse,
    /// The pipeline found multiple disjoint interpretations; the caller must
    /// disambiguate.
    Ambiguous,
}

/// The snapshot threaded through every pipeline stage.
///
/// Each stage is a total function on `State`: it either passes the value
/// through unchanged or mutates it to set a non-`ok` status. No stage may
/// make `status` worse after it has become `Refuse`.
#[derive(Debug, Clone)]
pub struct State {
    /// The query, trimmed. Never mutated after construction.
    pub input: String,
    /// The current cited set; empty unless `status == Ok`.
    pub docs: Vec<Document>,
    /// Set once a stage reaches a terminal or provisional classification.
    pub status: Option<Status>,
    /// Machine-readable refusal reason; set only when `status == Refuse`.
    pub refusal_reason: Option<String>,
    /// Candidate interpretations; non-empty only when `status == Ambiguous`.
    pub options: Vec<RetrievalOption>,
    /// Set by the caller on the second `Invoke` to choose among `options`.
    pub selected_option: Option<u32>,
    /// Short-circuit marker: true whenever `status` is not `Ok`, or once
    /// options have been presented.
    pub skip_llm: bool,
}

impl State {
    /// Constructs the initial state for a fresh query.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            docs: Vec::new(),
            status: None,
            refusal_reason: None,
            options: Vec::new(),
            selected_option: None,
            skip_llm: false,
        }
    }

    /// Constructs the state for the second `Invoke` call, where the caller
    /// selects among previously presented options.
    pub fn with_selection(
        input: impl Into<String>,
        selected_option: u32,
        options: Vec<RetrievalOption>,
    ) -> Self {
        Self {
            input: input.into(),
            docs: Vec::new(),
            status: None,
            refusal_reason: None,
            options,
            selected_option: Some(selected_option),
            skip_llm: false,
        }
    }

    /// Transitions to `Ok` with the given cited documents, clearing any
    /// stale refusal reason or options.
    pub fn into_ok(mut self, docs: Vec<Document>) -> Self {
        self.docs = docs;
        self.status = Some(Status::Ok);
        self.options = Vec::new();
        self.selected_option = None;
        self.refusal_reason = None;
        self.skip_llm = false;
        self
    }

    /// Transitions to `Refuse` with a reason. Once a state is refused, later
    /// stages must not call this with a "better" status.
    pub fn into_refuse(mut self, reason: impl Into<String>) -> Self {
        self.docs = Vec::new();
        self.status = Some(Status::Refuse);
        self.options = Vec::new();
        self.refusal_reason = Some(reason.into());
        self.skip_llm = true;
        self
    }

    /// Transitions to `Ambiguous` with candidate options.
    pub fn into_ambiguous(mut self, options: Vec<RetrievalOption>) -> Self {
        self.docs = Vec::new();
        self.status = Some(Status::Ambiguous);
        self.options = options;
        self.refusal_reason = None;
        self.skip_llm = true;
        self
    }

    /// True once `status` is anything other than `Ok`, matching the
    /// `skip_llm` contract.
    pub fn is_terminal_non_ok(&self) -> bool {
        !matches!(self.status, None | Some(Status::Ok))
    }
}

/// The final, user-visible value derived from a terminal `State`.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// The original query.
    pub input: String,
    /// Terminal classification.
    pub status: Status,
    /// Cited documents when `status == Ok`; empty otherwise.
    pub source_documents: Vec<crate::document::SourceRef>,
    /// Generated answer text, populated by the caller's LLM step above this
    /// crate; `None` within the pipeline itself.
    pub answer: Option<String>,
    /// Present when `status == Refuse`.
    pub refusal_reason: Option<String>,
    /// Present when `status == Ambiguous`.
    pub options: Option<Vec<RetrievalOption>>,
    /// Echoes the caller's selection on the second `Invoke`, if any.
    pub selected_option: Option<u32>,
}

impl Outcome {
    /// Derives the outcome from a terminal state. Panics if `state.status`
    /// is `None`; the orchestrator guarantees every returned state has a
    /// status set before this is called.
    pub fn from_state(state: &State) -> Self {
        let status = state.status.expect("state must be terminal");
        Self {
            input: state.input.clone(),
            status,
            source_documents: crate::document::collect_sources(&state.docs),
            answer: None,
            refusal_reason: state.refusal_reason.clone(),
            options: if state.options.is_empty() {
                None
            } else {
                Some(state.options.clone())
            },
            selected_option: state.selected_option,
        }
    }
}
