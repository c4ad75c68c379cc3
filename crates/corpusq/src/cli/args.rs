//! Clap argument definitions for the `corpusq` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "corpusq")]
#[command(about = "Retrieval orchestration demo over a fixed documentation corpus")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared flags for locating the demo corpus and pipeline configuration.
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Path to a JSON corpus fixture (array of chunks with content/metadata).
    #[arg(long)]
    pub corpus: PathBuf,

    /// Path to a TOML pipeline configuration file. Defaults built in when absent.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit the outcome as JSON instead of a formatted table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `corpusq ask`.
#[derive(Args, Debug, Clone)]
pub struct AskCommand {
    /// The question to ask.
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Path to a file with pre-generated answer text to attach and display
    /// alongside citations (this crate does not call an LLM itself).
    #[arg(long)]
    pub answer: Option<PathBuf>,

    #[command(flatten)]
    /// Corpus/config/output flags.
    pub backend: BackendArgs,
}

/// Arguments for `corpusq select`.
#[derive(Args, Debug, Clone)]
pub struct SelectCommand {
    /// The original question, repeated verbatim (must match the prior `ask`).
    #[arg(required = true)]
    pub query: Vec<String>,

    /// The option id to choose, from the prior `ask`'s presented options.
    #[arg(long)]
    pub option: u32,

    #[command(flatten)]
    /// Corpus/config/output flags.
    pub backend: BackendArgs,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run a query through the pipeline.
    Ask(AskCommand),
    /// Resolve a prior ambiguous query by picking a presented option.
    Select(SelectCommand),
}
