//! Subcommand implementations for the `corpusq` binary.

pub mod ask;
pub mod select;
