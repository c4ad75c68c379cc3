//! Command-line interface for the `corpusq` retrieval orchestration demo.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use cli::args::{Cli, Commands};
use cli::commands;

fn main() -> ExitCode {
    corpusq::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Ask(cmd) => commands::ask::run(&cmd),
        Commands::Select(cmd) => commands::select::run(&cmd),
    }
}
