//! Implementation of `corpusq select`.

use std::process::ExitCode;

use corpusq_pipeline::Orchestrator;
use corpusq_types::CancellationToken;

use crate::cli::args::SelectCommand;
use crate::cli::{context::CommandContext, output, pending};

/// Resolves a prior ambiguous query by applying the caller's chosen option.
pub fn run(cmd: &SelectCommand) -> ExitCode {
    let query = cmd.query.join(" ");
    let cwd = std::env::current_dir().unwrap_or_default();

    let options = match pending::load(&cwd, &query) {
        Some(options) => options,
        None => {
            eprintln!(
                "error: no pending ambiguous query matches {query:?}; run `ask` first"
            );
            return ExitCode::FAILURE;
        }
    };

    let ctx = match CommandContext::load(&cmd.backend) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let orchestrator = Orchestrator::new(&ctx.store, &ctx.embedder, &ctx.cache, &ctx.config);
    let cancel = CancellationToken::new();
    let outcome = orchestrator.invoke_with_selection(&query, cmd.option, options, &cancel);

    pending::clear(&cwd);
    output::print_outcome(&outcome, cmd.backend.json);

    match outcome.status {
        corpusq_types::Status::Refuse => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
