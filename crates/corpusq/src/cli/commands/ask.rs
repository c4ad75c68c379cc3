//! Implementation of `corpusq ask`.

use std::process::ExitCode;

use corpusq_pipeline::Orchestrator;
use corpusq_types::{CancellationToken, Status};

use corpusq::normalize_answer_for_cli;

use crate::cli::args::AskCommand;
use crate::cli::{context::CommandContext, output, pending};

/// Runs a query through the pipeline and prints its outcome.
pub fn run(cmd: &AskCommand) -> ExitCode {
    let query = cmd.query.join(" ");
    let ctx = match CommandContext::load(&cmd.backend) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let answer_text = match &cmd.answer {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => Some(normalize_answer_for_cli(&text)),
            Err(err) => {
                eprintln!("error: failed to read answer file {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let orchestrator = Orchestrator::new(&ctx.store, &ctx.embedder, &ctx.cache, &ctx.config);
    let cancel = CancellationToken::new();
    let mut outcome = orchestrator.invoke(&query, &cancel);

    match outcome.status {
        Status::Ok => {
            outcome.answer = answer_text;
            pending::clear(&std::env::current_dir().unwrap_or_default());
        }
        Status::Ambiguous => {
            let options = outcome.options.clone().unwrap_or_default();
            if let Err(err) =
                pending::save(&std::env::current_dir().unwrap_or_default(), &query, &options)
            {
                eprintln!("warning: failed to save pending options: {err}");
            }
        }
        Status::Refuse => {
            pending::clear(&std::env::current_dir().unwrap_or_default());
        }
    }

    output::print_outcome(&outcome, cmd.backend.json);

    match outcome.status {
        Status::Refuse => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
