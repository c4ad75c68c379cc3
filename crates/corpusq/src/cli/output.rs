//! Rendering an `Outcome` as a table or as JSON.

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use corpusq_types::{Outcome, Status};

/// Prints `outcome` either as JSON or as a formatted table, depending on
/// `json`. The answer text, when present, is normalized for display first.
pub fn print_outcome(outcome: &Outcome, json: bool) {
    if json {
        print_json(outcome);
    } else {
        print_table(outcome);
    }
}

fn print_json(outcome: &Outcome) {
    match serde_json::to_string_pretty(outcome) {
        Ok(json_str) => println!("{json_str}"),
        Err(err) => eprintln!("error: failed to serialize outcome: {err}"),
    }
}

fn print_table(outcome: &Outcome) {
    println!("Query:  {}", outcome.input);
    println!("Status: {}", status_label(outcome.status));
    println!();

    match outcome.status {
        Status::Ok => print_sources_table(outcome),
        Status::Refuse => {
            if let Some(reason) = &outcome.refusal_reason {
                println!("Refused: {reason}");
            }
        }
        Status::Ambiguous => {
            if let Some(options) = &outcome.options {
                print_options_table(options);
                println!();
                println!("Re-run with `select --option <id>` to choose an interpretation.");
            }
        }
    }
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Ok => "ok",
        Status::Refuse => "refuse",
        Status::Ambiguous => "ambiguous",
    }
}

fn print_sources_table(outcome: &Outcome) {
    if let Some(answer) = &outcome.answer {
        println!("{answer}");
        println!();
    }

    if outcome.source_documents.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Source", "Page"]);
    for source in &outcome.source_documents {
        table.add_row(vec![Cell::new(&source.filename), Cell::new(source.page)]);
    }
    println!("{table}");
}

fn print_options_table(options: &[corpusq_types::RetrievalOption]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Option", "Sources", "Best distance"]);
    for option in options {
        let sources = option
            .sources
            .iter()
            .map(|s| format!("{} (p. {})", s.filename, s.page))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(option.option_id.to_string()),
            Cell::new(sources),
            Cell::new(format!("{:.4}", option.best_distance)),
        ]);
    }
    println!("{table}");
}
