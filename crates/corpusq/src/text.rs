//! Answer-text display helpers for the CLI.

/// Strips a trailing `Sources:` section from generated answer text before
/// display.
///
/// The answer generator itself is out of scope for this crate; a caller
/// that supplies answer text alongside an `Outcome`'s citations may
/// still have it end in a `Sources:` footer meant for a different renderer.
/// This trims everything from that header onward, matching each line
/// up to (but not including) a line consisting solely of `sources:`
/// (case-insensitive, surrounding whitespace ignored).
pub fn normalize_answer_for_cli(answer: &str) -> String {
    let mut kept = Vec::new();
    for line in answer.lines() {
        if is_sources_header(line) {
            break;
        }
        kept.push(line.trim_end());
    }
    kept.join("\n").trim().to_string()
}

fn is_sources_header(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed
        .strip_suffix(':')
        .is_some_and(|head| head.eq_ignore_ascii_case("sources"))
}
