//! Line commands typed by the operator.

use dashboard_core::Msg;

pub const HELP: &str = "commands: scrape | drop | refresh | query <text> | search [<text>] | quit";

/// Translates one input line into messages.
///
/// The search text is kept exactly as typed after the command word and its
/// separating space.
pub fn parse_line(line: &str) -> Result<Vec<Msg>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (command, argument) = match line.split_once(' ') {
        Some((command, argument)) => (command, Some(argument)),
        None => (line, None),
    };

    let msgs = match (command, argument) {
        ("", None) => Vec::new(),
        ("scrape", None) => vec![Msg::ScrapeClicked],
        ("drop", None) => vec![Msg::DropClicked],
        ("refresh", None) => vec![Msg::RefreshClicked],
        ("query", Some(text)) => vec![Msg::QueryChanged(text.to_string())],
        ("query", None) => vec![Msg::QueryChanged(String::new())],
        ("search", Some(text)) => vec![Msg::QueryChanged(text.to_string()), Msg::SearchSubmitted],
        ("search", None) => vec![Msg::SearchSubmitted],
        ("quit" | "exit", None) => vec![Msg::Closed],
        _ => return Err(format!("unknown command {line:?}; {HELP}")),
    };
    Ok(msgs)
}
