use owo_colors::OwoColorize;
use std::path::Path;
use trm2devregs::{devregs::DataError, language::LoadingError, parsing::ParsingError};

use super::messages::generate_error_message;

/// Line and column of a byte offset, both counting from 1. Columns count
/// characters, since manual text is full of en dashes and other
/// multi-byte punctuation.
#[derive(Debug, PartialEq, Eq)]
struct Location {
    line: usize,
    column: usize,
}

fn locate(source: &str, offset: usize) -> Location {
    let offset = offset.min(source.len());
    let before = source
        .get(..offset)
        .unwrap_or(source);

    let start = before
        .rfind('\n')
        .map_or(0, |i| i + 1);

    Location {
        line: before
            .matches('\n')
            .count()
            + 1,
        column: before[start..]
            .chars()
            .count()
            + 1,
    }
}

/// Describe an extraction failure: where in the extracted text the scanner
/// gave up, the line before it for context (usually the bit range whose
/// name went missing), and an explanation. Lines count within the text of
/// the requested pages, not within the whole document.
pub fn full_parsing_error(error: &ParsingError, filename: &Path, source: &str) -> String {
    let (problem, details) = generate_error_message(error);
    let here = locate(source, error.offset());

    let gutter = here
        .line
        .to_string()
        .len()
        .max(3);

    let mut excerpt = String::new();
    let lines: Vec<&str> = source
        .lines()
        .collect();

    if here.line >= 2 {
        if let Some(previous) = lines.get(here.line - 2) {
            excerpt.push_str(&format!(
                "{:>gutter$} {} {}\n",
                (here.line - 1).bright_blue(),
                '|'.bright_blue(),
                previous
            ));
        }
    }
    excerpt.push_str(&format!(
        "{:>gutter$} {} {}\n",
        here.line.bright_blue(),
        '|'.bright_blue(),
        lines
            .get(here.line - 1)
            .copied()
            .unwrap_or("")
    ));
    excerpt.push_str(&format!(
        "{:>gutter$} {} {:>column$}",
        "",
        '|'.bright_blue(),
        '^'.bright_red(),
        column = here.column
    ));

    format!(
        "{}: {}:{}:{} {}\n\n{}\n\n{}",
        "error".bright_red(),
        filename.display(),
        here.line,
        here.column,
        problem.bold(),
        excerpt,
        details
    )
}

/// One line: the file and what went wrong reading it.
pub fn concise_loading_error(error: &LoadingError<'_>) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .to_string()
            .bold()
    )
}

/// Format a problem found in a devregs file
pub fn data_error(error: &DataError, filename: &Path) -> String {
    format!(
        "{}: {}:{} {}",
        "error".bright_red(),
        filename.display(),
        error.line(),
        error
            .message()
            .bold()
    )
}
