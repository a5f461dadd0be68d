//! Extraction of register descriptions from reference manual text

use std::path::Path;
use tracing::debug;

use crate::language::{LoadingError, Register};

mod cursor;
pub mod pages;
pub mod parser;

pub use cursor::Cursor;
pub use parser::{ParsingError, Parser};

/// Acquire the text of pages `first` through `last` (inclusive, counting
/// from 1) of the given document, concatenated in page order. We pass
/// ownership back to the caller so that the registers extracted from it
/// can borrow from the one String.
pub fn load(filename: &Path, first: usize, last: usize) -> Result<String, LoadingError<'_>> {
    if first == 0 || last < first {
        return Err(LoadingError {
            problem: "Invalid page range".to_string(),
            details: format!("{} to {}", first, last),
            filename,
        });
    }

    let is_pdf = filename
        .extension()
        .and_then(|s| s.to_str())
        .map_or(false, |s| s.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        return pages::from_pdf(filename, first, last);
    }

    match std::fs::read_to_string(filename) {
        Ok(content) => pages::select(filename, &content, first, last),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Recover the registers described in the given text.
pub fn extract<'i>(parser: &Parser, content: &'i str) -> Result<Vec<Register<'i>>, ParsingError> {
    debug!("text from document: {}", content);

    let result = parser.parse_document(content);

    match result {
        Ok(registers) => {
            debug!(
                "Found {} register{}",
                registers.len(),
                if registers.len() == 1 { "" } else { "s" }
            );
            Ok(registers)
        }
        Err(error) => {
            debug!("error: {}", error.message());
            Err(error)
        }
    }
}
