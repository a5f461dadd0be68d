//! Page-level text acquisition. PDF documents are handed to poppler's
//! `pdftotext`; anything else is taken to be text already extracted in the
//! same shape, pages terminated by form feeds.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::language::LoadingError;

const FORM_FEED: char = '\u{000C}';

/// Split extracted text into pages. A form feed ends each page; text after
/// the last form feed, if any, is a final page.
pub fn split(text: &str) -> Vec<&str> {
    let mut pages: Vec<&str> = text
        .split(FORM_FEED)
        .collect();

    if pages
        .last()
        .map_or(false, |page| page.is_empty())
    {
        pages.pop();
    }
    pages
}

/// Concatenate the pages `first` through `last` inclusive, counting from 1.
pub fn select<'i>(
    filename: &'i Path,
    text: &str,
    first: usize,
    last: usize,
) -> Result<String, LoadingError<'i>> {
    let pages = split(text);

    if last > pages.len() {
        return Err(LoadingError {
            problem: "Page out of range".to_string(),
            details: format!("document has {} pages, asked for {}", pages.len(), last),
            filename,
        });
    }

    Ok(pages[first - 1..last].concat())
}

/// Run `pdftotext` over the given page range, preserving the physical
/// layout since the scanners depend on indentation.
pub fn from_pdf<'i>(filename: &'i Path, first: usize, last: usize) -> Result<String, LoadingError<'i>> {
    info!("Extracting pages {} to {} of {}", first, last, filename.display());

    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-f")
        .arg(first.to_string())
        .arg("-l")
        .arg(last.to_string())
        .arg(filename)
        .arg("-")
        .stdin(Stdio::null())
        .output()
        .map_err(|error| {
            debug!(?error);
            LoadingError {
                problem: "Unable to run pdftotext".to_string(),
                details: error
                    .kind()
                    .to_string(),
                filename,
            }
        })?;

    debug!("Process status: {:?}", output.status);

    if !output
        .status
        .success()
    {
        return Err(LoadingError {
            problem: "Failed extracting text".to_string(),
            details: String::from_utf8_lossy(&output.stderr)
                .trim()
                .to_string(),
            filename,
        });
    }

    let text = String::from_utf8_lossy(&output.stdout);
    Ok(split(&text).concat())
}
