//! Forward-only position within one chapter's text.

use regex::{Captures, Regex};
use std::ops::Range;

/// The single piece of mutable state while scanning a chapter: where the
/// next search starts and the span of the last successful match. It only
/// ever moves forward; a failed attempt leaves it where it was.
#[derive(Debug, Clone)]
pub struct Cursor<'i> {
    text: &'i str,
    position: usize,
    last: Range<usize>,
}

impl<'i> Cursor<'i> {
    pub fn new(text: &'i str) -> Cursor<'i> {
        Cursor {
            text,
            position: 0,
            last: 0..0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn last(&self) -> Range<usize> {
        self.last
            .clone()
    }

    /// Text not yet consumed.
    pub fn remaining(&self) -> &'i str {
        &self.text[self.position..]
    }

    /// Find the first match at or after the current position and move past
    /// it. Line anchors in the pattern see the whole chapter, so `^` only
    /// matches at a true line start.
    pub fn search(&mut self, regex: &Regex) -> Option<Captures<'i>> {
        self.search_where(regex, |_, _| true)
    }

    /// As search(), but skip over candidate matches the predicate rejects.
    /// The predicate is given the chapter text and the candidate's
    /// captures, and stands in for the lookaround assertions the regex
    /// engine does not offer.
    pub fn search_where<P>(&mut self, regex: &Regex, predicate: P) -> Option<Captures<'i>>
    where
        P: Fn(&'i str, &Captures<'i>) -> bool,
    {
        let mut start = self.position;

        while start <= self
            .text
            .len()
        {
            let captures = regex.captures_at(self.text, start)?;
            let whole = captures.get(0)?;

            if predicate(self.text, &captures) {
                self.advance(whole.range());
                return Some(captures);
            }

            start = next_boundary(self.text, whole.start());
        }
        None
    }

    /// Match only if the pattern applies immediately at the current
    /// position. Patterns used here must begin with `\A`; they are run
    /// against the unconsumed remainder, and the captures are offset
    /// accordingly.
    pub fn anticipate(&mut self, regex: &Regex) -> Option<Captures<'i>> {
        self.anticipate_where(regex, |_| true)
    }

    /// As anticipate(), but only accept the match if the predicate does.
    pub fn anticipate_where<P>(&mut self, regex: &Regex, predicate: P) -> Option<Captures<'i>>
    where
        P: Fn(&Captures<'i>) -> bool,
    {
        let remaining = self.remaining();
        let captures = regex.captures(remaining)?;
        let whole = captures.get(0)?;

        if whole.start() != 0 || !predicate(&captures) {
            return None;
        }

        let base = self.position;
        self.advance(base + whole.start()..base + whole.end());
        Some(captures)
    }

    fn advance(&mut self, span: Range<usize>) {
        debug_assert!(span.start >= self.position);
        self.position = span.end;
        self.last = span;
    }
}

// The next char boundary strictly after `offset`, so a retried search never
// starts inside a multi-byte character.
fn next_boundary(text: &str, offset: usize) -> usize {
    text[offset..]
        .chars()
        .next()
        .map_or(offset + 1, |c| offset + c.len_utf8())
}
