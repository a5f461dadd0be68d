//! Scanners recovering register descriptions from the plain text of a
//! reference manual.
//!
//! The text is cut into chapters, one per register. Each chapter is then
//! consumed left to right by a single [`Cursor`]: register name, address,
//! the heading of the field table, and then alternating bit ranges and
//! field names until no more bit ranges are found.

use regex::{Captures, Regex};
use tracing::debug;

use crate::language::*;
use crate::parsing::cursor::Cursor;

/// Separator between the high and low bit of a range as typeset in the
/// manuals, U+2013 EN DASH. A plain hyphen-minus is accepted as well.
pub const EN_DASH: char = '\u{2013}';

/// Footer line printed on every page by the vendor whose manuals are being
/// read; it is part of the boilerplate repeated when a table breaks across
/// pages.
pub const DEFAULT_FOOTER: &str = r"NXP\s+Semiconductors";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    MissingFieldTable(usize),
    MissingFieldName(usize),
    InvalidBitNumber(usize, String),
}

impl ParsingError {
    pub fn offset(&self) -> usize {
        match self {
            ParsingError::MissingFieldTable(offset) => *offset,
            ParsingError::MissingFieldName(offset) => *offset,
            ParsingError::InvalidBitNumber(offset, _) => *offset,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::MissingFieldTable(_) => "no field description table found".to_string(),
            ParsingError::MissingFieldName(_) => "cannot find field name".to_string(),
            ParsingError::InvalidBitNumber(_, value) => format!("invalid bit number '{}'", value),
        }
    }
}

/// Outcome of scanning one chapter.
#[derive(Debug, PartialEq, Eq)]
pub enum Scan<'i> {
    Register(Register<'i>),
    /// The chapter has no parenthesized register name. This is taken to
    /// mean the register section of the document is over, and nothing
    /// after it is read. It is indistinguishable from truncated input.
    EndOfRegisters,
}

/// What stands in the name column of a field table row.
#[derive(Debug, PartialEq, Eq)]
pub enum FieldName {
    Named(String),
    Reserved,
}

/// A run of Document Text describing one register, along with where in
/// the Document Text it begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chapter<'i> {
    pub offset: usize,
    pub text: &'i str,
}

/// Cut the document at every section number ("1.2.3.4 "). The numbers
/// themselves are dropped, as is everything before the first one.
pub fn split_chapters(document: &str) -> Vec<Chapter<'_>> {
    let re = crate::regex!(r"\d+\.\d+\.\d+\.\d+\s+");

    let mut chapters = Vec::new();
    let mut markers = re
        .find_iter(document)
        .peekable();

    while let Some(marker) = markers.next() {
        let end = markers
            .peek()
            .map_or(document.len(), |next| next.start());
        chapters.push(Chapter {
            offset: marker.end(),
            text: &document[marker.end()..end],
        });
    }

    chapters
}

#[derive(Debug)]
pub struct Parser {
    page_break: Regex,
}

impl Parser {
    pub fn new() -> Parser {
        Parser::with_footer(DEFAULT_FOOTER).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Build a parser recognizing the given vendor footer (a regular
    /// expression matched within one line) in page-break boilerplate.
    pub fn with_footer(footer: &str) -> Result<Parser, regex::Error> {
        let pattern = format!(
            r"\A(?:\s{{14,}}.*\n)?\s{{20,}}Table\s+continues\s+on\s+the\s+next\s+page.*\n\s{{20,}}.*\n.*(?:{}).*\n.*\n.*continued.*\n.*Field\s+Description",
            footer
        );
        let page_break = Regex::new(&pattern)?;
        Ok(Parser { page_break })
    }

    /// Scan chapters in document order until the text runs out or a
    /// chapter without a register name is reached.
    pub fn parse_document<'i>(&self, document: &'i str) -> Result<Vec<Register<'i>>, ParsingError> {
        let mut registers = Vec::new();

        for chapter in split_chapters(document) {
            match self.read_chapter(chapter)? {
                Scan::Register(register) => registers.push(register),
                Scan::EndOfRegisters => {
                    debug!(offset = chapter.offset, "no register name, end of registers");
                    break;
                }
            }
        }

        Ok(registers)
    }

    pub fn read_chapter<'i>(&self, chapter: Chapter<'i>) -> Result<Scan<'i>, ParsingError> {
        debug!("->chapter: {}", chapter.text);

        let mut cursor = Cursor::new(chapter.text);

        let name = match read_register_name(&mut cursor) {
            Some(name) => name,
            None => return Ok(Scan::EndOfRegisters),
        };
        debug!("register name: {}", name);

        let address = read_address(&mut cursor);
        debug!("address: {}", address);

        let fields = self.read_field_table(&mut cursor, chapter.offset)?;

        Ok(Scan::Register(Register {
            name,
            address,
            fields,
        }))
    }

    fn read_field_table(&self, cursor: &mut Cursor<'_>, base: usize) -> Result<Vec<Field>, ParsingError> {
        let heading = crate::regex!(r"(?s)Reset.*?[01].*?Field\s+Description");
        if cursor
            .search(heading)
            .is_none()
        {
            return Err(ParsingError::MissingFieldTable(base + cursor.position()));
        }

        let mut fields = Vec::new();
        let mut last = None;

        loop {
            if self.skip_page_break(cursor) {
                debug!("pagebreak");
            }

            let bits = match read_bit_range(cursor, base)? {
                Some(bits) => bits,
                None => break,
            };
            debug!("field: {}", bits);
            last = Some(bits);

            let name = self
                .read_field_name(cursor, true)
                .ok_or(ParsingError::MissingFieldName(base + cursor.position()))?;

            fields.push(match name {
                FieldName::Named(name) => Field {
                    name: Some(name),
                    bits,
                },
                FieldName::Reserved => Field { name: None, bits },
            });
        }

        // The lowest field of a table often has no bit number printed at
        // all; it runs from below the previous field down to bit 0.
        let bits = match last {
            Some(bits) if bits.low() == 0 => return Ok(fields),
            Some(bits) => BitRange::Span {
                high: bits.low() - 1,
                low: 0,
            },
            None => BitRange::Span { high: 31, low: 0 },
        };

        if let Some(FieldName::Named(name)) = self.read_field_name(cursor, false) {
            debug!("trailing field: {}", bits);
            fields.push(Field {
                name: Some(name),
                bits,
            });
        }

        Ok(fields)
    }

    /// Find the name belonging to the bit range just read. Long names are
    /// wrapped by the typesetter after an underscore and continue on the
    /// next name line; the pieces are joined back together. Returns None if
    /// there is no name line at all.
    ///
    /// With `inline` set the name may also follow on the same line as the
    /// cursor, as it does directly after a bit range.
    pub fn read_field_name(&self, cursor: &mut Cursor<'_>, inline: bool) -> Option<FieldName> {
        let same_line =
            crate::regex!(r"\A[ \t]{1,13}(?:(?P<reserved>-|Reserved)|(?P<word>\w+))");
        let next_line = crate::regex!(r"\n\s{0,13}(?:(?P<reserved>-|Reserved)|(?P<word>\w+))");

        let mut name = String::new();
        let mut inline = inline;

        loop {
            if self.skip_page_break(cursor) {
                debug!("pagebreak");
                inline = false;
            }

            let captures = if inline {
                cursor.anticipate_where(same_line, is_name)
            } else {
                None
            };
            let captures = captures.or_else(|| cursor.search_where(next_line, |_, c| is_name(c)))?;

            if captures
                .name("reserved")
                .is_some()
            {
                debug!("field: --Reserved--");
                return Some(FieldName::Reserved);
            }

            let word = captures
                .name("word")?
                .as_str();
            name.push_str(word);

            let rest = cursor.remaining();
            if word.ends_with('_')
                && rest.starts_with(char::is_whitespace)
                && !rest
                    .trim()
                    .is_empty()
            {
                debug!("fieldname_multi: {}", name);
                inline = false;
                continue;
            }

            debug!("fieldname_solo: {}", name);
            return Some(FieldName::Named(name));
        }
    }

    fn skip_page_break(&self, cursor: &mut Cursor<'_>) -> bool {
        cursor
            .anticipate(&self.page_break)
            .is_some()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

fn read_register_name<'i>(cursor: &mut Cursor<'i>) -> Option<&'i str> {
    let re = crate::regex!(r"(?s)\A.*?\((\w+)\)");

    cursor
        .anticipate(re)?
        .get(1)
        .map(|m| m.as_str())
}

fn read_address(cursor: &mut Cursor<'_>) -> Address {
    let re = crate::regex!(r"Address:[^\n]*?=\s*([[:xdigit:]]{4})_([[:xdigit:]]{4})h\b");

    cursor
        .search(re)
        .map_or(Address::Unresolved, |c| {
            Address::Resolved(format!("{}{}", &c[1], &c[2]))
        })
}

/// A bit number, or a high and low bit number, indented by 2 to 12 spaces
/// at the start of a line and followed by whitespace.
fn read_bit_range(cursor: &mut Cursor<'_>, base: usize) -> Result<Option<BitRange>, ParsingError> {
    let re = crate::regex!(r"\n\s{2,12}(?P<high>\d+)(?:[\x{2013}-](?P<low>\d+))?");

    let captures = match cursor.search_where(re, |text, c| {
        c.get(0)
            .map_or(false, |m| {
                text[m.end()..]
                    .chars()
                    .next()
                    .map_or(true, char::is_whitespace)
            })
    }) {
        Some(captures) => captures,
        None => return Ok(None),
    };

    let offset = base + cursor.last().start;
    let high = parse_bit(&captures, "high", offset)?;
    let bits = match captures.name("low") {
        Some(_) => BitRange::Span {
            high,
            low: parse_bit(&captures, "low", offset)?,
        },
        None => BitRange::Single(high),
    };

    Ok(Some(bits))
}

fn parse_bit(captures: &Captures<'_>, group: &str, offset: usize) -> Result<u32, ParsingError> {
    let text = captures
        .name(group)
        .map_or("", |m| m.as_str());

    text.parse::<u32>()
        .map_err(|_| ParsingError::InvalidBitNumber(offset, text.to_string()))
}

// Bare numbers are bit positions and "Field" is the column heading;
// neither can be a field name.
fn is_name(captures: &Captures<'_>) -> bool {
    match captures.name("word") {
        Some(word) => {
            let word = word.as_str();
            !word.starts_with(|c: char| c.is_numeric()) && !word.starts_with("Field")
        }
        None => true,
    }
}
