//! Delimited table text: RFC 4180-style reading and writing.
//!
//! Only what the session table needs: comma delimiter, double-quote quoting
//! with doubled embedded quotes, CRLF between records on write.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

pub const DELIMITER: char = ',';
pub const QUOTE: char = '"';
pub const RECORD_SEPARATOR: &str = "\r\n";

const BOM: char = '\u{feff}';

/// Table text could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("unexpected character {found:?} after closing quote on line {line}")]
    TrailingAfterQuote { line: usize, found: char },
}

/// Quote a field if it contains the delimiter, a quote, or a line break.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r');
    if !needs_quotes {
        return Cow::Borrowed(field);
    }
    let mut quoted = String::with_capacity(field.len() + 2);
    quoted.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            quoted.push(QUOTE);
        }
        quoted.push(c);
    }
    quoted.push(QUOTE);
    Cow::Owned(quoted)
}

/// Accumulates records into table text.
#[derive(Debug, Default)]
pub struct TableWriter {
    out: String,
    records: usize,
}

impl TableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_record<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.records > 0 {
            self.out.push_str(RECORD_SEPARATOR);
        }
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.out.push(DELIMITER);
            }
            self.out.push_str(&escape_field(field.as_ref()));
        }
        self.records += 1;
    }

    /// Finished text, without a trailing record separator.
    pub fn finish(self) -> String {
        self.out
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    records: Vec<Vec<String>>,
    record: Vec<String>,
    field: String,
    /// Current field was quoted and its closing quote has been consumed.
    closed_quote: bool,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            records: Vec::new(),
            record: Vec::new(),
            field: String::new(),
            closed_quote: false,
        }
    }

    fn end_field(&mut self) {
        self.record.push(std::mem::take(&mut self.field));
        self.closed_quote = false;
    }

    fn end_record(&mut self) {
        self.end_field();
        let record = std::mem::take(&mut self.record);
        // blank lines carry no record
        if !(record.len() == 1 && record[0].is_empty()) {
            self.records.push(record);
        }
    }

    /// Consume a line break starting with `c`, folding CRLF.
    fn newline(&mut self, c: char) {
        if c == '\r' && self.chars.peek() == Some(&'\n') {
            self.chars.next();
        }
        self.line += 1;
    }

    fn quoted(&mut self) -> Result<(), TableError> {
        let start = self.line;
        while let Some(c) = self.chars.next() {
            match c {
                QUOTE if self.chars.peek() == Some(&QUOTE) => {
                    self.chars.next();
                    self.field.push(QUOTE);
                }
                QUOTE => {
                    self.closed_quote = true;
                    return Ok(());
                }
                '\n' | '\r' => {
                    self.field.push(c);
                    if c == '\r' && self.chars.peek() == Some(&'\n') {
                        self.chars.next();
                        self.field.push('\n');
                    }
                    self.line += 1;
                }
                _ => self.field.push(c),
            }
        }
        Err(TableError::UnterminatedQuote { line: start })
    }

    fn run(mut self) -> Result<Vec<Vec<String>>, TableError> {
        let mut pending = false;
        while let Some(c) = self.chars.next() {
            pending = true;
            match c {
                DELIMITER => self.end_field(),
                '\n' | '\r' => {
                    self.newline(c);
                    self.end_record();
                    pending = false;
                }
                _ if self.closed_quote => {
                    return Err(TableError::TrailingAfterQuote {
                        line: self.line,
                        found: c,
                    });
                }
                QUOTE if self.field.is_empty() => self.quoted()?,
                _ => self.field.push(c),
            }
        }
        if pending {
            self.end_record();
        }
        Ok(self.records)
    }
}

/// Parse table text into records of fields.
///
/// A leading byte-order mark is ignored and blank lines are skipped. Records
/// may have differing lengths.
pub fn parse_table(text: &str) -> Result<Vec<Vec<String>>, TableError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    Parser::new(text).run()
}
