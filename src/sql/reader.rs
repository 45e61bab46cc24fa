//! Line-oriented reader for `INSERT INTO` dump statements
//!
//! A MySQL dump stores each bulk insertion on one (very long) line:
//!
//! ```text
//! -- comment
//! INSERT INTO `page` VALUES (1,0,'Main_Page',...),(2,0,'Tokyo',...);
//! ```
//!
//! The reader yields the tuples of every line shaped exactly like that for one
//! table and silently skips everything else.

use super::tuples::parse_tuples;
use super::value::Tuple;
use crate::error::{Error, Result};
use std::io::BufRead;

/// Sequential reader of bulk insertions for one table
///
/// The cursor only moves forward; one instance serves one consumer.
#[derive(Debug)]
pub struct InsertReader<R> {
    input: R,
    table: String,
    prefix: String,
    buf: Vec<u8>,
    line: usize,
    statements: usize,
    skipped: usize,
}

impl<R: BufRead> InsertReader<R> {
    /// Read statements for `table` from `input`
    pub fn new(input: R, table: &str) -> Self {
        Self {
            input,
            table: table.to_string(),
            prefix: format!("INSERT INTO `{table}` VALUES "),
            buf: Vec::new(),
            line: 0,
            statements: 0,
            skipped: 0,
        }
    }

    /// Tuples of the next matching statement
    ///
    /// Returns `Ok(None)` once the input is exhausted. A statement without
    /// rows is never produced: the value list must hold at least one tuple.
    ///
    /// # Errors
    ///
    /// [`Error::AtLine`] wrapping a syntax error in a matching statement, or
    /// [`Error::Io`] when the underlying stream fails.
    pub fn read_insertion_tuples(&mut self) -> Result<Option<Vec<Tuple>>> {
        loop {
            self.buf.clear();
            if self.input.read_until(b'\n', &mut self.buf)? == 0 {
                log::debug!(
                    "`{}`: end of input after {} lines, {} statements, {} skipped",
                    self.table,
                    self.line,
                    self.statements,
                    self.skipped
                );
                return Ok(None);
            }
            self.line += 1;

            let text = String::from_utf8_lossy(&self.buf);
            let line = text.trim_end_matches(['\n', '\r']);
            if line.is_empty() || line.starts_with("--") {
                continue;
            }
            let Some(values) = line
                .strip_prefix(self.prefix.as_str())
                .and_then(|rest| rest.strip_suffix(';'))
            else {
                self.skipped += 1;
                continue;
            };

            let tuples = parse_tuples(values).map_err(|source| Error::AtLine {
                line: self.line,
                source: Box::new(source),
            })?;
            self.statements += 1;
            return Ok(Some(tuples));
        }
    }

    /// Table this reader matches
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Lines consumed so far
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Matching statements returned so far
    #[must_use]
    pub const fn statements(&self) -> usize {
        self.statements
    }

    /// Non-comment lines skipped because they were not insertions into the table
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> R {
        self.input
    }
}

impl<R: BufRead> Iterator for InsertReader<R> {
    type Item = Result<Vec<Tuple>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_insertion_tuples().transpose()
    }
}
