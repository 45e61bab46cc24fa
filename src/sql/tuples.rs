//! Value-list tokenizer
//!
//! Walks the text of one `INSERT ... VALUES` statement exactly once, left to
//! right, with no backtracking. Each tokenizer state owns one transition
//! function; any character that state does not accept aborts the whole
//! statement.
//!
//! ```text
//! TupleStart --'('--> FirstValue --value--> ... --')'--> AfterTuple --','--> Separator --'('--> FirstValue
//!                         |                                  |
//!                         +--')' (empty tuple)               +--end of input: done
//! ```

use super::value::{Tuple, Value};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Start of input: only `(` is valid
    TupleStart,
    /// Just after `(`: a value or `)` for an empty tuple
    FirstValue,
    /// Just after a `,` inside a tuple: a value
    NextValue,
    /// Inside `[0-9.-]+`, starting at the given byte
    Number { start: usize },
    /// Inside `'...'`
    Quoted,
    /// Just after a backslash inside `'...'`
    Escape,
    /// Inside a bare uppercase word, starting at the given byte
    Keyword { start: usize },
    /// After a closing quote: `,` or `)`
    AfterQuoted,
    /// After `)`: `,` or end of input
    AfterTuple,
    /// After a `,` between tuples: `(`
    Separator,
}

/// Parse the value list of a bulk insertion into row tuples
///
/// `text` is everything between ``INSERT INTO `name` VALUES `` and the
/// trailing `;`, e.g. `(1,'a',NULL),(2,'b',3.5)`.
///
/// # Errors
///
/// Returns [`Error::Syntax`] on a malformed literal, an unterminated quote,
/// an invalid escape, a bare word other than `NULL`, any unexpected
/// character, or text that does not end right after a `)`. No partial result
/// is returned.
///
/// # Example
///
/// ```
/// use wiki_pagerank::sql::{parse_tuples, Value};
///
/// let rows = parse_tuples(r"(1,'O\'Brien',NULL)").unwrap();
/// assert_eq!(rows, vec![vec![Value::Int(1), Value::from("O'Brien"), Value::Null]]);
/// ```
pub fn parse_tuples(text: &str) -> Result<Vec<Tuple>> {
    let mut tokenizer = Tokenizer::new(text);
    let mut state = State::TupleStart;
    for (pos, c) in text.char_indices() {
        state = tokenizer.step(state, pos, c)?;
    }
    tokenizer.finish(state)
}

struct Tokenizer<'a> {
    text: &'a str,
    tuples: Vec<Tuple>,
    tuple: Tuple,
    literal: String,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            tuples: Vec::new(),
            tuple: Vec::new(),
            literal: String::new(),
        }
    }

    fn step(&mut self, state: State, pos: usize, c: char) -> Result<State> {
        match state {
            State::TupleStart | State::Separator => Self::open_tuple(pos, c),
            State::FirstValue => self.first_value(pos, c),
            State::NextValue => self.value_start(pos, c),
            State::Number { start } => self.number(start, pos, c),
            State::Quoted => Ok(self.quoted(c)),
            State::Escape => self.escape(pos, c),
            State::Keyword { start } => self.keyword(start, pos, c),
            State::AfterQuoted => self.close_value(pos, c),
            State::AfterTuple => Self::after_tuple(pos, c),
        }
    }

    fn finish(self, state: State) -> Result<Vec<Tuple>> {
        match state {
            State::AfterTuple => Ok(self.tuples),
            State::Quoted | State::Escape => {
                Err(Error::syntax(self.text.len(), "unterminated quoted literal"))
            }
            _ => Err(Error::syntax(
                self.text.len(),
                "unexpected end of input; value list must end with ')'",
            )),
        }
    }

    fn open_tuple(pos: usize, c: char) -> Result<State> {
        if c == '(' {
            Ok(State::FirstValue)
        } else {
            Err(Error::syntax(pos, format!("expected '(' but found {c:?}")))
        }
    }

    fn first_value(&mut self, pos: usize, c: char) -> Result<State> {
        if c == ')' {
            self.end_tuple();
            Ok(State::AfterTuple)
        } else {
            self.value_start(pos, c)
        }
    }

    fn value_start(&mut self, pos: usize, c: char) -> Result<State> {
        match c {
            '0'..='9' | '-' | '.' => Ok(State::Number { start: pos }),
            '\'' => {
                self.literal.clear();
                Ok(State::Quoted)
            }
            'N' => Ok(State::Keyword { start: pos }),
            _ => Err(Error::syntax(pos, format!("expected a value but found {c:?}"))),
        }
    }

    fn number(&mut self, start: usize, pos: usize, c: char) -> Result<State> {
        match c {
            '0'..='9' | '-' | '.' => Ok(State::Number { start }),
            ',' | ')' => {
                let token = &self.text[start..pos];
                // Overflow to infinity would not render back as a literal
                let value = if token.contains('.') {
                    token
                        .parse::<f64>()
                        .ok()
                        .filter(|x| x.is_finite())
                        .map(Value::Float)
                } else {
                    token.parse().map(Value::Int).ok()
                };
                let value = value
                    .ok_or_else(|| Error::syntax(start, format!("malformed number {token:?}")))?;
                self.tuple.push(value);
                self.close_value(pos, c)
            }
            _ => Err(Error::syntax(pos, format!("unexpected {c:?} in number"))),
        }
    }

    fn quoted(&mut self, c: char) -> State {
        match c {
            '\'' => {
                self.tuple.push(Value::Text(std::mem::take(&mut self.literal)));
                State::AfterQuoted
            }
            '\\' => State::Escape,
            _ => {
                self.literal.push(c);
                State::Quoted
            }
        }
    }

    fn escape(&mut self, pos: usize, c: char) -> Result<State> {
        if matches!(c, '\\' | '\'' | '"') {
            self.literal.push(c);
            Ok(State::Quoted)
        } else {
            Err(Error::syntax(pos, format!("unsupported escape \\{c}")))
        }
    }

    fn keyword(&mut self, start: usize, pos: usize, c: char) -> Result<State> {
        match c {
            'A'..='Z' => Ok(State::Keyword { start }),
            ',' | ')' => {
                let word = &self.text[start..pos];
                if word != "NULL" {
                    return Err(Error::syntax(start, format!("unknown keyword {word:?}")));
                }
                self.tuple.push(Value::Null);
                self.close_value(pos, c)
            }
            _ => Err(Error::syntax(pos, format!("unexpected {c:?} in keyword"))),
        }
    }

    /// `,` continues the tuple, `)` closes it
    fn close_value(&mut self, pos: usize, c: char) -> Result<State> {
        match c {
            ',' => Ok(State::NextValue),
            ')' => {
                self.end_tuple();
                Ok(State::AfterTuple)
            }
            _ => Err(Error::syntax(pos, format!("expected ',' or ')' but found {c:?}"))),
        }
    }

    fn after_tuple(pos: usize, c: char) -> Result<State> {
        if c == ',' {
            Ok(State::Separator)
        } else {
            Err(Error::syntax(pos, format!("expected ',' or end of input but found {c:?}")))
        }
    }

    fn end_tuple(&mut self) {
        self.tuples.push(std::mem::take(&mut self.tuple));
    }
}
