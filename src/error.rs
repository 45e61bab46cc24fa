//! Error types for parsing, graph construction and ranking
//!
//! Every variant is fatal for the operation that raised it; nothing in the
//! crate retries. File-level helpers (storage, pipeline) wrap these in
//! [`anyhow`] with the offending path attached.

use thiserror::Error;

/// Result alias for the core (parser, graph model, solver)
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the core components
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed value-list text (bad literal, unterminated quote,
    /// unexpected character, or text not ending after the last tuple)
    #[error("syntax error at byte {position}: {reason}")]
    Syntax {
        /// Byte offset into the value-list text
        position: usize,
        /// What the tokenizer expected or rejected
        reason: String,
    },

    /// A syntax error located in a line-oriented input stream
    #[error("line {line}: {source}")]
    AtLine {
        /// 1-based line number
        line: usize,
        /// Underlying parse failure
        #[source]
        source: Box<Error>,
    },

    /// Packed link array that violates the run-length layout
    #[error("malformed packed link array at offset {offset}: {reason}")]
    MalformedLinks {
        /// Index into the packed array where the bad run starts
        offset: usize,
        /// Which invariant was violated
        reason: String,
    },

    /// Solver constructed over a graph without a single active page
    #[error("graph has no active pages; initial rank 1/0 is undefined")]
    NoActivePages,

    /// Damping factor outside (0, 1]
    #[error("damping factor {0} is outside (0, 1]")]
    InvalidDamping(f64),

    /// Dump row that does not have the columns the table should have
    #[error("unexpected row in `{table}`: {reason}")]
    UnexpectedRow {
        /// Relation the row came from
        table: String,
        /// Which column was missing or mistyped
        reason: String,
    },

    /// I/O failure on an input stream
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn syntax(position: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLinks {
            offset,
            reason: reason.into(),
        }
    }

    /// True for parse failures, with or without a line attached
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        match self {
            Self::Syntax { .. } => true,
            Self::AtLine { source, .. } => source.is_syntax(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_line_display() {
        let err = Error::AtLine {
            line: 42,
            source: Box::new(Error::syntax(7, "expected '('")),
        };
        assert_eq!(err.to_string(), "line 42: syntax error at byte 7: expected '('");
        assert!(err.is_syntax());
    }

    #[test]
    fn test_non_syntax_errors() {
        assert!(!Error::NoActivePages.is_syntax());
        assert!(!Error::malformed(3, "run overruns array").is_syntax());
    }
}
