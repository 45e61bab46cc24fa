//! Scalar values and row tuples as they appear in dump statements

use std::fmt;

/// One scalar literal from a `VALUES` list
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric literal without a `.`
    Int(i64),
    /// Numeric literal containing a `.`
    Float(f64),
    /// Quoted literal, unescaped
    Text(String),
    /// Bare `NULL`
    Null,
}

/// Ordered sequence of values; one row of the relation
pub type Tuple = Vec<Value>;

impl Value {
    /// Integer payload, if this is an integer
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Float payload, if this is a float
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Text payload, if this is text
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for `NULL`
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render as a literal the tuple parser accepts
    ///
    /// Floats always carry a `.` so they parse back as floats; text is quoted
    /// with `\`, `'` and `"` backslash-escaped.
    #[must_use]
    pub fn to_sql_literal(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => {
                // f64's Display never uses exponent notation
                let s = x.to_string();
                if s.contains('.') {
                    f.write_str(&s)
                } else {
                    write!(f, "{s}.0")
                }
            }
            Self::Text(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    if matches!(c, '\\' | '\'' | '"') {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("'")
            }
            Self::Null => f.write_str("NULL"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Render a tuple list as value-list text (`(..),(..)`)
#[must_use]
pub fn format_tuples(tuples: &[Tuple]) -> String {
    let mut out = String::new();
    for (i, tuple) in tuples.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('(');
        for (j, value) in tuple.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            out.push_str(&value.to_sql_literal());
        }
        out.push(')');
    }
    out
}
