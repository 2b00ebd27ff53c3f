//! Command result values.

use std::borrow::Cow;
use std::fmt;

/// A value returned to the host by a command.
///
/// The host surface is textual, so every value has a canonical rendering via
/// [`fmt::Display`]: booleans render as `0`/`1` and lists are space separated,
/// with each element quoted by [`quote_element`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Empty result
    #[default]
    Empty,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value (owned)
    Str(String),
    /// List of values
    List(Vec<Value>),
}

impl Value {
    /// Get a human-readable name for this value's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }

    /// Check if this is the empty result.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the list payload, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

fn is_special(c: char) -> bool {
    c.is_whitespace() || matches!(c, '{' | '}' | '\\')
}

/// Check that every `}` in `word` closes an earlier `{` and none stay open.
fn braces_balanced(word: &str) -> bool {
    let mut depth = 0usize;
    for c in word.chars() {
        match c {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Quote a list element so the host splits it back into one word.
///
/// Elements with balanced braces are wrapped in `{...}` and read back
/// verbatim. Anything else has each special character backslash-escaped.
pub fn quote_element(word: &str) -> Cow<'_, str> {
    if word.is_empty() {
        Cow::Borrowed("{}")
    } else if !word.chars().any(is_special) {
        Cow::Borrowed(word)
    } else if braces_balanced(word) {
        Cow::Owned(format!("{{{word}}}"))
    } else {
        let mut escaped = String::with_capacity(word.len() * 2);
        for c in word.chars() {
            if is_special(c) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        Cow::Owned(escaped)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(b) => write!(f, "{}", u8::from(*b)),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    let rendered = item.to_string();
                    f.write_str(&quote_element(&rendered))?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
