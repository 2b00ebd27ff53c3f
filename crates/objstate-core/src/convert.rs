//! Conversion traits for command argument extraction and result values.
//!
//! - [`FromArg`]: Parse a host word into a Rust value
//! - [`IntoValue`]: Convert a Rust value into a command [`Value`]
//!
//! ## Supported Types
//!
//! - Integers: `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`, `u64`
//! - Floats: `f32`, `f64`
//! - Boolean: `bool` (`1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`)
//! - `char`: exactly one character
//! - `String`: the word itself
//!
//! ## Example
//!
//! ```
//! use objstate_core::{FromArg, parse_args};
//!
//! let x = i32::from_arg("42").unwrap();
//! assert_eq!(x, 42);
//!
//! let words = vec!["3".to_string(), "0.5".to_string()];
//! let (n, factor): (u32, f64) = parse_args(&words).unwrap();
//! assert_eq!((n, factor), (3, 0.5));
//! ```

use crate::error::ConversionError;
use crate::value::Value;

/// Parse a value from a host word.
pub trait FromArg: Sized {
    /// Parse the given word.
    fn from_arg(word: &str) -> Result<Self, ConversionError>;
}

/// Convert a value into a command result.
pub trait IntoValue {
    /// Convert this value into a [`Value`].
    fn into_value(self) -> Value;
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_from_arg_int {
    ($($ty:ty),*) => {
        $(
            impl FromArg for $ty {
                fn from_arg(word: &str) -> Result<Self, ConversionError> {
                    let wide: i128 = word.trim().parse().map_err(|_| ConversionError::InvalidValue {
                        value: word.to_string(),
                        target: stringify!($ty),
                    })?;
                    <$ty>::try_from(wide).map_err(|_| ConversionError::IntegerOverflow {
                        value: word.to_string(),
                        target: stringify!($ty),
                    })
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Int(self as i64)
                }
            }
        )*
    };
}

impl_from_arg_int!(i8, i16, i32, i64, u8, u16, u32);

impl FromArg for u64 {
    fn from_arg(word: &str) -> Result<Self, ConversionError> {
        let wide: i128 = word
            .trim()
            .parse()
            .map_err(|_| ConversionError::InvalidValue {
                value: word.to_string(),
                target: "u64",
            })?;
        u64::try_from(wide).map_err(|_| ConversionError::IntegerOverflow {
            value: word.to_string(),
            target: "u64",
        })
    }
}

// u64 values above i64::MAX have no integer rendering; keep the digits.
impl IntoValue for u64 {
    fn into_value(self) -> Value {
        match i64::try_from(self) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Str(self.to_string()),
        }
    }
}

// ============================================================================
// Float implementations
// ============================================================================

macro_rules! impl_from_arg_float {
    ($($ty:ty),*) => {
        $(
            impl FromArg for $ty {
                fn from_arg(word: &str) -> Result<Self, ConversionError> {
                    word.trim().parse().map_err(|_| ConversionError::InvalidValue {
                        value: word.to_string(),
                        target: stringify!($ty),
                    })
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Float(self as f64)
                }
            }
        )*
    };
}

impl_from_arg_float!(f32, f64);

// ============================================================================
// Other primitives
// ============================================================================

impl FromArg for bool {
    fn from_arg(word: &str) -> Result<Self, ConversionError> {
        match word.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConversionError::InvalidValue {
                value: word.to_string(),
                target: "bool",
            }),
        }
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromArg for char {
    fn from_arg(word: &str) -> Result<Self, ConversionError> {
        let mut chars = word.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConversionError::InvalidValue {
                value: word.to_string(),
                target: "char",
            }),
        }
    }
}

impl FromArg for String {
    fn from_arg(word: &str) -> Result<Self, ConversionError> {
        Ok(word.to_string())
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Str(self.to_string())
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Empty
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map(IntoValue::into_value).unwrap_or_default()
    }
}

// ============================================================================
// Positional extraction
// ============================================================================

/// Parse the word at `index`.
pub fn arg<T: FromArg>(words: &[String], index: usize) -> Result<T, ConversionError> {
    let word = words
        .get(index)
        .ok_or(ConversionError::MissingArgument { index })?;
    T::from_arg(word)
}

/// Parse the word at `index`, falling back to `default` when it is absent.
pub fn arg_or<T: FromArg>(words: &[String], index: usize, default: T) -> Result<T, ConversionError> {
    match words.get(index) {
        Some(word) => T::from_arg(word),
        None => Ok(default),
    }
}

/// A tuple of types parsed positionally from a word list.
pub trait FromArgs: Sized {
    /// Parse from the front of `words`; extra words are ignored.
    fn from_args(words: &[String]) -> Result<Self, ConversionError>;
}

macro_rules! impl_from_args_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: FromArg),+> FromArgs for ($($name,)+) {
            fn from_args(words: &[String]) -> Result<Self, ConversionError> {
                Ok(($(arg::<$name>(words, $idx)?,)+))
            }
        }
    };
}

impl_from_args_tuple!(A: 0);
impl_from_args_tuple!(A: 0, B: 1);
impl_from_args_tuple!(A: 0, B: 1, C: 2);
impl_from_args_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_from_args_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_from_args_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

/// Parse a tuple of arguments in one call.
pub fn parse_args<T: FromArgs>(words: &[String]) -> Result<T, ConversionError> {
    T::from_args(words)
}
