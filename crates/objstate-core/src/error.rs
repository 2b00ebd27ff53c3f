//! Error types for objstate.
//!
//! ## Error Hierarchy
//!
//! ```text
//! StateError (returned by every fallible operation)
//! ├── InvalidArgs / DuplicateType  - malformed registration or arguments
//! ├── RegistryFull                 - type registry at capacity
//! ├── UnknownVariable / UnknownType / UnknownCommand - name not found
//! ├── TypeMismatch                 - name resolves, wrong type
//! ├── WrongNumArgs / UnknownSubcommand - command surface usage errors
//! ├── Conversion                   - argument marshalling (ConversionError)
//! └── Native                       - raised by a type's own constructor/dispatcher
//! ```
//!
//! Every message embeds the offending name so it can be handed straight back
//! to the host's error channel.

use thiserror::Error;

/// Result alias used throughout objstate.
pub type StateResult<T> = Result<T, StateError>;

/// Coarse error class, for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed registration or argument.
    InvalidArgs,
    /// The type registry is at capacity.
    Full,
    /// Unknown object, type or command name.
    NotFound,
    /// The name resolves but to an object of another type.
    TypeMismatch,
    /// The command was invoked with the wrong shape.
    Usage,
    /// Error raised by type-specific native code.
    Native,
}

/// Errors from converting a host word into a native value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Fewer arguments were supplied than the command reads.
    #[error("not enough arguments: missing argument {index}")]
    MissingArgument { index: usize },

    /// The word cannot be read as the target type.
    #[error("expected {target} but got \"{value}\"")]
    InvalidValue { value: String, target: &'static str },

    /// The word is an integer but does not fit the target type.
    #[error("integer value {value} out of range for {target}")]
    IntegerOverflow { value: String, target: &'static str },
}

/// Errors returned by the store, the type registry and the dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Malformed registration or argument.
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    /// A type with this name is already registered.
    #[error("type \"{0}\" is already registered")]
    DuplicateType(String),

    /// The registry has no free slot.
    #[error("no slots left to register new type \"{type_name}\" (capacity {capacity})")]
    RegistryFull { type_name: String, capacity: usize },

    /// No object is bound under this name.
    #[error("unknown var: {0}")]
    UnknownVariable(String),

    /// No type is registered under this name.
    #[error("unknown type \"{name}\": must be one of {}", one_of(.known))]
    UnknownType { name: String, known: Vec<String> },

    /// The host has no command with this name.
    #[error("invalid command name \"{0}\"")]
    UnknownCommand(String),

    /// The object exists but is of another type.
    #[error("object \"{name}\" is not of type {expected} (found {actual})")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// The command received the wrong number of arguments.
    #[error("wrong # args: should be \"{usage}\"")]
    WrongNumArgs { usage: String },

    /// The subcommand is not one the command understands.
    #[error("bad subcommand \"{given}\": must be {}", one_of(.options))]
    UnknownSubcommand { given: String, options: Vec<String> },

    /// An argument could not be converted.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Error raised by type-specific native code.
    #[error("{0}")]
    Native(String),
}

impl StateError {
    /// Build a [`StateError::Native`] from any message.
    pub fn native(message: impl Into<String>) -> Self {
        StateError::Native(message.into())
    }

    /// Build a [`StateError::WrongNumArgs`] with a usage string.
    pub fn wrong_args(usage: impl Into<String>) -> Self {
        StateError::WrongNumArgs {
            usage: usage.into(),
        }
    }

    /// Build a [`StateError::UnknownSubcommand`] listing the accepted options.
    pub fn unknown_subcommand(given: &str, options: &[&str]) -> Self {
        StateError::UnknownSubcommand {
            given: given.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    /// The class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StateError::InvalidArgs(_) | StateError::DuplicateType(_) => ErrorKind::InvalidArgs,
            StateError::RegistryFull { .. } => ErrorKind::Full,
            StateError::UnknownVariable(_)
            | StateError::UnknownType { .. }
            | StateError::UnknownCommand(_) => ErrorKind::NotFound,
            StateError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            StateError::WrongNumArgs { .. }
            | StateError::UnknownSubcommand { .. }
            | StateError::Conversion(_) => ErrorKind::Usage,
            StateError::Native(_) => ErrorKind::Native,
        }
    }
}

/// Render `a, b, or c` the way the host reports choice lists.
fn one_of(options: &[String]) -> String {
    match options {
        [] => "(none registered)".to_string(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
    }
}
