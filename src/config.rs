//! Context configuration.

use objstate_core::{MAX_SUFFIX_WIDTH, StateError, StateResult};
use objstate_registry::DEFAULT_TYPE_CAPACITY;

/// Default name of the root command.
pub const DEFAULT_COMMAND_NAME: &str = "cobj";

/// Default zero-padding width of generated name suffixes.
pub const DEFAULT_SUFFIX_WIDTH: usize = 4;

/// Settings for one [`Context`](crate::Context).
///
/// ```
/// use objstate::StateConfig;
///
/// let config = StateConfig::new("img").with_suffix_width(6);
/// assert_eq!(config.name_prefix(), "img#");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateConfig {
    command_name: String,
    name_prefix: Option<String>,
    suffix_width: usize,
    type_capacity: Option<usize>,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_NAME)
    }
}

impl StateConfig {
    /// Configuration for a root command named `command_name`.
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            name_prefix: None,
            suffix_width: DEFAULT_SUFFIX_WIDTH,
            type_capacity: Some(DEFAULT_TYPE_CAPACITY),
        }
    }

    /// Use `prefix` for generated names instead of `"<command>#"`.
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    /// Zero-pad generated sequence numbers to `width` digits.
    pub fn with_suffix_width(mut self, width: usize) -> Self {
        self.suffix_width = width;
        self
    }

    /// Bound the type registry to `capacity` types; `None` removes the bound.
    pub fn with_type_capacity(mut self, capacity: Option<usize>) -> Self {
        self.type_capacity = capacity;
        self
    }

    /// Name of the root command.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// Prefix of generated object names.
    pub fn name_prefix(&self) -> String {
        self.name_prefix
            .clone()
            .unwrap_or_else(|| format!("{}#", self.command_name))
    }

    /// Zero-padding width of generated sequence numbers.
    pub fn suffix_width(&self) -> usize {
        self.suffix_width
    }

    /// Type registry bound.
    pub fn type_capacity(&self) -> Option<usize> {
        self.type_capacity
    }

    /// Reject settings a context cannot run with.
    pub fn validate(&self) -> StateResult<()> {
        if self.command_name.is_empty() || self.command_name.chars().any(char::is_whitespace) {
            return Err(StateError::InvalidArgs(format!(
                "command name \"{}\" must be a non-empty word",
                self.command_name
            )));
        }
        if self.type_capacity == Some(0) {
            return Err(StateError::InvalidArgs(format!(
                "type capacity of \"{}\" must be at least 1",
                self.command_name
            )));
        }
        if self.suffix_width > MAX_SUFFIX_WIDTH {
            return Err(StateError::InvalidArgs(format!(
                "suffix width {} of \"{}\" exceeds the maximum of {MAX_SUFFIX_WIDTH}",
                self.suffix_width, self.command_name
            )));
        }
        if self.name_prefix().chars().any(char::is_whitespace) {
            return Err(StateError::InvalidArgs(format!(
                "name prefix \"{}\" must not contain whitespace",
                self.name_prefix()
            )));
        }
        Ok(())
    }
}
