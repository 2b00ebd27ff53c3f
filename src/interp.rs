//! A minimal in-memory host.
//!
//! `Interp` plays the role the embedding interpreter plays in production: it
//! owns the command table, keeps one [`Context`] per root command, and routes
//! each command line to the right context. It does not evaluate a language;
//! a line is just a list of words.
//!
//! # Example
//!
//! ```
//! use objstate::{Context, Interp, StateConfig};
//!
//! let mut interp = Interp::new();
//! interp
//!     .install(Context::with_default_types(StateConfig::default()).unwrap())
//!     .unwrap();
//!
//! let name = interp.eval("cobj create counter 10").unwrap().to_string();
//! interp.eval(&format!("{name} incr 5")).unwrap();
//! assert_eq!(interp.eval(&format!("{name} get")).unwrap().to_string(), "15");
//! ```

use rustc_hash::FxHashMap;

use objstate_core::{StateError, StateResult, Value};

use crate::context::Context;
use crate::host::{CommandHost, CommandTable, Route};

/// Host adapter owning contexts and the command table.
#[derive(Debug, Default)]
pub struct Interp {
    contexts: FxHashMap<String, Context>,
    commands: CommandTable,
}

impl Interp {
    /// Create a host with no commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `ctx`, binding its root command.
    pub fn install(&mut self, ctx: Context) -> StateResult<()> {
        let key = ctx.command_name().to_string();
        if self.commands.has_command(&key) {
            return Err(StateError::InvalidArgs(format!(
                "command \"{key}\" already exists"
            )));
        }
        self.commands.bind_command(&key, Route::Root(key.clone()));
        tracing::debug!(context = %key, "installed context");
        self.contexts.insert(key, ctx);
        Ok(())
    }

    /// Tear down and remove the context behind root command `name`.
    ///
    /// Returns the number of objects destroyed.
    pub fn uninstall(&mut self, name: &str) -> StateResult<usize> {
        let mut ctx = self
            .contexts
            .remove(name)
            .ok_or_else(|| StateError::UnknownCommand(name.to_string()))?;
        Ok(ctx.teardown(&mut self.commands))
    }

    /// Borrow the context behind root command `name`.
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// Mutably borrow the context behind root command `name`.
    pub fn context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.get_mut(name)
    }

    /// The command table.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Check if `name` is a bound command.
    pub fn has_command(&self, name: &str) -> bool {
        self.commands.has_command(name)
    }

    /// Run one command given as words; `words[0]` is the command name.
    pub fn invoke<S: AsRef<str>>(&mut self, words: &[S]) -> StateResult<Value> {
        let words: Vec<String> = words.iter().map(|w| w.as_ref().to_string()).collect();
        let Some((command, rest)) = words.split_first() else {
            return Ok(Value::Empty);
        };
        let route = self
            .commands
            .route(command)
            .cloned()
            .ok_or_else(|| StateError::UnknownCommand(command.clone()))?;
        let ctx = self
            .contexts
            .get_mut(route.context())
            .ok_or_else(|| StateError::UnknownCommand(command.clone()))?;

        match route {
            Route::Root(_) => ctx.dispatch_root(&mut self.commands, rest),
            Route::Instance(_) => ctx.dispatch_instance(command, rest),
        }
    }

    /// Split `line` into words and run it.
    pub fn eval(&mut self, line: &str) -> StateResult<Value> {
        let words = split_words(line)?;
        self.invoke(&words)
    }
}

/// Split a command line into words.
///
/// Words are separated by whitespace. `{...}` groups a word verbatim, with
/// nested braces balanced. Outside braces a backslash makes the next
/// character literal. Splitting a rendered list [`Value`] gives back its
/// elements' text.
pub fn split_words(line: &str) -> StateResult<Vec<String>> {
    let mut words = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut word = String::new();
        if c == '{' {
            chars.next();
            let mut depth = 1usize;
            loop {
                match chars.next() {
                    Some('{') => {
                        depth += 1;
                        word.push('{');
                    }
                    Some('}') => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                        word.push('}');
                    }
                    Some(other) => word.push(other),
                    None => {
                        return Err(StateError::InvalidArgs(format!(
                            "missing close-brace in \"{line}\""
                        )));
                    }
                }
            }
            if chars.peek().is_some_and(|next| !next.is_whitespace()) {
                return Err(StateError::InvalidArgs(format!(
                    "extra characters after close-brace in \"{line}\""
                )));
            }
        } else {
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() {
                    break;
                }
                chars.next();
                if next == '\\' {
                    // A trailing backslash stands for itself.
                    word.push(chars.next().unwrap_or('\\'));
                } else {
                    word.push(next);
                }
            }
        }
        words.push(word);
    }

    Ok(words)
}
