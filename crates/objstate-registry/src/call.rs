//! Call contexts handed to native constructors and dispatchers.
//!
//! These bridge the dispatch layer and type-specific Rust code, giving typed
//! access to the command words and to the objects of the current store.
//!
//! ## Typed Argument Access
//!
//! ```ignore
//! let factor: f64 = call.arg(0)?;
//! let (w, h): (u32, u32) = args.parse()?;
//! ```

use std::any::Any;

use objstate_core::{FromArg, FromArgs, Handle, StateError, StateResult, VariableStore, arg, arg_or};

/// Context for a type constructor invoked by `create`.
///
/// The store is read-only here: a constructor may look at existing objects
/// (for example to copy one) but binding the result is the dispatch layer's
/// job.
pub struct CreateArgs<'a> {
    type_name: &'a str,
    args: &'a [String],
    store: &'a VariableStore,
}

impl<'a> CreateArgs<'a> {
    /// Create a constructor context.
    ///
    /// # Arguments
    ///
    /// * `type_name` - The registered type being created
    /// * `args` - The words after the type name
    /// * `store` - The store the new object will be bound in
    pub fn new(type_name: &'a str, args: &'a [String], store: &'a VariableStore) -> Self {
        Self {
            type_name,
            args,
            store,
        }
    }

    /// The registered type being created.
    pub fn type_name(&self) -> &str {
        self.type_name
    }

    /// The raw words after the type name.
    pub fn args(&self) -> &[String] {
        self.args
    }

    /// Number of words after the type name.
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Parse the word at `index`.
    pub fn arg<T: FromArg>(&self, index: usize) -> StateResult<T> {
        Ok(arg(self.args, index)?)
    }

    /// Parse the word at `index`, or return `default` when absent.
    pub fn arg_or<T: FromArg>(&self, index: usize, default: T) -> StateResult<T> {
        Ok(arg_or(self.args, index, default)?)
    }

    /// Parse a tuple of leading words.
    pub fn parse<T: FromArgs>(&self) -> StateResult<T> {
        Ok(T::from_args(self.args)?)
    }

    /// Read-only access to the store.
    pub fn store(&self) -> &VariableStore {
        self.store
    }

    /// Borrow another object of the store as `T`.
    pub fn resolve<T: Any>(&self, name: &str, expected_type: &str) -> StateResult<&T> {
        self.store.resolve_as::<T>(name, expected_type)
    }

    /// Wrap `object` as an instance of the type being created.
    pub fn wrap<T: Any + Send>(&self, object: T) -> StateResult<Handle> {
        Handle::wrap(object, self.type_name)
    }

    /// Wrap `object` with a custom destruction callback.
    pub fn wrap_with_deleter<T, F>(&self, object: T, deleter: F) -> StateResult<Handle>
    where
        T: Any + Send,
        F: FnOnce(T) + Send + 'static,
    {
        Handle::with_deleter(object, self.type_name, deleter)
    }

    /// Build a `WrongNumArgs` error for this type's create usage.
    pub fn wrong_args(&self, usage: &str) -> StateError {
        StateError::wrong_args(format!("create {} {}", self.type_name, usage))
    }
}

/// Context for an instance subcommand delegated to a type's dispatcher.
///
/// `words[0]` is the subcommand; [`InstanceCall::args`] are the words after
/// it. The dispatcher may mutate its own object and read or mutate other
/// objects of the store, but cannot bind or unbind names.
pub struct InstanceCall<'a> {
    name: &'a str,
    type_name: &'a str,
    words: &'a [String],
    store: &'a mut VariableStore,
}

impl<'a> InstanceCall<'a> {
    /// Create an instance call context.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the object the command is bound to
    /// * `type_name` - The object's registered type
    /// * `words` - The subcommand followed by its arguments
    /// * `store` - The store holding the object
    pub fn new(
        name: &'a str,
        type_name: &'a str,
        words: &'a [String],
        store: &'a mut VariableStore,
    ) -> Self {
        Self {
            name,
            type_name,
            words,
            store,
        }
    }

    /// Name of the object this command is bound to.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Registered type of the object.
    pub fn type_name(&self) -> &str {
        self.type_name
    }

    /// The subcommand word.
    pub fn subcommand(&self) -> &str {
        self.words.first().map(String::as_str).unwrap_or_default()
    }

    /// The words after the subcommand.
    pub fn args(&self) -> &[String] {
        self.words.get(1..).unwrap_or_default()
    }

    /// Number of words after the subcommand.
    pub fn arg_count(&self) -> usize {
        self.args().len()
    }

    /// Parse the argument at `index` (0 is the first word after the subcommand).
    pub fn arg<T: FromArg>(&self, index: usize) -> StateResult<T> {
        Ok(arg(self.args(), index)?)
    }

    /// Parse the argument at `index`, or return `default` when absent.
    pub fn arg_or<T: FromArg>(&self, index: usize, default: T) -> StateResult<T> {
        Ok(arg_or(self.args(), index, default)?)
    }

    /// Parse a tuple of leading arguments.
    pub fn parse<T: FromArgs>(&self) -> StateResult<T> {
        Ok(T::from_args(self.args())?)
    }

    /// Fail with `WrongNumArgs` unless exactly `count` arguments were given.
    pub fn expect_args(&self, count: usize, usage: &str) -> StateResult<()> {
        if self.arg_count() == count {
            Ok(())
        } else {
            Err(self.wrong_args(usage))
        }
    }

    /// Borrow this object as `T`.
    pub fn this<T: Any>(&self) -> StateResult<&T> {
        self.store.resolve_as::<T>(self.name, self.type_name)
    }

    /// Mutably borrow this object as `T`.
    pub fn this_mut<T: Any>(&mut self) -> StateResult<&mut T> {
        self.store.resolve_as_mut::<T>(self.name, self.type_name)
    }

    /// Borrow another object of the store as `T`.
    pub fn resolve<T: Any>(&self, name: &str, expected_type: &str) -> StateResult<&T> {
        self.store.resolve_as::<T>(name, expected_type)
    }

    /// Mutably borrow another object of the store as `T`.
    pub fn resolve_mut<T: Any>(&mut self, name: &str, expected_type: &str) -> StateResult<&mut T> {
        self.store.resolve_as_mut::<T>(name, expected_type)
    }

    /// Borrow another object's handle without a type check.
    pub fn handle(&self, name: &str) -> StateResult<&Handle> {
        self.store.get(name)
    }

    /// Read-only access to the store.
    pub fn store(&self) -> &VariableStore {
        self.store
    }

    /// Build a `WrongNumArgs` error for one of this object's subcommands.
    pub fn wrong_args(&self, usage: &str) -> StateError {
        StateError::wrong_args(format!("{} {} {}", self.name, self.subcommand(), usage).trim_end().to_string())
    }

    /// Build an `UnknownSubcommand` error listing the type's subcommands.
    ///
    /// The reserved `type` subcommand is listed first.
    pub fn unknown_subcommand(&self, options: &[&str]) -> StateError {
        let mut all = Vec::with_capacity(options.len() + 1);
        all.push("type");
        all.extend_from_slice(options);
        StateError::unknown_subcommand(self.subcommand(), &all)
    }
}
