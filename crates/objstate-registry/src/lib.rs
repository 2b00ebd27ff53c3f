//! objstate Registry crate.
//!
//! This crate contains the [`TypeRegistry`] and the callable types native
//! code plugs into it:
//!
//! - [`NativeConstructor`] builds a new object for `create`
//! - [`NativeDispatcher`] handles an object's type-specific subcommands
//! - [`CreateArgs`] / [`InstanceCall`] are the contexts they receive

pub mod call;
pub mod native;
pub mod registry;

pub use call::{CreateArgs, InstanceCall};
pub use native::{Construct, Dispatch, NativeConstructor, NativeDispatcher};
pub use registry::{DEFAULT_TYPE_CAPACITY, RegisteredType, TypeRegistry};

// Re-export core types so native modules need a single dependency.
pub use objstate_core::{
    ErrorKind, FromArg, Handle, IntoValue, StateError, StateResult, TypeHash, Value,
};
