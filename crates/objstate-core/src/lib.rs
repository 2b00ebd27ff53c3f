//! Core types for objstate.
//!
//! This crate holds everything a native type needs to live inside a host
//! session:
//!
//! - **type_hash** - [`TypeHash`], the FNV1a fingerprint of a type name
//! - **handle** - [`Handle`], a type-erased native object plus its destructor
//! - **store** - [`VariableStore`], the name to handle table of a context
//! - **value** / **convert** - command results and argument parsing
//! - **error** - [`StateError`] and its [`ErrorKind`] classes

pub mod convert;
pub mod error;
pub mod handle;
pub mod store;
pub mod type_hash;
pub mod value;

pub use convert::{FromArg, FromArgs, IntoValue, arg, arg_or, parse_args};
pub use error::{ConversionError, ErrorKind, StateError, StateResult};
pub use handle::{Handle, MAX_TYPE_NAME_LEN, check_type_name};
pub use store::{MAX_SUFFIX_WIDTH, Overwrite, VariableStore};
pub use type_hash::{FNV_OFFSET_BASIS, FNV_PRIME, TypeHash, fnv1a};
pub use value::Value;
