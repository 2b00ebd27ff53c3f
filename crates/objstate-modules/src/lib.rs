//! Bundled native types for objstate.
//!
//! - **counter** - an integer counter with a configurable step
//! - **dict** - an insertion-ordered string to string map
//!
//! # Usage
//!
//! Each module provides a `register` function; [`register_all`] installs
//! every bundled type into a registry:
//!
//! ```
//! use objstate_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::new();
//! objstate_modules::register_all(&mut registry).unwrap();
//! assert!(registry.contains("counter"));
//! ```

use objstate_registry::{StateResult, TypeRegistry};

pub mod counter;
pub mod dict;

pub use counter::Counter;
pub use dict::Dict;

/// Register every bundled type.
pub fn register_all(registry: &mut TypeRegistry) -> StateResult<()> {
    counter::register(registry)?;
    dict::register(registry)?;
    Ok(())
}
