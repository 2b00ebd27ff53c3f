//! TypeRegistry - the table of native types a context can create.
//!
//! Each entry maps a type name to a constructor (used by `create`) and an
//! instance dispatcher (used for every subcommand the generic layer does not
//! handle itself).
//!
//! # Storage Model
//!
//! - **Entries**: stored in registration order in a `Vec`; an entry's index
//!   is stable for the life of the registry.
//! - **Index**: `TypeHash` of the name -> entry index, so a lookup hashes the
//!   requested name once and confirms with one string compare.
//!
//! # Capacity
//!
//! A registry built with [`TypeRegistry::with_capacity`] refuses new types
//! once full, leaving the existing entries untouched. [`TypeRegistry::unbounded`]
//! grows as needed.
//!
//! # Example
//!
//! ```
//! use objstate_core::Value;
//! use objstate_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::with_capacity(100);
//! registry
//!     .register("widget", |args| args.wrap(()), |_call| Ok(Value::Empty))
//!     .unwrap();
//!
//! assert_eq!(registry.lookup_by_name("widget").unwrap(), 0);
//! ```

use rustc_hash::FxHashMap;

use objstate_core::{Handle, StateError, StateResult, TypeHash, Value, check_type_name};

use crate::call::{CreateArgs, InstanceCall};
use crate::native::{NativeConstructor, NativeDispatcher};

/// Default number of type slots.
pub const DEFAULT_TYPE_CAPACITY: usize = 100;

/// A registered native type.
#[derive(Debug, Clone)]
pub struct RegisteredType {
    name: String,
    type_hash: TypeHash,
    constructor: NativeConstructor,
    dispatcher: NativeDispatcher,
}

impl RegisteredType {
    /// The type's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fingerprint of the type's name.
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// The type's constructor.
    pub fn constructor(&self) -> &NativeConstructor {
        &self.constructor
    }

    /// The type's instance dispatcher.
    pub fn dispatcher(&self) -> &NativeDispatcher {
        &self.dispatcher
    }
}

/// Table of registered native types.
#[derive(Debug)]
pub struct TypeRegistry {
    entries: Vec<RegisteredType>,
    by_hash: FxHashMap<TypeHash, usize>,
    capacity: Option<usize>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TYPE_CAPACITY)
    }
}

impl TypeRegistry {
    /// Create a registry with [`DEFAULT_TYPE_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that holds at most `capacity` types.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            by_hash: FxHashMap::default(),
            capacity: Some(capacity),
        }
    }

    /// Create a registry with no slot limit.
    pub fn unbounded() -> Self {
        Self {
            entries: Vec::new(),
            by_hash: FxHashMap::default(),
            capacity: None,
        }
    }

    /// Slot limit, or `None` if unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if every slot is taken.
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.entries.len() >= cap)
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a native type.
    ///
    /// Fails with `InvalidArgs` for an unusable name, `DuplicateType` if the
    /// name is taken, and `RegistryFull` when no slot is left.
    pub fn register<C, D>(&mut self, name: &str, constructor: C, dispatcher: D) -> StateResult<()>
    where
        C: Fn(&mut CreateArgs<'_>) -> StateResult<Handle> + Send + Sync + 'static,
        D: Fn(&mut InstanceCall<'_>) -> StateResult<Value> + Send + Sync + 'static,
    {
        self.register_native(
            name,
            NativeConstructor::new(constructor),
            NativeDispatcher::new(dispatcher),
        )
    }

    /// Register a native type from already-wrapped callables.
    pub fn register_native(
        &mut self,
        name: &str,
        constructor: NativeConstructor,
        dispatcher: NativeDispatcher,
    ) -> StateResult<()> {
        check_type_name(name)?;

        if let Some(cap) = self.capacity
            && self.entries.len() >= cap
        {
            tracing::warn!(type_name = name, capacity = cap, "type registry full");
            return Err(StateError::RegistryFull {
                type_name: name.to_string(),
                capacity: cap,
            });
        }

        let type_hash = TypeHash::from_name(name);
        if self.by_hash.contains_key(&type_hash) {
            return Err(StateError::DuplicateType(name.to_string()));
        }

        let index = self.entries.len();
        self.entries.push(RegisteredType {
            name: name.to_string(),
            type_hash,
            constructor,
            dispatcher,
        });
        self.by_hash.insert(type_hash, index);
        tracing::debug!(type_name = name, index, hash = %type_hash, "registered type");
        Ok(())
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Resolve a type name to its entry index.
    pub fn lookup_by_name(&self, name: &str) -> StateResult<usize> {
        self.by_hash
            .get(&TypeHash::from_name(name))
            .copied()
            .filter(|&index| self.entries[index].name == name)
            .ok_or_else(|| StateError::UnknownType {
                name: name.to_string(),
                known: self.type_names().map(str::to_string).collect(),
            })
    }

    /// Get an entry by index.
    pub fn get(&self, index: usize) -> Option<&RegisteredType> {
        self.entries.get(index)
    }

    /// Get an entry by type name.
    pub fn get_by_name(&self, name: &str) -> StateResult<&RegisteredType> {
        let index = self.lookup_by_name(name)?;
        Ok(&self.entries[index])
    }

    /// Get an entry by the fingerprint of its name.
    pub fn get_by_hash(&self, type_hash: TypeHash) -> Option<&RegisteredType> {
        self.by_hash.get(&type_hash).map(|&index| &self.entries[index])
    }

    /// Check if a type is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup_by_name(name).is_ok()
    }

    /// Registered type names, in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredType> {
        self.entries.iter()
    }
}
