//! VariableStore - name to handle table for one context.
//!
//! The store owns every live [`Handle`] of a context, keyed by the name the
//! host uses to reach it. It also owns the counter behind generated names.
//!
//! # Thread Safety
//!
//! `VariableStore` is **not synchronized**. All operations are expected to
//! run on the host's command thread; a multi-threaded host must guard the
//! owning context with a lock.
//!
//! # Example
//!
//! ```
//! use objstate_core::{Handle, Overwrite, VariableStore};
//!
//! let mut store = VariableStore::new("cobj#", 4);
//! let name = store.unique_name();
//! assert_eq!(name, "cobj#0000");
//!
//! store.register(&name, Handle::wrap(42u32, "answer").unwrap(), Overwrite::DeleteOld);
//! assert_eq!(store.resolve_as::<u32>(&name, "answer").unwrap(), &42);
//! ```

use std::any::Any;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::error::{StateError, StateResult};
use crate::handle::Handle;

/// Widest zero-padding a generated name suffix can have; a `u64` has at most
/// 20 decimal digits.
pub const MAX_SUFFIX_WIDTH: usize = 20;

/// What to do with the handle already bound under a name being registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overwrite {
    /// Destroy the previous handle.
    DeleteOld,
    /// Leave the previous handle alive and give it back to the caller.
    IgnoreOld,
}

/// Per-context table of named handles.
#[derive(Debug)]
pub struct VariableStore {
    entries: IndexMap<String, Handle, FxBuildHasher>,
    uid: u64,
    prefix: String,
    suffix_width: usize,
}

impl VariableStore {
    /// Create an empty store whose generated names are `prefix` followed by
    /// a sequence number zero-padded to `suffix_width` digits.
    ///
    /// Widths above [`MAX_SUFFIX_WIDTH`] are clamped to it.
    pub fn new(prefix: impl Into<String>, suffix_width: usize) -> Self {
        Self {
            entries: IndexMap::default(),
            uid: 0,
            prefix: prefix.into(),
            suffix_width: suffix_width.min(MAX_SUFFIX_WIDTH),
        }
    }

    /// Zero-padding width of generated name suffixes.
    pub fn suffix_width(&self) -> usize {
        self.suffix_width
    }

    /// Prefix of generated names.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no name is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if `name` is bound.
    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get the handle bound under `name`.
    pub fn get(&self, name: &str) -> StateResult<&Handle> {
        self.entries
            .get(name)
            .ok_or_else(|| StateError::UnknownVariable(name.to_string()))
    }

    /// Get the handle bound under `name` mutably.
    pub fn get_mut(&mut self, name: &str) -> StateResult<&mut Handle> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| StateError::UnknownVariable(name.to_string()))
    }

    /// Get the handle bound under `name`, checking it is a `expected_type`.
    ///
    /// Fails with `UnknownVariable` if nothing is bound and with
    /// `TypeMismatch` if the stored fingerprint differs.
    pub fn resolve(&self, name: &str, expected_type: &str) -> StateResult<&Handle> {
        let handle = self.get(name)?;
        check_type(name, handle, expected_type)?;
        Ok(handle)
    }

    /// Mutable version of [`VariableStore::resolve`].
    pub fn resolve_mut(&mut self, name: &str, expected_type: &str) -> StateResult<&mut Handle> {
        let handle = self.get_mut(name)?;
        check_type(name, handle, expected_type)?;
        Ok(handle)
    }

    /// Resolve `name` as `expected_type` and borrow its object as `T`.
    pub fn resolve_as<T: Any>(&self, name: &str, expected_type: &str) -> StateResult<&T> {
        let handle = self.resolve(name, expected_type)?;
        handle
            .downcast_ref::<T>()
            .ok_or_else(|| native_mismatch::<T>(name, handle.type_name()))
    }

    /// Resolve `name` as `expected_type` and mutably borrow its object as `T`.
    pub fn resolve_as_mut<T: Any>(&mut self, name: &str, expected_type: &str) -> StateResult<&mut T> {
        // The fingerprint check passed, so the stored type name is `expected_type`.
        self.resolve_mut(name, expected_type)?
            .downcast_mut::<T>()
            .ok_or_else(|| native_mismatch::<T>(name, expected_type))
    }

    // ==========================================================================
    // Mutation
    // ==========================================================================

    /// Bind `handle` under `name`.
    ///
    /// If another handle was bound under `name`, [`Overwrite::DeleteOld`]
    /// destroys it and returns `None`; [`Overwrite::IgnoreOld`] leaves it
    /// alive and returns it.
    pub fn register(&mut self, name: &str, handle: Handle, mode: Overwrite) -> Option<Handle> {
        let previous = self.entries.insert(name.to_string(), handle)?;
        match mode {
            Overwrite::DeleteOld => {
                tracing::debug!(
                    name,
                    old_type = previous.type_name(),
                    "overwriting variable, destroying previous handle"
                );
                drop(previous);
                None
            }
            Overwrite::IgnoreOld => Some(previous),
        }
    }

    /// Unbind `name` and destroy its handle.
    pub fn delete(&mut self, name: &str) -> StateResult<()> {
        let mut handle = self
            .entries
            .shift_remove(name)
            .ok_or_else(|| StateError::UnknownVariable(name.to_string()))?;
        if !handle.is_destroyed() {
            handle.destroy();
        }
        tracing::debug!(name, type_name = handle.type_name(), "deleted variable");
        Ok(())
    }

    /// Destroy every handle, returning how many were bound.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        // Destroy in reverse creation order so later objects go first.
        while let Some((name, handle)) = self.entries.pop() {
            tracing::trace!(name, type_name = handle.type_name(), "destroying on clear");
            drop(handle);
        }
        count
    }

    // ==========================================================================
    // Enumeration
    // ==========================================================================

    /// Snapshot of the bound names, in binding order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Borrow every handle, in binding order.
    ///
    /// The borrow ends before the next mutating call.
    pub fn elements(&self) -> Vec<&Handle> {
        self.entries.values().collect()
    }

    /// Iterate over `(name, handle)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Handle)> {
        self.entries.iter().map(|(name, handle)| (name.as_str(), handle))
    }

    /// Return the first handle matching `predicate`.
    pub fn search<F>(&self, mut predicate: F) -> Option<&Handle>
    where
        F: FnMut(&Handle) -> bool,
    {
        self.entries.values().find(|handle| predicate(handle))
    }

    /// Return the name of the first handle matching `predicate`.
    pub fn search_name<F>(&self, mut predicate: F) -> Option<&str>
    where
        F: FnMut(&Handle) -> bool,
    {
        self.entries
            .iter()
            .find(|(_, handle)| predicate(handle))
            .map(|(name, _)| name.as_str())
    }

    // ==========================================================================
    // Name generation
    // ==========================================================================

    /// Generate a name that is not currently bound.
    ///
    /// The sequence number only moves forward, so consecutive calls return
    /// distinct, increasing names and a deleted name is not handed out again.
    /// Past the padding width the suffix simply grows.
    pub fn unique_name(&mut self) -> String {
        loop {
            let candidate = format!("{}{:0width$}", self.prefix, self.uid, width = self.suffix_width);
            self.uid = self.uid.wrapping_add(1);
            if !self.exists(&candidate) {
                tracing::trace!(name = %candidate, "generated unique name");
                return candidate;
            }
        }
    }

    /// The sequence number the next generated name starts from.
    pub fn next_uid(&self) -> u64 {
        self.uid
    }
}

impl Drop for VariableStore {
    fn drop(&mut self) {
        self.clear();
    }
}

fn check_type(name: &str, handle: &Handle, expected_type: &str) -> StateResult<()> {
    if handle.is_type(expected_type) {
        Ok(())
    } else {
        Err(StateError::TypeMismatch {
            name: name.to_string(),
            expected: expected_type.to_string(),
            actual: handle.type_name().to_string(),
        })
    }
}

fn native_mismatch<T: Any>(name: &str, actual: &str) -> StateError {
    StateError::TypeMismatch {
        name: name.to_string(),
        expected: std::any::type_name::<T>().to_string(),
        actual: actual.to_string(),
    }
}
