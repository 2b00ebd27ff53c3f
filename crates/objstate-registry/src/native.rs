//! Native constructor and instance-dispatcher storage.

use std::fmt;
use std::sync::Arc;

use objstate_core::{Handle, StateResult, Value};

use crate::call::{CreateArgs, InstanceCall};

/// Trait for native code that builds a new object for `create`.
pub trait Construct {
    /// Build the object described by `args` and wrap it in a handle.
    fn construct(&self, args: &mut CreateArgs<'_>) -> StateResult<Handle>;
}

impl<F> Construct for F
where
    F: Fn(&mut CreateArgs<'_>) -> StateResult<Handle>,
{
    fn construct(&self, args: &mut CreateArgs<'_>) -> StateResult<Handle> {
        (self)(args)
    }
}

/// Trait for native code that handles the subcommands of one type.
pub trait Dispatch {
    /// Run the subcommand carried by `call`.
    fn dispatch(&self, call: &mut InstanceCall<'_>) -> StateResult<Value>;
}

impl<F> Dispatch for F
where
    F: Fn(&mut InstanceCall<'_>) -> StateResult<Value>,
{
    fn dispatch(&self, call: &mut InstanceCall<'_>) -> StateResult<Value> {
        (self)(call)
    }
}

/// Type-erased constructor.
///
/// The inner callable is wrapped in `Arc` so that registry entries and
/// bindings can share it.
#[derive(Clone)]
pub struct NativeConstructor {
    inner: Arc<dyn Construct + Send + Sync>,
}

impl NativeConstructor {
    /// Wrap a constructor.
    pub fn new<F>(f: F) -> Self
    where
        F: Construct + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Call the constructor.
    pub fn call(&self, args: &mut CreateArgs<'_>) -> StateResult<Handle> {
        self.inner.construct(args)
    }
}

impl fmt::Debug for NativeConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeConstructor").finish_non_exhaustive()
    }
}

/// Type-erased instance dispatcher.
#[derive(Clone)]
pub struct NativeDispatcher {
    inner: Arc<dyn Dispatch + Send + Sync>,
}

impl NativeDispatcher {
    /// Wrap a dispatcher.
    pub fn new<F>(f: F) -> Self
    where
        F: Dispatch + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Call the dispatcher.
    pub fn call(&self, call: &mut InstanceCall<'_>) -> StateResult<Value> {
        self.inner.dispatch(call)
    }
}

impl fmt::Debug for NativeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeDispatcher").finish_non_exhaustive()
    }
}
