//! Typed wrappers around native objects.
//!
//! A [`Handle`] owns one native object together with the name and
//! fingerprint of its registered type and the callback that destroys it.
//! The object is type-erased behind [`Any`]; recovering the concrete type is
//! a fingerprint compare followed by a checked downcast, never a cast.

use std::any::Any;
use std::fmt;

use crate::error::{StateError, StateResult};
use crate::type_hash::TypeHash;

/// Longest accepted type name, in bytes.
pub const MAX_TYPE_NAME_LEN: usize = 63;

type Deleter = Box<dyn FnOnce(Box<dyn Any + Send>) + Send>;

/// A native object wrapped with its type metadata.
///
/// The object is destroyed exactly once: by [`Handle::destroy`], or when the
/// handle is dropped. Destroying an already destroyed handle is a no-op.
pub struct Handle {
    type_name: String,
    type_hash: TypeHash,
    object: Option<Box<dyn Any + Send>>,
    deleter: Option<Deleter>,
}

impl Handle {
    /// Wrap `object` as an instance of `type_name`.
    ///
    /// The object is dropped when the handle is destroyed.
    pub fn wrap<T: Any + Send>(object: T, type_name: &str) -> StateResult<Self> {
        check_type_name(type_name)?;
        Ok(Self {
            type_name: type_name.to_string(),
            type_hash: TypeHash::from_name(type_name),
            object: Some(Box::new(object)),
            deleter: None,
        })
    }

    /// Wrap `object` with a custom destruction callback.
    ///
    /// `deleter` receives the object by value when the handle is destroyed.
    pub fn with_deleter<T, F>(object: T, type_name: &str, deleter: F) -> StateResult<Self>
    where
        T: Any + Send,
        F: FnOnce(T) + Send + 'static,
    {
        let mut handle = Self::wrap(object, type_name)?;
        handle.deleter = Some(Box::new(move |erased: Box<dyn Any + Send>| {
            if let Ok(object) = erased.downcast::<T>() {
                deleter(*object);
            }
        }));
        Ok(handle)
    }

    /// Name of the type this object was created as.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Fingerprint of [`Handle::type_name`].
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// Check the stored fingerprint against `expected`'s.
    #[inline]
    pub fn is_type(&self, expected: &str) -> bool {
        self.type_hash == TypeHash::from_name(expected)
    }

    /// Check if the wrapped object has already been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.object.is_none()
    }

    /// Borrow the object as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.as_ref()?.downcast_ref::<T>()
    }

    /// Mutably borrow the object as `T`, if it is one.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.object.as_mut()?.downcast_mut::<T>()
    }

    /// Destroy the wrapped object.
    ///
    /// Returns `true` if this call destroyed it, `false` if it was already
    /// gone.
    pub fn destroy(&mut self) -> bool {
        let Some(object) = self.object.take() else {
            tracing::warn!(type_name = %self.type_name, "handle already destroyed");
            return false;
        };
        match self.deleter.take() {
            Some(deleter) => deleter(object),
            None => drop(object),
        }
        true
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if self.object.is_some() {
            self.destroy();
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("type_name", &self.type_name)
            .field("type_hash", &self.type_hash)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

/// Check a type name against the rules [`Handle::wrap`] applies.
pub fn check_type_name(type_name: &str) -> StateResult<()> {
    if type_name.is_empty() {
        return Err(StateError::InvalidArgs("type name is empty".to_string()));
    }
    if type_name.len() > MAX_TYPE_NAME_LEN {
        return Err(StateError::InvalidArgs(format!(
            "type name \"{type_name}\" is longer than {MAX_TYPE_NAME_LEN} bytes"
        )));
    }
    if type_name.contains('\0') {
        return Err(StateError::InvalidArgs(format!(
            "type name \"{}\" contains a NUL byte",
            type_name.escape_debug()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    struct Camera {
        id: u32,
    }

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn wrap_records_fingerprint() {
        let h = Handle::wrap(Camera { id: 1 }, "camera").unwrap();
        assert_eq!(h.type_name(), "camera");
        assert_eq!(h.type_hash(), TypeHash::from_name("camera"));
        assert!(h.is_type("camera"));
        assert!(!h.is_type("image"));
    }

    #[test]
    fn downcast() {
        let mut h = Handle::wrap(Camera { id: 3 }, "camera").unwrap();
        assert_eq!(h.downcast_ref::<Camera>(), Some(&Camera { id: 3 }));
        assert!(h.downcast_ref::<String>().is_none());
        h.downcast_mut::<Camera>().unwrap().id = 4;
        assert_eq!(h.downcast_ref::<Camera>().unwrap().id, 4);
    }

    #[test]
    fn rejects_bad_type_names() {
        assert!(matches!(
            Handle::wrap(1u8, ""),
            Err(StateError::InvalidArgs(_))
        ));
        let long = "x".repeat(MAX_TYPE_NAME_LEN + 1);
        assert!(Handle::wrap(1u8, &long).is_err());
        assert!(Handle::wrap(1u8, &"x".repeat(MAX_TYPE_NAME_LEN)).is_ok());
        assert!(Handle::wrap(1u8, "a\0b").is_err());
    }

    #[test]
    fn destroy_runs_deleter_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut h = Handle::with_deleter(Camera { id: 9 }, "camera", move |cam: Camera| {
            assert_eq!(cam.id, 9);
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert!(h.destroy());
        assert!(h.is_destroyed());
        assert!(!h.destroy());
        drop(h);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_destroys() {
        let drops = Arc::new(AtomicUsize::new(0));
        let h = Handle::wrap(DropCounter(Arc::clone(&drops)), "counter").unwrap();
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        drop(h);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn destroyed_handle_has_no_object() {
        let mut h = Handle::wrap(Camera { id: 1 }, "camera").unwrap();
        h.destroy();
        assert!(h.downcast_ref::<Camera>().is_none());
    }
}
