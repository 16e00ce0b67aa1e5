//! Opaque Rust values stored in a container

use std::any::Any;
use std::sync::Arc;

/// A type-erased Rust value.
///
/// Lets real services live in the registry next to dynamic values; callers
/// get them back with [`NativeValue::downcast`].
#[derive(Clone)]
pub struct NativeValue {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl NativeValue {
    /// Wrap a value
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    /// Wrap an already shared value without copying it
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: value,
        }
    }

    /// The Rust type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the value as `T`
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Get a shared handle to the value as `T`
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Check whether two handles wrap the same value
    pub fn ptr_eq(a: &NativeValue, b: &NativeValue) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl std::fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NativeValue({})", self.type_name)
    }
}
