//! Request-scoped context.
//!
//! A [`Context`] is an immutable bag of values keyed by type. Deriving a new
//! context never touches the parent, so a context can be shared freely between
//! the layers that handle one request while concurrent requests each carry
//! their own.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Entry = Arc<dyn Any + Send + Sync>;

/// Immutable, type-keyed value bag that travels with a request.
///
/// Values are stored by their type: storing a second value of the same type
/// shadows the first in the derived context only.
///
/// # Example
///
/// ```
/// use serene_core::Context;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct RequestCount(u32);
///
/// let ctx = Context::new().with_value(RequestCount(1));
/// let next = ctx.with_value(RequestCount(2));
///
/// assert_eq!(ctx.value::<RequestCount>(), Some(&RequestCount(1)));
/// assert_eq!(next.value::<RequestCount>(), Some(&RequestCount(2)));
/// ```
#[derive(Clone, Default)]
pub struct Context {
    values: Arc<HashMap<TypeId, Entry>>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new context in which `T` maps to `value`.
    ///
    /// Entries of other types are shared with `self`.
    #[must_use]
    pub fn with_value<T: Send + Sync + 'static>(&self, value: T) -> Self {
        let mut values = (*self.values).clone();
        values.insert(TypeId::of::<T>(), Arc::new(value));
        Self {
            values: Arc::new(values),
        }
    }

    /// Returns the value stored for `T`, if any.
    #[must_use]
    pub fn value<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|entry| (**entry).downcast_ref::<T>())
    }

    /// Returns true if a value of type `T` is stored.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.values.len())
            .finish()
    }
}
