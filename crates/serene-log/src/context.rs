//! Request-scoped attribute stores.
//!
//! Two independent [`AttributeStore`]s travel in a request's
//! [`Context`](serene_core::Context):
//!
//! - **labels**: free-form attributes, rendered under the ECS `labels` object
//! - **ECS fields**: schema-fixed attributes such as `http.request.method`,
//!   rendered as top-level keys
//!
//! Adding attributes never mutates a store. It derives a new context holding
//! the extended store, with the new attributes placed before those inherited
//! from the parent.

use crate::attr::Attribute;
use serene_core::Context;
use std::sync::Arc;

/// An immutable, ordered list of attributes.
///
/// Cloning is cheap; extending returns a new store.
///
/// # Example
///
/// ```
/// use serene_log::{Attribute, AttributeStore};
///
/// let base = AttributeStore::new().extend([Attribute::string("a", "1")]);
/// let grown = base.extend([Attribute::string("b", "2")]);
///
/// assert_eq!(base.len(), 1);
/// let keys: Vec<_> = grown.iter().map(|a| a.key.as_str()).collect();
/// assert_eq!(keys, ["b", "a"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    attrs: Arc<Vec<Attribute>>,
}

impl AttributeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new store with `attrs` followed by the current entries.
    #[must_use]
    pub fn extend<I: IntoIterator<Item = Attribute>>(&self, attrs: I) -> Self {
        let mut combined: Vec<Attribute> = attrs.into_iter().collect();
        combined.extend(self.attrs.iter().cloned());
        Self {
            attrs: Arc::new(combined),
        }
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attrs.iter()
    }

    /// Returns the entries as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Returns an owned copy of the entries.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Attribute> {
        self.attrs.as_ref().clone()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns true if the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl FromIterator<Attribute> for AttributeStore {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self {
            attrs: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<'a> IntoIterator for &'a AttributeStore {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Context key for the labels store.
#[derive(Debug, Clone)]
struct Labels(AttributeStore);

/// Context key for the ECS fields store.
#[derive(Debug, Clone)]
struct EcsFields(AttributeStore);

/// Returns a context whose labels store holds `attrs` followed by the
/// labels already present in `ctx`.
///
/// # Example
///
/// ```
/// use serene_core::Context;
/// use serene_log::{add_label_attrs, label_attrs, Attribute};
///
/// let ctx = add_label_attrs(&Context::new(), [Attribute::string("tenant", "acme")]);
/// assert_eq!(label_attrs(&ctx).len(), 1);
/// ```
pub fn add_label_attrs<I: IntoIterator<Item = Attribute>>(ctx: &Context, attrs: I) -> Context {
    let store = label_attrs(ctx).extend(attrs);
    ctx.with_value(Labels(store))
}

/// Returns the labels store of `ctx`; empty if none was attached.
#[must_use]
pub fn label_attrs(ctx: &Context) -> AttributeStore {
    ctx.value::<Labels>()
        .map(|labels| labels.0.clone())
        .unwrap_or_default()
}

/// Returns a context whose ECS store holds `attrs` followed by the ECS
/// fields already present in `ctx`.
///
/// Only the HTTP attributes middleware writes ECS fields.
pub(crate) fn add_ecs_attrs<I: IntoIterator<Item = Attribute>>(ctx: &Context, attrs: I) -> Context {
    let store = ecs_attrs(ctx).extend(attrs);
    ctx.with_value(EcsFields(store))
}

/// Returns the ECS fields store of `ctx`; empty if none was attached.
#[must_use]
pub fn ecs_attrs(ctx: &Context) -> AttributeStore {
    ctx.value::<EcsFields>()
        .map(|fields| fields.0.clone())
        .unwrap_or_default()
}

/// Returns true if a labels store was attached to `ctx`, even an empty one.
#[must_use]
pub fn has_label_store(ctx: &Context) -> bool {
    ctx.contains::<Labels>()
}

/// Returns true if an ECS fields store was attached to `ctx`, even an empty one.
#[must_use]
pub fn has_ecs_store(ctx: &Context) -> bool {
    ctx.contains::<EcsFields>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(store: &AttributeStore) -> Vec<&str> {
        store.iter().map(|a| a.key.as_str()).collect()
    }

    #[test]
    fn test_missing_stores_are_empty() {
        let ctx = Context::new();
        assert!(label_attrs(&ctx).is_empty());
        assert!(ecs_attrs(&ctx).is_empty());
        assert!(!has_label_store(&ctx));
        assert!(!has_ecs_store(&ctx));
    }

    #[test]
    fn test_label_round_trip() {
        let ctx = add_label_attrs(&Context::new(), [Attribute::string("custom_key", "custom_value")]);
        let labels = label_attrs(&ctx);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.as_slice()[0].value.as_str(), Some("custom_value"));
    }

    #[test]
    fn test_nested_additions_accumulate() {
        let outer = add_label_attrs(&Context::new(), [Attribute::string("outer", "1")]);
        let inner = add_label_attrs(&outer, [Attribute::string("inner", "2")]);

        assert_eq!(keys(&label_attrs(&inner)), ["inner", "outer"]);
        // the parent context still sees only its own label
        assert_eq!(keys(&label_attrs(&outer)), ["outer"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let ctx = add_label_attrs(&Context::new(), [Attribute::string("k", "a")]);
        let ctx = add_label_attrs(&ctx, [Attribute::string("k", "b")]);
        assert_eq!(label_attrs(&ctx).len(), 2);
    }

    #[test]
    fn test_stores_are_independent() {
        let ctx = add_ecs_attrs(&Context::new(), [Attribute::string("http.request.method", "GET")]);
        let ctx = add_label_attrs(&ctx, []);

        assert_eq!(keys(&ecs_attrs(&ctx)), ["http.request.method"]);
        assert!(label_attrs(&ctx).is_empty());
        assert!(has_label_store(&ctx));
        assert!(has_ecs_store(&ctx));
    }

    #[test]
    fn test_store_from_iterator() {
        let store: AttributeStore = vec![Attribute::int("a", 1), Attribute::int("b", 2)]
            .into_iter()
            .collect();
        assert_eq!(keys(&store), ["a", "b"]);
        assert_eq!(store.to_vec().len(), 2);
    }
}
