//! Evaluation context handed to filter sets.
//!
//! The context is how request-scoped values (the request, the view) reach a
//! filter set without the filter layer depending on the REST layer. Values are
//! borrowed and type-erased; readers downcast them back.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// A string-keyed, ordered map of borrowed, type-erased values.
///
/// # Examples
///
/// ```
/// use ufilter_filters::FilterContext;
///
/// let request = String::from("R");
/// let view = String::from("V");
///
/// let mut context = FilterContext::new();
/// context.insert("request", &request);
/// context.insert("view", &view);
///
/// assert_eq!(context.keys().collect::<Vec<_>>(), vec!["request", "view"]);
/// assert_eq!(context.get::<String>("request"), Some(&request));
/// assert!(context.get::<u32>("request").is_none());
/// ```
#[derive(Clone, Default)]
pub struct FilterContext<'a> {
    values: BTreeMap<String, &'a (dyn Any + Send + Sync)>,
}

impl<'a> FilterContext<'a> {
    /// Creates an empty context.
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Binds `key` to `value`, replacing any previous binding.
    pub fn insert(&mut self, key: impl Into<String>, value: &'a (dyn Any + Send + Sync)) {
        self.values.insert(key.into(), value);
    }

    /// Returns the value bound to `key` if it has type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&'a T> {
        self.get_raw(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns the type-erased value bound to `key`.
    pub fn get_raw(&self, key: &str) -> Option<&'a (dyn Any + Send + Sync)> {
        self.values.get(key).copied()
    }

    /// Returns the keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns `true` if `key` is bound.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for FilterContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterContext")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
