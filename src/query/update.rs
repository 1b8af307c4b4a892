use crate::core::{Result, StoreError};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Field-level update applied by `DocumentStore::update_one`.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Append `value` to the array at `path`
    Push { path: String, value: Value },
}

impl Update {
    pub fn push(path: &str, value: Value) -> Self {
        Update::Push {
            path: path.to_string(),
            value,
        }
    }
}

/// Typed selector for an array-valued field of `P` holding `S` elements.
///
/// Pairs the stored field path with an accessor, so the element type of a
/// push is checked at the call site. Usually built with [`array_field!`].
///
/// [`array_field!`]: crate::array_field
pub struct ArrayField<P, S> {
    path: &'static str,
    accessor: fn(&P) -> &[S],
}

impl<P, S> ArrayField<P, S> {
    pub const fn new(path: &'static str, accessor: fn(&P) -> &[S]) -> Self {
        Self { path, accessor }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Current elements of the field on `parent`.
    pub fn get<'a>(&self, parent: &'a P) -> &'a [S] {
        (self.accessor)(parent)
    }
}

impl<P, S: Serialize> ArrayField<P, S> {
    /// Build the push update appending `element`.
    pub fn push(&self, element: &S) -> Result<Update> {
        let value = serde_json::to_value(element).map_err(|e| {
            StoreError::Codec(format!("cannot encode element of '{}': {}", self.path, e))
        })?;
        Ok(Update::push(self.path, value))
    }
}

impl<P, S> Clone for ArrayField<P, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, S> Copy for ArrayField<P, S> {}

impl<P, S> fmt::Debug for ArrayField<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayField").field("path", &self.path).finish()
    }
}

/// Build an [`ArrayField`] for a `Vec` field of an entity.
///
/// The path is the field's name in the stored document, after any serde
/// renaming, so it is always spelled out.
///
/// ```ignore
/// let reviews = array_field!(Product, reviews => "reviews");
/// let items = array_field!(Cart, line_items => "lineItems");
/// ```
#[macro_export]
macro_rules! array_field {
    ($parent:ty, $field:ident => $path:expr) => {
        $crate::query::ArrayField::<$parent, _>::new($path, |p| &p.$field[..])
    };
}
