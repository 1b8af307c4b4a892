use crate::core::{Result, StoreError};
use crate::entity::Entity;
use std::collections::HashMap;
use std::sync::Arc;

/// Mapping from entity kind to the name of its backing collection.
///
/// Built once at startup and injected into every repository. Immutable after
/// construction; clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct CollectionBindings {
    names: Arc<HashMap<String, String>>,
}

impl CollectionBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `T` to `collection`, returning the extended table.
    pub fn with<T: Entity>(self, collection: &str) -> Result<Self> {
        self.with_kind(T::KIND, collection)
    }

    pub fn with_kind(self, kind: &str, collection: &str) -> Result<Self> {
        validate_collection_name(collection)?;

        if let Some(existing) = self.names.get(kind) {
            return Err(StoreError::Config(format!(
                "entity '{}' is already bound to collection '{}'",
                kind, existing
            )));
        }

        let mut names = (*self.names).clone();
        names.insert(kind.to_string(), collection.to_string());
        Ok(Self {
            names: Arc::new(names),
        })
    }

    /// Build from a kind → collection table, e.g. one read from configuration.
    pub fn from_map(map: HashMap<String, String>) -> Result<Self> {
        for collection in map.values() {
            validate_collection_name(collection)?;
        }
        Ok(Self {
            names: Arc::new(map),
        })
    }

    /// Collection bound to `T`.
    pub fn resolve<T: Entity>(&self) -> Result<&str> {
        self.resolve_kind(T::KIND)
    }

    pub fn resolve_kind(&self, kind: &str) -> Result<&str> {
        self.names
            .get(kind)
            .map(String::as_str)
            .ok_or_else(|| StoreError::UnboundEntity(kind.to_string()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub fn validate_collection_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "collection name cannot be empty"
    } else if name.contains('$') {
        "collection name cannot contain '$'"
    } else if name.contains('\0') {
        "collection name cannot contain NUL"
    } else if name.starts_with("system.") {
        "collection name cannot start with 'system.'"
    } else {
        return Ok(());
    };

    Err(StoreError::InvalidCollectionName(format!("{}: '{}'", reason, name)))
}
