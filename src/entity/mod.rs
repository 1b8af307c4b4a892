//! Entity contract.
//!
//! Every type stored through a repository exposes a unique identifier and
//! serializes (via serde) to a document whose `_id` field holds it. Field
//! naming, optional-field omission and unknown-field capture are declared
//! with serde attributes on the type itself.

mod codec;

pub use codec::{from_document, to_document};

use crate::core::DocumentId;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Type name used to look up the backing collection.
    const KIND: &'static str;

    /// Nil for an entity whose id the repository should generate.
    fn id(&self) -> DocumentId;
}
