//! Store capability consumed by the repository.
//!
//! `DocumentStore` is the only seam between the repository and the backing
//! database. Every operation takes an optional session: with `None` it runs
//! standalone and takes effect immediately; with a session in a started
//! transaction it joins that transaction.

mod collection;
mod memory;

pub use memory::{InMemoryStore, StoreOp};

use crate::core::{Document, DocumentId, Result};
use crate::query::{DeleteOutcome, Filter, FindOptions, InsertManyOptions, Update, UpdateOutcome};
use crate::session::ClientSession;
use async_trait::async_trait;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one document, returning its `_id`.
    async fn insert_one(
        &self,
        collection: &str,
        doc: Document,
        session: Option<&ClientSession>,
    ) -> Result<DocumentId>;

    /// Insert several documents. In unordered mode every valid document is
    /// inserted even when others fail.
    async fn insert_many(
        &self,
        collection: &str,
        docs: Vec<Document>,
        options: InsertManyOptions,
        session: Option<&ClientSession>,
    ) -> Result<Vec<DocumentId>>;

    /// Matching documents in insertion order, windowed by `options`.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
        session: Option<&ClientSession>,
    ) -> Result<Vec<Document>>;

    /// Replace the first matching document, keeping its `_id`.
    async fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        replacement: Document,
        session: Option<&ClientSession>,
    ) -> Result<UpdateOutcome>;

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        session: Option<&ClientSession>,
    ) -> Result<UpdateOutcome>;

    async fn delete_one(
        &self,
        collection: &str,
        filter: &Filter,
        session: Option<&ClientSession>,
    ) -> Result<DeleteOutcome>;
}
