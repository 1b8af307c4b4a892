//! Generic repository over a `DocumentStore`.
//!
//! Every operation reports failure as a `RepoResult` value; nothing a store
//! does wrong escapes as a panic or an `Err`. Every operation takes an
//! optional session: pass the caller's session to every call that must be
//! part of its transaction.

mod generic;

pub use generic::GenericRepository;

use crate::core::DocumentId;
use crate::entity::Entity;
use crate::query::{ArrayField, Filter};
use crate::result::RepoResult;
use crate::session::ClientSession;
use async_trait::async_trait;
use serde::Serialize;

/// Page used by `get_all` when the caller has no preference.
pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert `entity`, returning its id.
    ///
    /// An entity with a nil id is stored under a freshly generated one. The
    /// caller's value is not touched, so use the returned id to read it back.
    /// `None` fails with `EntityIsNull` without contacting the store.
    async fn create<'e, E>(
        &self,
        entity: E,
        session: Option<&ClientSession>,
    ) -> RepoResult<DocumentId>
    where
        E: Into<Option<&'e T>> + Send;

    /// The entity with `id`, or `None` when there is no such entity.
    async fn get_by_id(
        &self,
        id: DocumentId,
        session: Option<&ClientSession>,
    ) -> RepoResult<Option<T>>;

    /// One page of entities in storage order. `page` is 1-based; both
    /// arguments must be at least 1.
    async fn get_all(
        &self,
        page: usize,
        page_size: usize,
        session: Option<&ClientSession>,
    ) -> RepoResult<Vec<T>>;

    /// Every entity matching `filter`, unpaginated.
    async fn get_by_predicate(
        &self,
        filter: &Filter,
        session: Option<&ClientSession>,
    ) -> RepoResult<Vec<T>>;

    /// Replace the stored entity with the same id. `true` iff anything changed.
    async fn update(&self, entity: &T, session: Option<&ClientSession>) -> RepoResult<bool>;

    /// `true` iff a document was removed; deleting a missing id is not a
    /// failure.
    async fn delete(&self, id: DocumentId, session: Option<&ClientSession>) -> RepoResult<bool>;

    /// Unordered bulk insert. Ids come back in input order, generated ones
    /// included. `None` fails with `EntitiesIsNull` without contacting the
    /// store.
    async fn insert_many<'e, E>(
        &self,
        entities: E,
        session: Option<&ClientSession>,
    ) -> RepoResult<Vec<DocumentId>>
    where
        E: Into<Option<&'e [T]>> + Send;

    /// Append `subdocument` to the array `field` of the parent, without
    /// reading the parent first. `true` iff the parent exists, its stored
    /// document has the array under `field`'s path, and it was modified.
    async fn add_subdocument<S>(
        &self,
        parent_id: DocumentId,
        field: &ArrayField<T, S>,
        subdocument: &S,
        session: Option<&ClientSession>,
    ) -> RepoResult<bool>
    where
        S: Serialize + Send + Sync;
}
