use super::Repository;
use crate::collection::CollectionBindings;
use crate::core::{Document, DocumentId, ID_FIELD, Result};
use crate::entity::{Entity, from_document, to_document};
use crate::query::{ArrayField, Filter, FindOptions, InsertManyOptions};
use crate::result::{ErrorKind, RepoResult};
use crate::session::ClientSession;
use crate::store::DocumentStore;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{Instrument, Level, event, info_span};

/// `Repository` implementation for any entity type, bound to the collection
/// the bindings assign to it.
///
/// Holds no per-call state, so one instance can serve concurrent callers.
pub struct GenericRepository<T: Entity> {
    store: Arc<dyn DocumentStore>,
    collection: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> GenericRepository<T> {
    /// Fails with `StoreError::UnboundEntity` if `T` has no collection.
    pub fn new(store: Arc<dyn DocumentStore>, bindings: &CollectionBindings) -> Result<Self> {
        let collection = bindings.resolve::<T>()?.to_string();
        Ok(Self {
            store,
            collection,
            _entity: PhantomData,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Run one store call, translating a store fault into a failure of `kind`.
    async fn run<R>(
        &self,
        op: &'static str,
        kind: ErrorKind,
        session: Option<&ClientSession>,
        call: impl Future<Output = Result<R>>,
    ) -> RepoResult<R> {
        let span = info_span!(
            "repository",
            op,
            entity = T::KIND,
            collection = %self.collection,
            session = ?session.map(ClientSession::id),
            in_transaction = session.is_some_and(ClientSession::in_transaction),
        );

        match call.instrument(span.clone()).await {
            Ok(value) => {
                event!(parent: &span, Level::DEBUG, "repository call succeeded");
                RepoResult::success(value)
            }
            Err(err) => {
                event!(parent: &span, Level::WARN, kind = %kind, error = %err, "repository call failed");
                RepoResult::failure(kind, err.to_string())
            }
        }
    }

    fn reject<R>(&self, op: &'static str, kind: ErrorKind, message: String) -> RepoResult<R> {
        event!(
            Level::WARN,
            op,
            entity = T::KIND,
            kind = %kind,
            "{}",
            message
        );
        RepoResult::failure(kind, message)
    }

    /// Encode for insertion, assigning an id to entities that have none.
    fn encode_new(entity: &T) -> Result<Document> {
        let mut doc = to_document(entity)?;
        if entity.id().is_nil() {
            doc.insert(
                ID_FIELD.to_string(),
                Value::String(DocumentId::generate().to_string()),
            );
        }
        Ok(doc)
    }

    fn decode_all(docs: Vec<Document>) -> Result<Vec<T>> {
        docs.into_iter().map(from_document).collect()
    }
}

impl<T: Entity> Clone for GenericRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> std::fmt::Debug for GenericRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericRepository")
            .field("entity", &T::KIND)
            .field("collection", &self.collection)
            .finish()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for GenericRepository<T> {
    async fn create<'e, E>(
        &self,
        entity: E,
        session: Option<&ClientSession>,
    ) -> RepoResult<DocumentId>
    where
        E: Into<Option<&'e T>> + Send,
    {
        let entity: Option<&T> = entity.into();
        let Some(entity) = entity else {
            return self.reject("create", ErrorKind::EntityIsNull, format!("{} is null", T::KIND));
        };

        self.run("create", ErrorKind::CreateEntityError, session, async {
            let doc = Self::encode_new(entity)?;
            self.store.insert_one(&self.collection, doc, session).await
        })
        .await
    }

    async fn get_by_id(
        &self,
        id: DocumentId,
        session: Option<&ClientSession>,
    ) -> RepoResult<Option<T>> {
        self.run("get_by_id", ErrorKind::GetEntityByIdError, session, async {
            let docs = self
                .store
                .find(
                    &self.collection,
                    &Filter::by_id(id),
                    FindOptions::new().limit(1),
                    session,
                )
                .await?;
            docs.into_iter().next().map(from_document).transpose()
        })
        .await
    }

    async fn get_all(
        &self,
        page: usize,
        page_size: usize,
        session: Option<&ClientSession>,
    ) -> RepoResult<Vec<T>> {
        if page == 0 || page_size == 0 {
            return self.reject(
                "get_all",
                ErrorKind::InvalidPagination,
                format!(
                    "page and page size must be at least 1 (page={}, page_size={})",
                    page, page_size
                ),
            );
        }

        self.run("get_all", ErrorKind::GetAllEntitiesError, session, async {
            let docs = self
                .store
                .find(
                    &self.collection,
                    &Filter::Empty,
                    FindOptions::page(page, page_size),
                    session,
                )
                .await?;
            Self::decode_all(docs)
        })
        .await
    }

    async fn get_by_predicate(
        &self,
        filter: &Filter,
        session: Option<&ClientSession>,
    ) -> RepoResult<Vec<T>> {
        self.run("get_by_predicate", ErrorKind::GetByPredicateError, session, async {
            let docs = self
                .store
                .find(&self.collection, filter, FindOptions::new(), session)
                .await?;
            Self::decode_all(docs)
        })
        .await
    }

    async fn update(&self, entity: &T, session: Option<&ClientSession>) -> RepoResult<bool> {
        self.run("update", ErrorKind::UpdateEntityError, session, async {
            let doc = to_document(entity)?;
            let outcome = self
                .store
                .replace_one(&self.collection, &Filter::by_id(entity.id()), doc, session)
                .await?;
            Ok(outcome.modified > 0)
        })
        .await
    }

    async fn delete(&self, id: DocumentId, session: Option<&ClientSession>) -> RepoResult<bool> {
        self.run("delete", ErrorKind::DeleteEntityError, session, async {
            let outcome = self
                .store
                .delete_one(&self.collection, &Filter::by_id(id), session)
                .await?;
            Ok(outcome.deleted > 0)
        })
        .await
    }

    async fn insert_many<'e, E>(
        &self,
        entities: E,
        session: Option<&ClientSession>,
    ) -> RepoResult<Vec<DocumentId>>
    where
        E: Into<Option<&'e [T]>> + Send,
    {
        let entities: Option<&[T]> = entities.into();
        let Some(entities) = entities else {
            return self.reject(
                "insert_many",
                ErrorKind::EntitiesIsNull,
                "Entities list is null".to_string(),
            );
        };
        if entities.is_empty() {
            return RepoResult::success(Vec::new());
        }

        self.run("insert_many", ErrorKind::InsertManyEntitiesError, session, async {
            let docs = entities
                .iter()
                .map(Self::encode_new)
                .collect::<Result<Vec<_>>>()?;
            self.store
                .insert_many(&self.collection, docs, InsertManyOptions::unordered(), session)
                .await
        })
        .await
    }

    async fn add_subdocument<S>(
        &self,
        parent_id: DocumentId,
        field: &ArrayField<T, S>,
        subdocument: &S,
        session: Option<&ClientSession>,
    ) -> RepoResult<bool>
    where
        S: Serialize + Send + Sync,
    {
        self.run("add_subdocument", ErrorKind::AddSubdocumentError, session, async {
            let update = field.push(subdocument)?;
            // The stored parent must already carry the array under this path
            let filter = Filter::by_id(parent_id).and(Filter::exists(field.path(), true));
            let outcome = self
                .store
                .update_one(&self.collection, &filter, &update, session)
                .await?;
            Ok(outcome.modified > 0)
        })
        .await
    }
}
