//! In-memory document store with snapshot-isolated transactions.
//!
//! Committed state lives behind one async `RwLock`. A transaction captures a
//! snapshot of it on its first operation and works on a private copy; commit
//! re-validates every written document against committed state and applies
//! them under a single write lock (first committer wins).

use super::DocumentStore;
use super::collection::{CollectionData, Snapshot, StoredDocument};
use crate::collection::validate_collection_name;
use crate::config::StoreConfig;
use crate::core::document::{document_id, push_at_path};
use crate::core::{Document, DocumentId, ID_FIELD, Result, StoreError};
use crate::query::{DeleteOutcome, Filter, FindOptions, InsertManyOptions, Update, UpdateOutcome};
use crate::session::{ClientSession, SessionId, TransactionCoordinator, TxnKey};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Store operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    InsertOne,
    InsertMany,
    Find,
    ReplaceOne,
    UpdateOne,
    DeleteOne,
    Commit,
}

/// Private state of one open transaction.
struct Workspace {
    txn_number: u64,
    /// Committed state as of the first operation
    base: Snapshot,
    /// `base` plus this transaction's own writes
    view: Snapshot,
    writes: HashSet<(String, DocumentId)>,
}

impl Workspace {
    fn new(txn_number: u64, base: Snapshot) -> Self {
        Self {
            txn_number,
            view: base.clone(),
            base,
            writes: HashSet::new(),
        }
    }
}

type Journal = Vec<(String, DocumentId)>;

pub struct InMemoryStore {
    client_id: u64,
    database: String,
    committed: RwLock<Snapshot>,
    transactions: Mutex<HashMap<SessionId, Workspace>>,
    next_seq: AtomicU64,
    next_version: AtomicU64,
    faults: Mutex<HashMap<StoreOp, String>>,
    operation_timeout: Option<Duration>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Self::with_config(&StoreConfig::new("test"))
    }

    pub fn with_config(config: &StoreConfig) -> Arc<Self> {
        Arc::new(Self {
            client_id: NEXT_CLIENT_ID.fetch_add(1, Ordering::SeqCst),
            database: config.database.clone(),
            committed: RwLock::new(Snapshot::new()),
            transactions: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(1),
            next_version: AtomicU64::new(1),
            faults: Mutex::new(HashMap::new()),
            operation_timeout: config.operation_timeout,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Open a new session on this client.
    pub fn start_session(self: &Arc<Self>) -> ClientSession {
        ClientSession::new(self.clone())
    }

    /// Make the next call of `op` fail with `message`.
    pub fn fail_next(&self, op: StoreOp, message: &str) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.insert(op, message.to_string());
        }
    }

    /// Committed document count of a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.committed
            .read()
            .await
            .get(collection)
            .map(CollectionData::len)
            .unwrap_or(0)
    }

    /// Number of transactions currently holding a workspace.
    pub fn open_transactions(&self) -> usize {
        self.transactions.lock().map(|t| t.len()).unwrap_or(0)
    }

    fn take_fault(&self, op: StoreOp) -> Result<()> {
        match self.faults.lock()?.remove(&op) {
            Some(message) => {
                debug!("Injected failure for {:?}: {}", op, message);
                Err(StoreError::Injected(message))
            }
            None => Ok(()),
        }
    }

    fn check_session(&self, session: Option<&ClientSession>) -> Result<Option<TxnKey>> {
        match session {
            None => Ok(None),
            Some(session) if session.client_id() != self.client_id => {
                Err(StoreError::SessionMismatch(session.id().to_string()))
            }
            Some(session) => Ok(session.active_transaction()),
        }
    }

    async fn timed<F: Future>(&self, what: &str, fut: F) -> Result<F::Output> {
        match self.operation_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| StoreError::Timeout(format!("{} exceeded {:?}", what, limit))),
            None => Ok(fut.await),
        }
    }

    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst)
    }

    fn next_version(&self) -> u64 {
        self.next_version.fetch_add(1, Ordering::SeqCst)
    }

    /// Run a read against committed state or the session's transaction view.
    async fn read<R>(
        &self,
        session: Option<&ClientSession>,
        f: impl FnOnce(&Snapshot) -> Result<R>,
    ) -> Result<R> {
        match self.check_session(session)? {
            Some(txn) => self.in_workspace(txn, |ws| f(&ws.view)).await,
            None => {
                let committed = self.timed("read", self.committed.read()).await?;
                f(&*committed)
            }
        }
    }

    /// Run a write against committed state or the session's transaction view.
    ///
    /// `f` records every document it touches in the journal; inside a
    /// transaction those become the write set checked at commit.
    async fn write<R>(
        &self,
        session: Option<&ClientSession>,
        f: impl FnOnce(&mut Snapshot, &mut Journal) -> Result<R>,
    ) -> Result<R> {
        match self.check_session(session)? {
            Some(txn) => {
                self.in_workspace(txn, |ws| {
                    let mut journal = Journal::new();
                    let result = f(&mut ws.view, &mut journal);
                    ws.writes.extend(journal);
                    result
                })
                .await
            }
            None => {
                let mut committed = self.timed("write", self.committed.write()).await?;
                f(&mut *committed, &mut Journal::new())
            }
        }
    }

    async fn in_workspace<R>(
        &self,
        txn: TxnKey,
        f: impl FnOnce(&mut Workspace) -> Result<R>,
    ) -> Result<R> {
        let has_workspace = {
            let transactions = self.transactions.lock()?;
            transactions
                .get(&txn.session)
                .is_some_and(|ws| ws.txn_number == txn.txn_number)
        };

        if !has_workspace {
            let base = self.timed("snapshot", self.committed.read()).await?.clone();
            // Another op of this transaction may have opened it while we waited
            let mut transactions = self.transactions.lock()?;
            match transactions.entry(txn.session) {
                Entry::Occupied(entry) if entry.get().txn_number == txn.txn_number => {}
                Entry::Occupied(mut entry) => {
                    entry.insert(Workspace::new(txn.txn_number, base));
                    debug!("Opened workspace for transaction {}", txn);
                }
                Entry::Vacant(entry) => {
                    entry.insert(Workspace::new(txn.txn_number, base));
                    debug!("Opened workspace for transaction {}", txn);
                }
            }
        }

        let mut transactions = self.transactions.lock()?;
        let workspace = transactions
            .get_mut(&txn.session)
            .filter(|ws| ws.txn_number == txn.txn_number)
            .ok_or_else(|| StoreError::Transaction(format!("Transaction {} not found", txn)))?;
        f(workspace)
    }

    fn take_workspace(&self, txn: TxnKey) -> Result<Option<Workspace>> {
        let mut transactions = self.transactions.lock()?;
        match transactions.get(&txn.session) {
            Some(ws) if ws.txn_number == txn.txn_number => Ok(transactions.remove(&txn.session)),
            _ => Ok(None),
        }
    }

    fn insert_into(
        &self,
        snapshot: &mut Snapshot,
        journal: &mut Journal,
        collection: &str,
        mut doc: Document,
    ) -> Result<DocumentId> {
        let id = match doc.get(ID_FIELD) {
            None => {
                let id = DocumentId::generate();
                doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
                id
            }
            Some(_) => document_id(&doc).ok_or_else(|| {
                StoreError::InvalidDocument(format!("'{}' must be a document id", ID_FIELD))
            })?,
        };

        let data = snapshot.entry(collection.to_string()).or_default();
        if data.contains(&id) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        data.put(
            self.next_seq(),
            StoredDocument {
                id,
                version: self.next_version(),
                body: doc,
            },
        );
        journal.push((collection.to_string(), id));
        Ok(id)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_one(
        &self,
        collection: &str,
        doc: Document,
        session: Option<&ClientSession>,
    ) -> Result<DocumentId> {
        validate_collection_name(collection)?;
        self.take_fault(StoreOp::InsertOne)?;

        let id = self
            .write(session, |snapshot, journal| {
                self.insert_into(snapshot, journal, collection, doc)
            })
            .await?;
        debug!("Inserted {} into {}", id, collection);
        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: &str,
        docs: Vec<Document>,
        options: InsertManyOptions,
        session: Option<&ClientSession>,
    ) -> Result<Vec<DocumentId>> {
        validate_collection_name(collection)?;
        self.take_fault(StoreOp::InsertMany)?;

        self.write(session, |snapshot, journal| {
            let mut inserted = Vec::with_capacity(docs.len());
            let mut failures = Vec::new();

            for (index, doc) in docs.into_iter().enumerate() {
                match self.insert_into(snapshot, journal, collection, doc) {
                    Ok(id) => inserted.push(id),
                    Err(err) => {
                        failures.push(format!("index {}: {}", index, err));
                        if options.ordered {
                            break;
                        }
                    }
                }
            }

            if failures.is_empty() {
                debug!("Inserted {} documents into {}", inserted.len(), collection);
                Ok(inserted)
            } else {
                warn!(
                    "Bulk insert into {}: {} inserted, {} failed",
                    collection,
                    inserted.len(),
                    failures.len()
                );
                Err(StoreError::BulkWrite {
                    inserted: inserted.len(),
                    failures,
                })
            }
        })
        .await
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
        session: Option<&ClientSession>,
    ) -> Result<Vec<Document>> {
        self.take_fault(StoreOp::Find)?;

        self.read(session, |snapshot| {
            let Some(data) = snapshot.get(collection) else {
                return Ok(Vec::new());
            };

            let matches = data.matching(filter).skip(options.skip);
            let docs = match options.limit {
                Some(limit) => matches.take(limit).map(|d| d.body.clone()).collect(),
                None => matches.map(|d| d.body.clone()).collect(),
            };
            Ok(docs)
        })
        .await
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        mut replacement: Document,
        session: Option<&ClientSession>,
    ) -> Result<UpdateOutcome> {
        self.take_fault(StoreOp::ReplaceOne)?;

        self.write(session, |snapshot, journal| {
            let Some(data) = snapshot.get_mut(collection) else {
                return Ok(UpdateOutcome::default());
            };
            let Some(current) = data.first_match(filter).cloned() else {
                return Ok(UpdateOutcome::default());
            };

            match replacement.get(ID_FIELD) {
                None => {
                    replacement.insert(ID_FIELD.to_string(), Value::String(current.id.to_string()));
                }
                Some(_) if document_id(&replacement) == Some(current.id) => {}
                Some(other) => return Err(StoreError::ImmutableId(other.to_string())),
            }

            if replacement == current.body {
                return Ok(UpdateOutcome {
                    matched: 1,
                    modified: 0,
                });
            }

            let seq = data.seq_of(&current.id).unwrap_or_else(|| self.next_seq());
            data.put(
                seq,
                StoredDocument {
                    id: current.id,
                    version: self.next_version(),
                    body: replacement,
                },
            );
            journal.push((collection.to_string(), current.id));
            Ok(UpdateOutcome {
                matched: 1,
                modified: 1,
            })
        })
        .await
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        session: Option<&ClientSession>,
    ) -> Result<UpdateOutcome> {
        self.take_fault(StoreOp::UpdateOne)?;

        self.write(session, |snapshot, journal| {
            let Some(data) = snapshot.get_mut(collection) else {
                return Ok(UpdateOutcome::default());
            };
            let Some(current) = data.first_match(filter).cloned() else {
                return Ok(UpdateOutcome::default());
            };

            let mut body = current.body;
            match update {
                Update::Push { path, value } => push_at_path(&mut body, path, value.clone())?,
            }

            let seq = data.seq_of(&current.id).unwrap_or_else(|| self.next_seq());
            data.put(
                seq,
                StoredDocument {
                    id: current.id,
                    version: self.next_version(),
                    body,
                },
            );
            journal.push((collection.to_string(), current.id));
            Ok(UpdateOutcome {
                matched: 1,
                modified: 1,
            })
        })
        .await
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: &Filter,
        session: Option<&ClientSession>,
    ) -> Result<DeleteOutcome> {
        self.take_fault(StoreOp::DeleteOne)?;

        self.write(session, |snapshot, journal| {
            let Some(data) = snapshot.get_mut(collection) else {
                return Ok(DeleteOutcome::default());
            };
            let Some(id) = data.first_match(filter).map(|d| d.id) else {
                return Ok(DeleteOutcome::default());
            };

            data.remove(&id);
            journal.push((collection.to_string(), id));
            Ok(DeleteOutcome { deleted: 1 })
        })
        .await
    }
}

#[async_trait]
impl TransactionCoordinator for InMemoryStore {
    fn client_id(&self) -> u64 {
        self.client_id
    }

    async fn commit(&self, txn: TxnKey) -> Result<()> {
        if let Err(err) = self.take_fault(StoreOp::Commit) {
            self.take_workspace(txn)?;
            return Err(err);
        }

        let Some(workspace) = self.take_workspace(txn)? else {
            // Nothing was read or written
            return Ok(());
        };

        let mut committed = self.timed("commit", self.committed.write()).await?;

        for (collection, id) in &workspace.writes {
            let version_of = |snapshot: &Snapshot| {
                snapshot
                    .get(collection)
                    .and_then(|data| data.get(id))
                    .map(|doc| doc.version)
            };
            if version_of(&workspace.base) != version_of(&*committed) {
                warn!("Write conflict on {}/{} in transaction {}", collection, id, txn);
                return Err(StoreError::WriteConflict {
                    collection: collection.clone(),
                    id: id.to_string(),
                });
            }
        }

        for (collection, id) in &workspace.writes {
            let written = workspace.view.get(collection).and_then(|data| {
                data.get(id)
                    .cloned()
                    .map(|doc| (data.seq_of(id).unwrap_or_default(), doc))
            });
            let target = committed.entry(collection.clone()).or_default();
            match written {
                Some((seq, doc)) => target.put(seq, doc),
                None => {
                    target.remove(id);
                }
            }
        }

        debug!(
            "Committed transaction {} ({} documents)",
            txn,
            workspace.writes.len()
        );
        Ok(())
    }

    async fn abort(&self, txn: TxnKey) -> Result<()> {
        if let Some(workspace) = self.take_workspace(txn)? {
            debug!(
                "Aborted transaction {} ({} documents discarded)",
                txn,
                workspace.writes.len()
            );
        }
        Ok(())
    }

    fn release(&self, session: SessionId) {
        if let Ok(mut transactions) = self.transactions.lock()
            && transactions.remove(&session).is_some()
        {
            debug!("Released open transaction of session {}", session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn named(name: &str) -> Document {
        doc(json!({"_id": DocumentId::generate().to_string(), "name": name}))
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryStore::new();
        let id = store.insert_one("items", named("a"), None).await.unwrap();

        let found = store
            .find("items", &Filter::by_id(id), FindOptions::new(), None)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], json!("a"));
    }

    #[tokio::test]
    async fn test_insert_generates_missing_id() {
        let store = InMemoryStore::new();
        let id = store
            .insert_one("items", doc(json!({"name": "x"})), None)
            .await
            .unwrap();
        assert!(!id.is_nil());
        assert_eq!(store.count("items").await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_key() {
        let store = InMemoryStore::new();
        let d = named("a");
        store.insert_one("items", d.clone(), None).await.unwrap();
        let err = store.insert_one("items", d, None).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_insert_many_unordered_continues_past_failures() {
        let store = InMemoryStore::new();
        let dup = named("dup");
        let docs = vec![dup.clone(), dup, named("b"), named("c")];

        let err = store
            .insert_many("items", docs, InsertManyOptions::unordered(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::BulkWrite { inserted: 3, .. }));
        assert_eq!(store.count("items").await, 3);
    }

    #[tokio::test]
    async fn test_insert_many_ordered_stops_at_first_failure() {
        let store = InMemoryStore::new();
        let dup = named("dup");
        let docs = vec![dup.clone(), dup, named("b")];

        let err = store
            .insert_many("items", docs, InsertManyOptions::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::BulkWrite { inserted: 1, .. }));
        assert_eq!(store.count("items").await, 1);
    }

    #[tokio::test]
    async fn test_find_window() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .insert_one("items", doc(json!({"n": i})), None)
                .await
                .unwrap();
        }
        let page = store
            .find("items", &Filter::Empty, FindOptions::new().skip(1).limit(2), None)
            .await
            .unwrap();
        let ns: Vec<_> = page.iter().map(|d| d["n"].clone()).collect();
        assert_eq!(ns, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_find_missing_collection_is_empty() {
        let store = InMemoryStore::new();
        let found = store
            .find("nothing", &Filter::Empty, FindOptions::new(), None)
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_replace_keeps_id_and_position() {
        let store = InMemoryStore::new();
        let first = store.insert_one("items", named("a"), None).await.unwrap();
        store.insert_one("items", named("b"), None).await.unwrap();

        let outcome = store
            .replace_one("items", &Filter::by_id(first), doc(json!({"name": "z"})), None)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });

        let all = store
            .find("items", &Filter::Empty, FindOptions::new(), None)
            .await
            .unwrap();
        assert_eq!(all[0]["name"], json!("z"));
        assert_eq!(document_id(&all[0]), Some(first));
    }

    #[tokio::test]
    async fn test_replace_with_same_content_is_not_a_modification() {
        let store = InMemoryStore::new();
        let d = named("a");
        let id = store.insert_one("items", d.clone(), None).await.unwrap();
        let outcome = store
            .replace_one("items", &Filter::by_id(id), d, None)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 0 });
    }

    #[tokio::test]
    async fn test_replace_rejects_id_change() {
        let store = InMemoryStore::new();
        let id = store.insert_one("items", named("a"), None).await.unwrap();
        let err = store
            .replace_one("items", &Filter::by_id(id), named("b"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ImmutableId(_)));
    }

    #[tokio::test]
    async fn test_push_and_delete() {
        let store = InMemoryStore::new();
        let id = store.insert_one("items", named("a"), None).await.unwrap();

        let outcome = store
            .update_one("items", &Filter::by_id(id), &Update::push("tags", json!("x")), None)
            .await
            .unwrap();
        assert_eq!(outcome.modified, 1);

        let deleted = store.delete_one("items", &Filter::by_id(id), None).await.unwrap();
        assert_eq!(deleted.deleted, 1);
        let again = store.delete_one("items", &Filter::by_id(id), None).await.unwrap();
        assert_eq!(again.deleted, 0);
    }

    #[tokio::test]
    async fn test_transaction_isolation_and_commit() {
        let store = InMemoryStore::new();
        let mut session = store.start_session();
        session.start_transaction().unwrap();

        store.insert_one("items", named("a"), Some(&session)).await.unwrap();
        assert_eq!(store.count("items").await, 0);

        let inside = store
            .find("items", &Filter::Empty, FindOptions::new(), Some(&session))
            .await
            .unwrap();
        assert_eq!(inside.len(), 1);

        session.commit_transaction().await.unwrap();
        assert_eq!(store.count("items").await, 1);
        assert_eq!(store.open_transactions(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_first_ops_share_one_workspace() {
        let store = InMemoryStore::new();
        let mut session = store.start_session();
        session.start_transaction().unwrap();

        // Park both ops on the snapshot read so they race to open the workspace
        let guard = store.committed.write().await;
        let release = async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            drop(guard);
        };
        let (a, b, ()) = tokio::join!(
            store.insert_one("items", named("a"), Some(&session)),
            store.insert_one("items", named("b"), Some(&session)),
            release,
        );
        a.unwrap();
        b.unwrap();

        session.commit_transaction().await.unwrap();
        assert_eq!(store.count("items").await, 2);
        assert_eq!(store.open_transactions(), 0);
    }

    #[tokio::test]
    async fn test_abort_discards_writes() {
        let store = InMemoryStore::new();
        let mut session = store.start_session();
        session.start_transaction().unwrap();
        store.insert_one("items", named("a"), Some(&session)).await.unwrap();
        session.abort_transaction().await.unwrap();

        assert_eq!(store.count("items").await, 0);
        assert_eq!(store.open_transactions(), 0);
    }

    #[tokio::test]
    async fn test_transaction_sees_snapshot_not_later_commits() {
        let store = InMemoryStore::new();
        let mut session = store.start_session();
        session.start_transaction().unwrap();

        // First operation pins the snapshot
        let before = store
            .find("items", &Filter::Empty, FindOptions::new(), Some(&session))
            .await
            .unwrap();
        assert!(before.is_empty());

        store.insert_one("items", named("outside"), None).await.unwrap();
        let inside = store
            .find("items", &Filter::Empty, FindOptions::new(), Some(&session))
            .await
            .unwrap();
        assert!(inside.is_empty());
        session.commit_transaction().await.unwrap();
    }

    #[tokio::test]
    async fn test_write_conflict_aborts_commit() {
        let store = InMemoryStore::new();
        let id = store.insert_one("items", named("a"), None).await.unwrap();

        let mut session = store.start_session();
        session.start_transaction().unwrap();
        store
            .replace_one("items", &Filter::by_id(id), doc(json!({"name": "txn"})), Some(&session))
            .await
            .unwrap();

        store
            .replace_one("items", &Filter::by_id(id), doc(json!({"name": "outside"})), None)
            .await
            .unwrap();

        let err = session.commit_transaction().await.unwrap_err();
        assert!(matches!(err, StoreError::WriteConflict { .. }));

        let all = store
            .find("items", &Filter::by_id(id), FindOptions::new(), None)
            .await
            .unwrap();
        assert_eq!(all[0]["name"], json!("outside"));
    }

    #[tokio::test]
    async fn test_session_from_other_client_is_rejected() {
        let a = InMemoryStore::new();
        let b = InMemoryStore::new();
        let session = b.start_session();
        let err = a.insert_one("items", named("x"), Some(&session)).await.unwrap_err();
        assert!(matches!(err, StoreError::SessionMismatch(_)));
    }

    #[tokio::test]
    async fn test_idle_session_runs_standalone() {
        let store = InMemoryStore::new();
        let session = store.start_session();
        store.insert_one("items", named("x"), Some(&session)).await.unwrap();
        assert_eq!(store.count("items").await, 1);
    }

    #[tokio::test]
    async fn test_dropping_session_releases_workspace() {
        let store = InMemoryStore::new();
        {
            let mut session = store.start_session();
            session.start_transaction().unwrap();
            store.insert_one("items", named("x"), Some(&session)).await.unwrap();
            assert_eq!(store.open_transactions(), 1);
        }
        assert_eq!(store.open_transactions(), 0);
        assert_eq!(store.count("items").await, 0);
    }

    #[tokio::test]
    async fn test_injected_fault_fires_once() {
        let store = InMemoryStore::new();
        store.fail_next(StoreOp::Find, "network down");
        let err = store
            .find("items", &Filter::Empty, FindOptions::new(), None)
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Injected("network down".into()));
        assert!(
            store
                .find("items", &Filter::Empty, FindOptions::new(), None)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_operation_timeout() {
        let config = StoreConfig::new("t").operation_timeout(Duration::from_millis(20));
        let store = InMemoryStore::with_config(&config);

        let mut session = store.start_session();
        session.start_transaction().unwrap();
        store.insert_one("items", named("x"), Some(&session)).await.unwrap();

        // Hold the committed lock so a standalone write cannot proceed
        let guard = store.committed.write().await;
        let err = store.insert_one("items", named("y"), None).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)));
        drop(guard);
    }
}
