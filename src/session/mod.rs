//! Client sessions and the transactions run on them.
//!
//! The session is owned by the caller. Repositories and stores only borrow
//! it for the duration of one call.

mod state;

pub use state::{SessionId, TransactionState, TxnKey};

use crate::core::{Result, StoreError};
use async_trait::async_trait;
use std::sync::Arc;

/// Store-side half of the transaction protocol.
#[async_trait]
pub trait TransactionCoordinator: Send + Sync {
    /// Identity of the client that hands out sessions.
    fn client_id(&self) -> u64;

    /// Make every write of the transaction visible atomically.
    async fn commit(&self, txn: TxnKey) -> Result<()>;

    /// Discard every write of the transaction.
    async fn abort(&self, txn: TxnKey) -> Result<()>;

    /// Drop any state held for the session. Called from `Drop`, so it cannot
    /// wait.
    fn release(&self, session: SessionId);
}

/// Caller-owned handle grouping store operations into transactions.
pub struct ClientSession {
    id: SessionId,
    client_id: u64,
    state: TransactionState,
    txn_number: u64,
    coordinator: Arc<dyn TransactionCoordinator>,
}

impl ClientSession {
    pub fn new(coordinator: Arc<dyn TransactionCoordinator>) -> Self {
        Self {
            id: SessionId::new(),
            client_id: coordinator.client_id(),
            state: TransactionState::Idle,
            txn_number: 0,
            coordinator,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn client_id(&self) -> u64 {
        self.client_id
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn in_transaction(&self) -> bool {
        self.state.is_active()
    }

    /// Key of the open transaction, if any.
    pub fn active_transaction(&self) -> Option<TxnKey> {
        self.in_transaction().then_some(TxnKey {
            session: self.id,
            txn_number: self.txn_number,
        })
    }

    pub fn start_transaction(&mut self) -> Result<()> {
        if self.state.is_active() {
            return Err(StoreError::Transaction(format!(
                "Transaction already in progress on session {}",
                self.id
            )));
        }

        self.txn_number += 1;
        self.state = TransactionState::Started;
        tracing::debug!(session = %self.id, txn = self.txn_number, "transaction started");
        Ok(())
    }

    /// Commit the open transaction.
    ///
    /// On failure the transaction is discarded and the session ends up
    /// `Aborted`.
    pub async fn commit_transaction(&mut self) -> Result<()> {
        let txn = self.require_active("commit")?;

        match self.coordinator.commit(txn).await {
            Ok(()) => {
                self.state = TransactionState::Committed;
                tracing::debug!(%txn, "transaction committed");
                Ok(())
            }
            Err(err) => {
                self.state = TransactionState::Aborted;
                tracing::warn!(%txn, error = %err, "transaction commit failed");
                Err(err)
            }
        }
    }

    pub async fn abort_transaction(&mut self) -> Result<()> {
        let txn = self.require_active("abort")?;

        self.state = TransactionState::Aborted;
        self.coordinator.abort(txn).await?;
        tracing::debug!(%txn, "transaction aborted");
        Ok(())
    }

    fn require_active(&self, action: &str) -> Result<TxnKey> {
        self.active_transaction().ok_or_else(|| {
            StoreError::Transaction(format!(
                "Cannot {}: session {} is {}",
                action, self.id, self.state
            ))
        })
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        self.coordinator.release(self.id);
    }
}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("id", &self.id)
            .field("client_id", &self.client_id)
            .field("state", &self.state)
            .field("txn_number", &self.txn_number)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        fail_commit: bool,
    }

    #[async_trait]
    impl TransactionCoordinator for Recorder {
        fn client_id(&self) -> u64 {
            7
        }

        async fn commit(&self, txn: TxnKey) -> Result<()> {
            self.calls.lock().unwrap().push(format!("commit {}", txn.txn_number));
            if self.fail_commit {
                return Err(StoreError::Transaction("nope".into()));
            }
            Ok(())
        }

        async fn abort(&self, txn: TxnKey) -> Result<()> {
            self.calls.lock().unwrap().push(format!("abort {}", txn.txn_number));
            Ok(())
        }

        fn release(&self, _session: SessionId) {
            self.calls.lock().unwrap().push("release".into());
        }
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let recorder = Arc::new(Recorder::default());
        let mut session = ClientSession::new(recorder.clone());
        assert_eq!(session.state(), TransactionState::Idle);
        assert_eq!(session.client_id(), 7);
        assert!(session.active_transaction().is_none());

        session.start_transaction().unwrap();
        assert_eq!(session.active_transaction().unwrap().txn_number, 1);
        session.commit_transaction().await.unwrap();
        assert_eq!(session.state(), TransactionState::Committed);

        session.start_transaction().unwrap();
        session.abort_transaction().await.unwrap();
        assert_eq!(session.state(), TransactionState::Aborted);

        drop(session);
        assert_eq!(
            *recorder.calls.lock().unwrap(),
            vec!["commit 1", "abort 2", "release"]
        );
    }

    #[tokio::test]
    async fn test_invalid_transitions() {
        let mut session = ClientSession::new(Arc::new(Recorder::default()));
        assert!(session.commit_transaction().await.is_err());
        assert!(session.abort_transaction().await.is_err());

        session.start_transaction().unwrap();
        assert!(session.start_transaction().is_err());
        session.commit_transaction().await.unwrap();
        assert!(session.commit_transaction().await.is_err());
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_session_aborted() {
        let recorder = Arc::new(Recorder {
            fail_commit: true,
            ..Default::default()
        });
        let mut session = ClientSession::new(recorder);
        session.start_transaction().unwrap();
        assert!(session.commit_transaction().await.is_err());
        assert_eq!(session.state(), TransactionState::Aborted);
    }
}
