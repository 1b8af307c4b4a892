use thiserror::Error;

/// Faults raised by the store layer.
///
/// These never cross the repository boundary: `GenericRepository` converts
/// every one of them into a failed `RepoResult` tagged with the kind of the
/// operation that hit it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("No collection bound for entity '{0}'")]
    UnboundEntity(String),

    #[error("Invalid collection name: {0}")]
    InvalidCollectionName(String),

    #[error("E11000 duplicate key error collection: {collection} dup key: {{ _id: {id} }}")]
    DuplicateKey { collection: String, id: String },

    #[error("Bulk write error: {inserted} inserted, {} failed: {}", failures.len(), failures.join("; "))]
    BulkWrite {
        inserted: usize,
        failures: Vec<String>,
    },

    #[error("After applying the update, the (immutable) field '_id' was found to have been altered to {0}")]
    ImmutableId(String),

    #[error("The field '{0}' must be an array")]
    NotAnArray(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Write conflict on {collection}/{id}; transaction aborted")]
    WriteConflict { collection: String, id: String },

    #[error("Session {0} does not belong to this client")]
    SessionMismatch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Injected(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
