use std::fmt;
use thiserror::Error;

/// Tag identifying what went wrong in a failed repository call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EntityIsNull,
    EntitiesIsNull,
    InvalidPagination,
    CreateEntityError,
    DeleteEntityError,
    UpdateEntityError,
    GetEntityByIdError,
    GetAllEntitiesError,
    GetByPredicateError,
    InsertManyEntitiesError,
    AddSubdocumentError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EntityIsNull => "EntityIsNull",
            ErrorKind::EntitiesIsNull => "EntitiesIsNull",
            ErrorKind::InvalidPagination => "InvalidPagination",
            ErrorKind::CreateEntityError => "CreateEntityError",
            ErrorKind::DeleteEntityError => "DeleteEntityError",
            ErrorKind::UpdateEntityError => "UpdateEntityError",
            ErrorKind::GetEntityByIdError => "GetEntityByIdError",
            ErrorKind::GetAllEntitiesError => "GetAllEntitiesError",
            ErrorKind::GetByPredicateError => "GetByPredicateError",
            ErrorKind::InsertManyEntitiesError => "InsertManyEntitiesError",
            ErrorKind::AddSubdocumentError => "AddSubdocumentError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (kind, message) pair carried by a failed `RepoResult`.
///
/// `Error::none()` is the sentinel for "no error". It is the only value
/// without a kind, so it compares equal to itself and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: Option<ErrorKind>,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            message: message.into(),
        }
    }

    pub const fn none() -> Self {
        Self {
            kind: None,
            message: String::new(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind.is_none()
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    /// String tag of the kind; empty for the sentinel.
    pub fn code(&self) -> &'static str {
        self.kind.map(|k| k.as_str()).unwrap_or("")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for Error {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{}: {}", kind, self.message),
            None => f.write_str("none"),
        }
    }
}

impl std::error::Error for Error {}

/// Raised when a `RepoResult` is assembled from an inconsistent
/// success flag / error pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultStateError {
    #[error("a successful result cannot carry an error ({0})")]
    SuccessWithError(Error),

    #[error("a failed result must carry an error")]
    FailureWithoutError,
}
