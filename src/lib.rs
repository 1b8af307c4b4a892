// ============================================================================
// docrepo Library
// ============================================================================
//
// Generic repository over a document store. Operations report failure as
// values (`RepoResult`) and can join a caller-owned transaction by taking the
// caller's `ClientSession`.
//
// ============================================================================

pub mod collection;
pub mod config;
pub mod core;
pub mod entity;
pub mod models;
pub mod query;
pub mod repository;
pub mod result;
pub mod session;
pub mod store;

// Re-export main types for convenience
pub use collection::CollectionBindings;
pub use config::StoreConfig;
pub use core::{Document, DocumentId, StoreError};
pub use entity::Entity;
pub use query::{ArrayField, Filter};
pub use repository::{GenericRepository, Repository};
pub use result::{Error, ErrorKind, RepoResult};
pub use session::{ClientSession, TransactionState};
pub use store::{DocumentStore, InMemoryStore, StoreOp};
