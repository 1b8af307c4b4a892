//! Request vocabulary understood by a `DocumentStore`: predicates, updates and
//! per-call options.

mod filter;
mod options;
mod update;

pub use filter::{CompareOp, Filter};
pub use options::{DeleteOutcome, FindOptions, InsertManyOptions, UpdateOutcome};
pub use update::{ArrayField, Update};
