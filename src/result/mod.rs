pub mod error;
pub mod result;

pub use error::{Error, ErrorKind, ResultStateError};
pub use result::RepoResult;
