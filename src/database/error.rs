//! Store error type.

use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// Mongo's duplicate key error code.
const DUPLICATE_KEY: i32 = 11000;

/// A persistence operation failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[source] mongodb::error::Error),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("malformed id list in `{field}`: {value:?}")]
    MalformedList { field: &'static str, value: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        let duplicate = match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
                Some(write.message.clone())
            }
            _ => None,
        };

        match duplicate {
            Some(message) => Self::DuplicateKey(message),
            None => Self::Database(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
