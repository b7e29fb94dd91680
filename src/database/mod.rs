//! Database module exports.

mod documents;
mod error;
#[cfg(test)]
pub mod memory;
mod models;
mod mongo;
mod mongo_store;
mod store;

pub use error::{StoreError, StoreResult};
pub use models::*;
pub use mongo::Database;
pub use mongo_store::MongoStore;
pub use store::RecordStore;
