//! redb backend for the Docket document store.
//!
//! redb's API is synchronous, so every call hops to the blocking thread
//! pool. Writes commit at `Eventual` durability; [`DocumentStore::flush`]
//! promotes everything queued so far to stable storage.
//!
//! [`DocumentStore::flush`]: docket_core::store::DocumentStore::flush

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::RedbStore;
