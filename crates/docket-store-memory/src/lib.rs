//! In-memory backend for the Docket document store.
//!
//! Nothing is persisted: both namespaces are bounded LRU caches and the
//! whole store vanishes on drop. Useful for tests and ephemeral workloads.

mod store;

pub use store::{DEFAULT_CAPACITY, MemoryStore};

#[cfg(test)]
mod tests;
