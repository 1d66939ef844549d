//! [`MemoryStore`] — the in-memory implementation of [`DocumentStore`].

use std::{convert::Infallible, num::NonZeroUsize};

use docket_core::store::DocumentStore;
use lru::LruCache;
use parking_lot::Mutex;

/// Default capacity of each namespace, in entries.
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(60_000).unwrap();

// ─── Store ───────────────────────────────────────────────────────────────────

/// A volatile document store holding both namespaces in LRU caches.
///
/// Once a namespace reaches capacity the least-recently-used entry is
/// silently evicted, so under memory pressure this behaves like a cache
/// rather than a database: documents can disappear, and index entries can
/// outlive the documents they point at. Readers already tolerate both.
pub struct MemoryStore {
  documents: Mutex<LruCache<String, Vec<u8>>>,
  index:     Mutex<LruCache<String, Vec<u8>>>,
}

impl MemoryStore {
  /// Create a store where each namespace holds at most `capacity` entries.
  pub fn new(capacity: NonZeroUsize) -> Self {
    Self {
      documents: Mutex::new(LruCache::new(capacity)),
      index:     Mutex::new(LruCache::new(capacity)),
    }
  }
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new(DEFAULT_CAPACITY)
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for MemoryStore {
  type Error = Infallible;

  async fn get_document(&self, id: &str) -> Result<Option<Vec<u8>>, Infallible> {
    Ok(self.documents.lock().get(id).cloned())
  }

  async fn put_document(&self, id: &str, bytes: Vec<u8>) -> Result<(), Infallible> {
    self.documents.lock().put(id.to_owned(), bytes);
    Ok(())
  }

  async fn for_each<F>(&self, mut visit: F) -> Result<(), Infallible>
  where
    F: FnMut(&str, &[u8]) + Send + 'static,
  {
    for (id, body) in self.documents.lock().iter() {
      visit(id, body);
    }
    Ok(())
  }

  async fn get_index_entry(&self, fact: &str) -> Result<Option<Vec<u8>>, Infallible> {
    Ok(self.index.lock().get(fact).cloned())
  }

  async fn put_index_entry(&self, fact: &str, ids: Vec<u8>) -> Result<(), Infallible> {
    self.index.lock().put(fact.to_owned(), ids);
    Ok(())
  }

  async fn flush(&self) -> Result<(), Infallible> {
    Ok(())
  }

  async fn close(&self) -> Result<(), Infallible> {
    Ok(())
  }
}
