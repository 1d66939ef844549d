//! Engine — the write and read paths composed over one store.
//!
//! Write path: document → flattener → index maintainer → primary store →
//! flush coalescer notified. Read path: query string → parser → executor.
//! The engine owns no locks and no state beyond the store handle and the
//! coalescer handle; concurrency is the backend's concern.

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::{
  Error, Result,
  document::Document,
  executor::{self, SearchHit},
  fact::flatten,
  filter,
  flush::FlushHandle,
  index::record_fact,
  store::DocumentStore,
};

pub struct Engine<S> {
  store: Arc<S>,
  flush: FlushHandle,
}

impl<S: DocumentStore> Engine<S> {
  pub fn new(store: Arc<S>, flush: FlushHandle) -> Self {
    Self { store, flush }
  }

  /// Store a new document and return its generated id.
  ///
  /// Ids are UUIDv7: globally unique and string-sortable, which is what
  /// lets the index maintainer skip its dedupe scan on this path. Facts
  /// are written before the body; there is no cross-store transaction, so
  /// a failure in between leaves index entries pointing at an id that was
  /// never written (the executor tolerates those), and a per-fact index
  /// failure leaves the document under-indexed but still stored and
  /// scannable.
  pub async fn insert(&self, doc: Document) -> Result<String> {
    let id = Uuid::now_v7().to_string();
    let bytes = serde_json::to_vec(&doc).map_err(Error::Encode)?;

    self.index(&id, &doc, false).await;
    self
      .store
      .put_document(&id, bytes)
      .await
      .map_err(Error::backend)?;

    self.flush.notify();
    Ok(id)
  }

  /// Fetch one document by id. `Ok(None)` if absent; undecodable stored
  /// bytes are an error on this direct path.
  pub async fn get(&self, id: &str) -> Result<Option<Document>> {
    let Some(bytes) =
      self.store.get_document(id).await.map_err(Error::backend)?
    else {
      return Ok(None);
    };

    let doc = serde_json::from_slice(&bytes)
      .map_err(|source| Error::Decode { id: id.to_string(), source })?;
    Ok(Some(doc))
  }

  /// Parse `query` and execute it. `skip_index` forces the full-scan path.
  pub async fn search(
    &self,
    query: &str,
    skip_index: bool,
  ) -> Result<Vec<SearchHit>> {
    let parsed = filter::parse(query)?;
    executor::execute(self.store.as_ref(), &parsed, skip_index).await
  }

  /// Record every fact of `doc` under `id`.
  ///
  /// Index-write failures are logged and do not abort the remaining facts;
  /// the write path never rolls back a document because its index update
  /// failed.
  pub async fn index(&self, id: &str, doc: &Document, dedupe: bool) {
    for fact in flatten(doc, "") {
      let key = fact.to_string();
      if let Err(err) =
        record_fact(self.store.as_ref(), &key, id, dedupe).await
      {
        tracing::error!("failed to index {key} for document {id}: {err}");
      }
    }
  }

  /// Re-derive and record the facts of every stored document.
  ///
  /// Additive repair only: entries are deduplicated on append, nothing is
  /// deleted. The scan buffers ids alone; each body is fetched and indexed
  /// one document at a time. Documents that no longer decode, or that
  /// vanish between scan and fetch, are logged and skipped. Returns the
  /// number of documents reindexed.
  pub async fn reindex(&self) -> Result<usize> {
    let collected: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&collected);
    self
      .store
      .for_each(move |id, _bytes| {
        sink.lock().push(id.to_string());
      })
      .await
      .map_err(Error::backend)?;

    let ids = std::mem::take(&mut *collected.lock());
    let mut count = 0;
    for id in ids {
      let Some(bytes) =
        self.store.get_document(&id).await.map_err(Error::backend)?
      else {
        tracing::warn!("document {id} vanished during reindex");
        continue;
      };
      match serde_json::from_slice::<Document>(&bytes) {
        Ok(doc) => {
          self.index(&id, &doc, true).await;
          count += 1;
        }
        Err(err) => {
          tracing::warn!("skipping undecodable document {id} in reindex: {err}");
        }
      }
    }

    // A rebuild is a write burst like any other.
    self.flush.notify();
    Ok(count)
  }
}
