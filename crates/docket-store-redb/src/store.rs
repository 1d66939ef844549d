//! [`RedbStore`] — the redb implementation of [`DocumentStore`].

use std::{path::Path, sync::Arc};

use docket_core::store::DocumentStore;
use redb::{Database, Durability, ReadableTable, TableDefinition};

use crate::{Error, Result};

// ─── Tables ──────────────────────────────────────────────────────────────────

/// Primary namespace: document id → encoded JSON body.
const DOCUMENTS: TableDefinition<&str, &[u8]> =
  TableDefinition::new("documents");

/// Inverted index: `path=value` fact key → comma-joined id list.
const INDEX_ENTRIES: TableDefinition<&str, &[u8]> =
  TableDefinition::new("index_entries");

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single redb file.
///
/// Cloning is cheap; the database handle is reference-counted. Writes
/// commit with [`Durability::Eventual`], so they are crash-safe only after
/// a later [`flush`](DocumentStore::flush). That pairing is what the
/// engine's flush coalescer exists for.
#[derive(Clone)]
pub struct RedbStore {
  db: Arc<Database>,
}

impl RedbStore {
  /// Open (or create) a store at `path`.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let db = Database::create(path)?;
    // Create both tables up front so read transactions never race table
    // creation on a fresh file.
    let txn = db.begin_write()?;
    txn.open_table(DOCUMENTS)?;
    txn.open_table(INDEX_ENTRIES)?;
    txn.commit()?;
    Ok(Self { db: Arc::new(db) })
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for RedbStore {
  type Error = Error;

  async fn get_document(&self, id: &str) -> Result<Option<Vec<u8>>> {
    let db = Arc::clone(&self.db);
    let id = id.to_owned();
    tokio::task::spawn_blocking(move || {
      let txn = db.begin_read()?;
      let table = txn.open_table(DOCUMENTS)?;
      Ok(table.get(id.as_str())?.map(|body| body.value().to_vec()))
    })
    .await?
  }

  async fn put_document(&self, id: &str, bytes: Vec<u8>) -> Result<()> {
    let db = Arc::clone(&self.db);
    let id = id.to_owned();
    tokio::task::spawn_blocking(move || {
      let mut txn = db.begin_write()?;
      txn.set_durability(Durability::Eventual);
      {
        let mut table = txn.open_table(DOCUMENTS)?;
        table.insert(id.as_str(), bytes.as_slice())?;
      }
      txn.commit()?;
      Ok(())
    })
    .await?
  }

  async fn for_each<F>(&self, mut visit: F) -> Result<()>
  where
    F: FnMut(&str, &[u8]) + Send + 'static,
  {
    let db = Arc::clone(&self.db);
    tokio::task::spawn_blocking(move || {
      let txn = db.begin_read()?;
      let table = txn.open_table(DOCUMENTS)?;
      for entry in table.iter()? {
        let (id, body) = entry?;
        visit(id.value(), body.value());
      }
      Ok(())
    })
    .await?
  }

  async fn get_index_entry(&self, fact: &str) -> Result<Option<Vec<u8>>> {
    let db = Arc::clone(&self.db);
    let fact = fact.to_owned();
    tokio::task::spawn_blocking(move || {
      let txn = db.begin_read()?;
      let table = txn.open_table(INDEX_ENTRIES)?;
      Ok(table.get(fact.as_str())?.map(|ids| ids.value().to_vec()))
    })
    .await?
  }

  async fn put_index_entry(&self, fact: &str, ids: Vec<u8>) -> Result<()> {
    let db = Arc::clone(&self.db);
    let fact = fact.to_owned();
    tokio::task::spawn_blocking(move || {
      let mut txn = db.begin_write()?;
      txn.set_durability(Durability::Eventual);
      {
        let mut table = txn.open_table(INDEX_ENTRIES)?;
        table.insert(fact.as_str(), ids.as_slice())?;
      }
      txn.commit()?;
      Ok(())
    })
    .await?
  }

  /// Commit an empty transaction at the default (immediate) durability.
  /// redb queues `Eventual` commits; this promotes every queued commit to
  /// stable storage.
  async fn flush(&self) -> Result<()> {
    let db = Arc::clone(&self.db);
    tokio::task::spawn_blocking(move || {
      let txn = db.begin_write()?;
      txn.commit()?;
      Ok(())
    })
    .await?
  }

  async fn close(&self) -> Result<()> {
    self.flush().await
  }
}
