//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::path::Path;

use docket_core::store::DocumentStore;
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Both
/// namespaces live in one database: the `documents` table and the
/// `index_entries` table.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  async fn get_document(&self, id: &str) -> Result<Option<Vec<u8>>> {
    let id = id.to_owned();
    let body = self
      .conn
      .call(move |conn| {
        let body = conn
          .query_row(
            "SELECT body FROM documents WHERE id = ?1",
            rusqlite::params![id],
            |row| row.get::<_, Vec<u8>>(0),
          )
          .optional()?;
        Ok(body)
      })
      .await?;
    Ok(body)
  }

  async fn put_document(&self, id: &str, bytes: Vec<u8>) -> Result<()> {
    let id = id.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (id, body) VALUES (?1, ?2)
           ON CONFLICT (id) DO UPDATE SET body = excluded.body",
          rusqlite::params![id, bytes],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn for_each<F>(&self, mut visit: F) -> Result<()>
  where
    F: FnMut(&str, &[u8]) + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare("SELECT id, body FROM documents")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
          let id: String = row.get(0)?;
          let body: Vec<u8> = row.get(1)?;
          visit(&id, &body);
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_index_entry(&self, fact: &str) -> Result<Option<Vec<u8>>> {
    let fact = fact.to_owned();
    let ids = self
      .conn
      .call(move |conn| {
        let ids = conn
          .query_row(
            "SELECT ids FROM index_entries WHERE fact = ?1",
            rusqlite::params![fact],
            |row| row.get::<_, String>(0),
          )
          .optional()?;
        Ok(ids)
      })
      .await?;
    Ok(ids.map(String::into_bytes))
  }

  async fn put_index_entry(&self, fact: &str, ids: Vec<u8>) -> Result<()> {
    let fact = fact.to_owned();
    let ids = String::from_utf8_lossy(&ids).into_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO index_entries (fact, ids) VALUES (?1, ?2)
           ON CONFLICT (fact) DO UPDATE SET ids = excluded.ids",
          rusqlite::params![fact, ids],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Checkpoint the WAL. With `synchronous = NORMAL` this is the moment
  /// recent writes become durable.
  async fn flush(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("PRAGMA wal_checkpoint(FULL)", [], |_row| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn close(&self) -> Result<()> {
    self.flush().await
  }
}
