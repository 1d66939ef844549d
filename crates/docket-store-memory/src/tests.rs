//! Tests for `MemoryStore`, including its cache-style eviction behaviour.

use std::{num::NonZeroUsize, sync::Arc};

use docket_core::store::DocumentStore;
use parking_lot::Mutex;

use crate::MemoryStore;

fn tiny(capacity: usize) -> MemoryStore {
  MemoryStore::new(NonZeroUsize::new(capacity).unwrap())
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_get_document() {
  let s = MemoryStore::default();

  s.put_document("doc-1", b"{\"a\":1}".to_vec()).await.unwrap();

  let body = s.get_document("doc-1").await.unwrap();
  assert_eq!(body.as_deref(), Some(b"{\"a\":1}".as_slice()));
}

#[tokio::test]
async fn get_missing_document_returns_none() {
  let s = MemoryStore::default();
  assert_eq!(s.get_document("nope").await.unwrap(), None);
}

#[tokio::test]
async fn put_document_overwrites() {
  let s = MemoryStore::default();

  s.put_document("doc-1", b"old".to_vec()).await.unwrap();
  s.put_document("doc-1", b"new".to_vec()).await.unwrap();

  let body = s.get_document("doc-1").await.unwrap();
  assert_eq!(body.as_deref(), Some(b"new".as_slice()));
}

#[tokio::test]
async fn for_each_visits_every_document() {
  let s = MemoryStore::default();

  s.put_document("a", b"1".to_vec()).await.unwrap();
  s.put_document("b", b"2".to_vec()).await.unwrap();
  s.put_document("c", b"3".to_vec()).await.unwrap();

  let seen: Arc<Mutex<Vec<(String, Vec<u8>)>>> =
    Arc::new(Mutex::new(Vec::new()));
  let sink = Arc::clone(&seen);
  s.for_each(move |id, bytes| {
    sink.lock().push((id.to_string(), bytes.to_vec()));
  })
  .await
  .unwrap();

  let mut seen = std::mem::take(&mut *seen.lock());
  seen.sort();
  assert_eq!(seen, vec![
    ("a".to_string(), b"1".to_vec()),
    ("b".to_string(), b"2".to_vec()),
    ("c".to_string(), b"3".to_vec()),
  ]);
}

// ─── Index entries ───────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_get_index_entry() {
  let s = MemoryStore::default();

  s.put_index_entry("a=1", b"id1,id2".to_vec()).await.unwrap();

  let entry = s.get_index_entry("a=1").await.unwrap();
  assert_eq!(entry.as_deref(), Some(b"id1,id2".as_slice()));
}

#[tokio::test]
async fn index_entries_and_documents_are_separate_namespaces() {
  let s = MemoryStore::default();

  s.put_document("k", b"doc".to_vec()).await.unwrap();
  s.put_index_entry("k", b"entry".to_vec()).await.unwrap();

  assert_eq!(
    s.get_document("k").await.unwrap().as_deref(),
    Some(b"doc".as_slice())
  );
  assert_eq!(
    s.get_index_entry("k").await.unwrap().as_deref(),
    Some(b"entry".as_slice())
  );
}

// ─── Eviction ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn capacity_overflow_evicts_least_recently_used() {
  let s = tiny(2);

  s.put_document("a", b"1".to_vec()).await.unwrap();
  s.put_document("b", b"2".to_vec()).await.unwrap();
  s.put_document("c", b"3".to_vec()).await.unwrap();

  assert_eq!(s.get_document("a").await.unwrap(), None);
  assert!(s.get_document("b").await.unwrap().is_some());
  assert!(s.get_document("c").await.unwrap().is_some());
}

#[tokio::test]
async fn reads_refresh_recency() {
  let s = tiny(2);

  s.put_document("a", b"1".to_vec()).await.unwrap();
  s.put_document("b", b"2".to_vec()).await.unwrap();
  s.get_document("a").await.unwrap();
  s.put_document("c", b"3".to_vec()).await.unwrap();

  // "b" was the coldest entry once "a" had been read again.
  assert!(s.get_document("a").await.unwrap().is_some());
  assert_eq!(s.get_document("b").await.unwrap(), None);
}

// ─── Durability ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn flush_and_close_are_no_ops() {
  let s = MemoryStore::default();
  s.put_document("a", b"1".to_vec()).await.unwrap();
  s.flush().await.unwrap();
  s.close().await.unwrap();
  assert!(s.get_document("a").await.unwrap().is_some());
}
