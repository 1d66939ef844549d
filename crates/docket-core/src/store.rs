//! The `DocumentStore` trait — the storage capability contract.
//!
//! The trait is implemented by storage backends (`docket-store-redb`,
//! `docket-store-sqlite`, `docket-store-memory`). The engine and everything
//! above it depend on this abstraction, not on any concrete backend.
//!
//! Two independent keyed byte-string namespaces live behind it: the primary
//! document space and the inverted-index space. Absence is `Ok(None)`, never
//! an error. Backends are responsible for per-key read/write atomicity; the
//! engine adds no locks of its own, so concurrent read-modify-write appends
//! to one index entry can race (an accepted gap, see `index`).

use std::future::Future;

/// Abstraction over a Docket storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Fetch the stored bytes of a document. `None` if absent.
  fn get_document<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send + 'a;

  /// Write the encoded body of a document under `id`.
  fn put_document<'a>(
    &'a self,
    id: &'a str,
    bytes: Vec<u8>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Visit every `(id, document-bytes)` pair in the primary namespace.
  ///
  /// Iteration order is backend-defined; the only requirement is that the
  /// walk is exhaustive. A full scan blocks for its entire duration — there
  /// is no cancellation, so callers bound its use externally.
  fn for_each<F>(
    &self,
    visit: F,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_
  where
    F: FnMut(&str, &[u8]) + Send + 'static;

  // ── Index entries ─────────────────────────────────────────────────────

  /// Fetch the encoded id-list for a fact key. `None` if the fact has never
  /// been recorded.
  fn get_index_entry<'a>(
    &'a self,
    fact: &'a str,
  ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send + 'a;

  /// Write the encoded id-list for a fact key.
  fn put_index_entry<'a>(
    &'a self,
    fact: &'a str,
    ids: Vec<u8>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Durability ────────────────────────────────────────────────────────

  /// Force a durability sync of both namespaces.
  fn flush(&self)
  -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Final flush and release. Called once at shutdown; backends also
  /// release resources on drop, so this is a durability guarantee more
  /// than a lifecycle requirement.
  fn close(&self)
  -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
