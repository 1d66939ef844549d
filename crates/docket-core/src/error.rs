//! Error types for `docket-core`.
//!
//! A missing document or index entry is *not* an error — lookups return
//! `Option` and callers treat `None` as empty. The variants here cover the
//! cases that genuinely fail a request.

use thiserror::Error;

use crate::filter::FilterError;

#[derive(Debug, Error)]
pub enum Error {
  /// The query string failed to lex or parse.
  #[error("malformed query: {0}")]
  MalformedQuery(#[from] FilterError),

  /// The storage backend reported an I/O failure.
  #[error("storage backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A document fetched by id held bytes that are not valid JSON.
  ///
  /// During a full scan the same condition is logged and skipped; only a
  /// direct get surfaces it.
  #[error("document {id} is not valid JSON: {source}")]
  Decode {
    id:     String,
    #[source]
    source: serde_json::Error,
  },

  /// A document could not be serialised for storage.
  #[error("document serialization error: {0}")]
  Encode(#[source] serde_json::Error),
}

impl Error {
  /// Wrap a backend error, erasing its concrete type.
  pub fn backend<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Backend(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
