//! Inverted index maintenance.
//!
//! Each index entry maps one fact key (`path=value`) to a comma-joined list
//! of document ids. Entries are append-only: ids are added, never removed,
//! and the entry itself is never deleted. Two concurrent writers appending
//! to the same fact follow read-modify-write with no compare-and-swap and
//! can lose one append; the flush coalescer and backends do not paper over
//! that.

use crate::store::DocumentStore;

/// Split a stored id-list into its ids. An empty entry holds no ids.
pub fn split_ids(entry: &[u8]) -> Vec<String> {
  if entry.is_empty() {
    return Vec::new();
  }
  String::from_utf8_lossy(entry)
    .split(',')
    .map(str::to_string)
    .collect()
}

/// Record `id` under one fact key.
///
/// With `dedupe = false` (the normal insert path) the id is appended with
/// no membership scan. That is a trust boundary, not an oversight: insert
/// ids are freshly generated UUIDv7s and can never already be present, so
/// the scan is skipped. Reuse an id and stale cross-fact membership will
/// accumulate undetected. With `dedupe = true` (reindex) the id is appended
/// only if the entry does not already contain it.
pub async fn record_fact<S: DocumentStore>(
  store: &S,
  fact: &str,
  id: &str,
  dedupe: bool,
) -> Result<(), S::Error> {
  let existing = store.get_index_entry(fact).await?;

  let encoded = match existing {
    None => id.to_string(),
    Some(bytes) if bytes.is_empty() => id.to_string(),
    Some(bytes) => {
      let mut entry = String::from_utf8_lossy(&bytes).into_owned();
      let already_present =
        dedupe && entry.split(',').any(|existing_id| existing_id == id);
      if !already_present {
        entry.push(',');
        entry.push_str(id);
      }
      entry
    }
  };

  store.put_index_entry(fact, encoded.into_bytes()).await
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn split_empty_entry_is_no_ids() {
    assert_eq!(split_ids(b""), Vec::<String>::new());
  }

  #[test]
  fn split_single_and_many() {
    assert_eq!(split_ids(b"a"), vec!["a"]);
    assert_eq!(split_ids(b"a,b,c"), vec!["a", "b", "c"]);
  }
}
