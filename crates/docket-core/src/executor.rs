//! Query execution — index path vs. full scan.
//!
//! Equality comparisons are resolved through the inverted index and
//! intersected; range comparisons are never index-accelerated and apply as
//! a post-filter. When the index cannot help (bypass flag, no equality
//! terms, or an empty candidate set) the executor falls back to a linear
//! walk of every stored document. That degradation is a deliberate
//! latency/simplicity trade-off and callers bound it with the bypass flag.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use serde::Serialize;

use crate::{
  Error, Result,
  document::Document,
  filter::{Comparison, Filter},
  index::split_ids,
  store::DocumentStore,
};

/// One search result: the document and its identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
  pub id:  String,
  #[serde(rename = "body")]
  pub doc: Document,
}

/// The index key an equality comparison probes, `path=literal`. Identical
/// to the rendered form of the fact the flattener would emit for a
/// matching leaf.
fn fact_key(cmp: &Comparison) -> String {
  format!("{}={}", cmp.path.join("."), cmp.value)
}

/// Execute a parsed filter against the store.
///
/// Results are sorted by id; ids are time-ordered, so this is insertion
/// order.
pub async fn execute<S: DocumentStore>(
  store: &S,
  filter: &Filter,
  skip_index: bool,
) -> Result<Vec<SearchHit>> {
  let equality: Vec<&Comparison> =
    filter.ands.iter().filter(|cmp| !cmp.is_range()).collect();
  let has_range = filter.ands.iter().any(Comparison::is_range);

  // Intersection over equality terms: an id qualifies when every equality
  // comparison's entry contains it.
  let mut seen_count: HashMap<String, usize> = HashMap::new();
  if !skip_index {
    for cmp in &equality {
      let entry = store
        .get_index_entry(&fact_key(cmp))
        .await
        .map_err(Error::backend)?;
      for id in split_ids(entry.as_deref().unwrap_or_default()) {
        *seen_count.entry(id).or_insert(0) += 1;
      }
    }
  }

  let mut candidates: Vec<String> = seen_count
    .into_iter()
    .filter(|(_, count)| *count == equality.len())
    .map(|(id, _)| id)
    .collect();
  candidates.sort();

  if skip_index || equality.is_empty() || candidates.is_empty() {
    return full_scan(store, filter).await;
  }

  let mut hits = Vec::with_capacity(candidates.len());
  for id in candidates {
    let Some(bytes) =
      store.get_document(&id).await.map_err(Error::backend)?
    else {
      // Indexed but absent: an insert wrote facts and then failed to write
      // the body. Absence is an empty outcome, not a failure.
      tracing::warn!("index entry points at missing document {id}");
      continue;
    };
    let doc: Document = serde_json::from_slice(&bytes)
      .map_err(|source| Error::Decode { id: id.clone(), source })?;

    // The index proved equality-term membership only; range terms still
    // need the matcher.
    if !has_range || filter.matches(&doc) {
      hits.push(SearchHit { id, doc });
    }
  }
  Ok(hits)
}

/// Walk the whole primary namespace, applying the filter to every document
/// that decodes. Undecodable documents are logged and skipped rather than
/// failing the scan.
async fn full_scan<S: DocumentStore>(
  store: &S,
  filter: &Filter,
) -> Result<Vec<SearchHit>> {
  let hits: Arc<Mutex<Vec<SearchHit>>> = Arc::new(Mutex::new(Vec::new()));

  let visitor_hits = Arc::clone(&hits);
  let visitor_filter = filter.clone();
  store
    .for_each(move |id, bytes| {
      match serde_json::from_slice::<Document>(bytes) {
        Ok(doc) => {
          if visitor_filter.matches(&doc) {
            visitor_hits
              .lock()
              .push(SearchHit { id: id.to_string(), doc });
          }
        }
        Err(err) => {
          tracing::warn!("skipping undecodable document {id} in scan: {err}");
        }
      }
    })
    .await
    .map_err(Error::backend)?;

  let mut hits = std::mem::take(&mut *hits.lock());
  hits.sort_by(|a, b| a.id.cmp(&b.id));
  Ok(hits)
}
