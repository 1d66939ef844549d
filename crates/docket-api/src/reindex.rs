//! Handler for `POST /reindex`.
//!
//! Rebuilds the inverted index by re-deriving the facts of every stored
//! document. Additive only; nothing is deleted. The walk runs inline, so
//! the response returns once the rebuild is complete.

use std::sync::Arc;

use axum::{Json, extract::State};
use docket_core::{engine::Engine, store::DocumentStore};
use serde_json::{Value, json};

use crate::error::ApiError;

/// `POST /reindex` — returns `{"reindexed": <document count>}`.
pub async fn handler<S>(
  State(engine): State<Arc<Engine<S>>>,
) -> Result<Json<Value>, ApiError>
where
  S: DocumentStore + 'static,
{
  let reindexed = engine.reindex().await?;
  Ok(Json(json!({ "reindexed": reindexed })))
}
