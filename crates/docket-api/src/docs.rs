//! Handlers for `/docs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/docs` | Body: any JSON object; returns 201 + `{"id":"..."}` |
//! | `GET`  | `/docs` | Optional `?q=<filter>` and `?skipIndex=true` |
//! | `GET`  | `/docs/{id}` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use docket_core::{document::Document, engine::Engine, store::DocumentStore};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /docs` — body: any JSON object.
pub async fn create<S>(
  State(engine): State<Arc<Engine<S>>>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + 'static,
{
  let Value::Object(doc) = body else {
    return Err(ApiError::BadRequest(
      "document body must be a JSON object".to_string(),
    ));
  };

  let id = engine.insert(doc).await?;
  Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Filter expression, e.g. `name:ada age:>30`. Empty matches everything.
  #[serde(default)]
  pub q:          String,
  /// Bypass the inverted index and scan every document.
  #[serde(default, rename = "skipIndex")]
  pub skip_index: bool,
}

/// `GET /docs[?q=<filter>][&skipIndex=true]`
pub async fn list<S>(
  State(engine): State<Arc<Engine<S>>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError>
where
  S: DocumentStore + 'static,
{
  let hits = engine.search(&params.q, params.skip_index).await?;
  let count = hits.len();
  Ok(Json(json!({ "documents": hits, "count": count })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /docs/{id}`
pub async fn get_one<S>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<String>,
) -> Result<Json<Document>, ApiError>
where
  S: DocumentStore + 'static,
{
  let doc = engine
    .get(&id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("document {id} not found")))?;
  Ok(Json(doc))
}
