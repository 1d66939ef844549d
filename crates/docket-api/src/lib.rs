//! JSON REST API for Docket.
//!
//! Exposes an axum [`Router`] backed by an [`Engine`] over any
//! [`DocumentStore`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", docket_api::api_router(engine.clone()))
//! ```

pub mod docs;
pub mod error;
pub mod reindex;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use docket_core::{engine::Engine, store::DocumentStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(engine: Arc<Engine<S>>) -> Router<()>
where
  S: DocumentStore + 'static,
{
  Router::new()
    // Documents
    .route("/docs", get(docs::list::<S>).post(docs::create::<S>))
    .route("/docs/{id}", get(docs::get_one::<S>))
    // Index maintenance
    .route("/reindex", post(reindex::handler::<S>))
    .with_state(engine)
}

// ─── Integration tests ────────────────────────────────────────────────────────
