//! Core engine for the Docket document store.
//!
//! Everything that makes Docket *Docket* lives here: the fact flattener, the
//! inverted index, the filter language, the query executor and the flush
//! coalescer. This crate is deliberately free of HTTP and database
//! dependencies; storage backends implement [`store::DocumentStore`] and the
//! surrounding crates compose an [`engine::Engine`] on top.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod document;
pub mod engine;
pub mod error;
pub mod executor;
pub mod fact;
pub mod filter;
pub mod flush;
pub mod index;
pub mod store;

pub use error::{Error, Result};
