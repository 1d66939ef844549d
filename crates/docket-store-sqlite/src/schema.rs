//! SQL schema for the Docket SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// WAL with `synchronous = NORMAL` defers fsync work to checkpoints, which
/// is exactly what [`flush`](crate::SqliteStore) triggers; the coalescer
/// upstream decides when that happens.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;

-- Documents are written once; no UPDATE or DELETE is ever issued.
CREATE TABLE IF NOT EXISTS documents (
    id    TEXT PRIMARY KEY,
    body  BLOB NOT NULL
);

-- One row per fact key; ids is the comma-joined id list, append-only.
CREATE TABLE IF NOT EXISTS index_entries (
    fact  TEXT PRIMARY KEY,
    ids   TEXT NOT NULL
);

PRAGMA user_version = 1;
";
