//! Server configuration, deserialised from `config.toml` and `DOCKET_*`
//! environment variables.
//!
//! Every field has a default, so the server runs with no configuration
//! at all: redb backend, `./data`, port 8080.

use std::{num::NonZeroUsize, path::PathBuf};

use serde::Deserialize;

/// Which storage backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  Redb,
  Sqlite,
  Memory,
}

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  #[serde(default = "default_backend")]
  pub backend:         Backend,
  /// Directory holding the database file. Ignored by the memory backend.
  #[serde(default = "default_data_dir")]
  pub data_dir:        PathBuf,
  /// Seconds of write silence before the flush coalescer syncs the store.
  #[serde(default = "default_flush_idle_secs")]
  pub flush_idle_secs: u64,
  /// Entry capacity per namespace for the memory backend. Zero is
  /// rejected at load time.
  #[serde(default = "default_memory_capacity")]
  pub memory_capacity: NonZeroUsize,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8080
}

fn default_backend() -> Backend {
  Backend::Redb
}

fn default_data_dir() -> PathBuf {
  PathBuf::from("./data")
}

fn default_flush_idle_secs() -> u64 {
  docket_core::flush::DEFAULT_IDLE.as_secs()
}

fn default_memory_capacity() -> NonZeroUsize {
  docket_store_memory::DEFAULT_CAPACITY
}

#[cfg(test)]
mod tests {
  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = from_toml("");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.backend, Backend::Redb);
    assert_eq!(cfg.data_dir, PathBuf::from("./data"));
    assert_eq!(cfg.flush_idle_secs, 10);
    assert_eq!(cfg.memory_capacity.get(), 60_000);
  }

  #[test]
  fn fields_override_individually() {
    let cfg = from_toml("port = 9999\nbackend = \"memory\"");
    assert_eq!(cfg.port, 9999);
    assert_eq!(cfg.backend, Backend::Memory);
    assert_eq!(cfg.host, "127.0.0.1");
  }

  #[test]
  fn zero_memory_capacity_is_rejected() {
    let result = config::Config::builder()
      .add_source(config::File::from_str(
        "memory_capacity = 0",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize::<ServerConfig>();
    assert!(result.is_err());
  }
}
