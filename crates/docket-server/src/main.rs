//! docket server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! configured storage backend, and serves the document API over HTTP.

mod settings;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use docket_core::{engine::Engine, flush, store::DocumentStore};
use docket_store_memory::MemoryStore;
use docket_store_redb::RedbStore;
use docket_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{Backend, ServerConfig};

#[derive(Parser)]
#[command(author, version, about = "Docket document store server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("DOCKET"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  match server_cfg.backend {
    Backend::Redb => {
      let dir = open_data_dir(&server_cfg)?;
      let store = RedbStore::open(dir.join("docket.redb"))
        .context("failed to open redb store")?;
      run(Arc::new(store), server_cfg).await
    }
    Backend::Sqlite => {
      let dir = open_data_dir(&server_cfg)?;
      let store = SqliteStore::open(dir.join("docket.db"))
        .await
        .context("failed to open sqlite store")?;
      run(Arc::new(store), server_cfg).await
    }
    Backend::Memory => {
      let store = MemoryStore::new(server_cfg.memory_capacity);
      run(Arc::new(store), server_cfg).await
    }
  }
}

/// Serve the API over `store` until interrupted, then flush and release it.
async fn run<S>(store: Arc<S>, cfg: ServerConfig) -> anyhow::Result<()>
where
  S: DocumentStore + 'static,
{
  let (handle, coalescer) = flush::spawn(
    Arc::clone(&store),
    Duration::from_secs(cfg.flush_idle_secs),
  );
  let engine = Arc::new(Engine::new(Arc::clone(&store), handle));

  let app = docket_api::api_router(engine).layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", cfg.host, cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
    })
    .await
    .context("server error")?;

  // Serving is done, so the engine and its flush handle are gone; the
  // coalescer notices the closed channel, runs its final flush, and exits.
  if let Err(err) = coalescer.await {
    tracing::warn!("flush coalescer exited abnormally: {err}");
  }
  store.close().await.context("failed to close store")?;

  Ok(())
}

/// Resolve the configured data directory, creating it if needed.
fn open_data_dir(cfg: &ServerConfig) -> anyhow::Result<PathBuf> {
  let dir = expand_tilde(&cfg.data_dir);
  std::fs::create_dir_all(&dir)
    .with_context(|| format!("failed to create data dir {}", dir.display()))?;
  Ok(dir)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
