//! Flush coalescing — debounced durability under write load.
//!
//! One background task owns an idle timer and a dirty flag. Writers poke it
//! through a single-slot, non-blocking mailbox; when the store has been
//! quiet for a full idle period since the last poke, the task flushes once.
//! A burst of writes therefore costs one flush, shortly after the burst
//! quiesces, and an idle store is never flushed at all.

use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::store::DocumentStore;

/// Idle period before a dirty store is flushed.
pub const DEFAULT_IDLE: Duration = Duration::from_secs(10);

/// Write-side handle to the coalescer task.
#[derive(Debug, Clone)]
pub struct FlushHandle {
  tx: mpsc::Sender<()>,
}

impl FlushHandle {
  /// Signal that a write happened. Non-blocking: if a signal is already
  /// pending the new one is dropped; one pending signal already guarantees
  /// a flush after the next idle period.
  pub fn notify(&self) {
    let _ = self.tx.try_send(());
  }
}

/// Spawn the coalescer task for `store`.
///
/// The task exits when every [`FlushHandle`] is dropped, performing a final
/// flush if writes are still pending. The returned [`JoinHandle`] lets the
/// owner await that finalisation at shutdown.
pub fn spawn<S>(store: Arc<S>, idle: Duration) -> (FlushHandle, JoinHandle<()>)
where
  S: DocumentStore + 'static,
{
  let (tx, mut rx) = mpsc::channel(1);

  let task = tokio::spawn(async move {
    let mut dirty = false;
    loop {
      // The sleep is re-created on every iteration: the idle window is
      // measured from the most recent signal, not from the last flush.
      tokio::select! {
        notice = rx.recv() => match notice {
          Some(()) => dirty = true,
          None => break,
        },
        _ = tokio::time::sleep(idle) => {
          if dirty {
            if let Err(err) = store.flush().await {
              tracing::warn!("coalesced flush failed: {err}");
            }
            dirty = false;
          }
        }
      }
    }

    if dirty {
      if let Err(err) = store.flush().await {
        tracing::warn!("final flush failed: {err}");
      }
    }
  });

  (FlushHandle { tx }, task)
}
