use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

/// Coalesces rapid query submissions into one evaluation per quiet period.
///
/// Every [`submit`](Debouncer::submit) resets the timer; when a full quiet
/// period passes with no newer submission, the callback fires once with the
/// most recent value. Filtering re-runs on every keystroke upstream, so this
/// bounds the work to at most one pass per pause in typing.
pub struct Debouncer {
    tx: mpsc::UnboundedSender<String>,
    worker: JoinHandle<()>,
}

impl Debouncer {
    /// Spawn the debounce worker. `on_fire` runs on the runtime's worker
    /// threads and should stay cheap; hand the value off if it isn't.
    pub fn spawn<F>(quiet_period: Duration, mut on_fire: F) -> Self
    where
        F: FnMut(String) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let worker = tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                loop {
                    tokio::select! {
                        _ = sleep(quiet_period) => {
                            on_fire(pending);
                            break;
                        }
                        next = rx.recv() => match next {
                            Some(query) => {
                                trace!("debounce window reset");
                                pending = query;
                            }
                            // Channel closed with a value still pending:
                            // flush it rather than drop the last keystrokes.
                            None => {
                                on_fire(pending);
                                return;
                            }
                        }
                    }
                }
            }
        });
        Self { tx, worker }
    }

    /// Queue a query change. Returns false once the worker has shut down.
    pub fn submit(&self, query: impl Into<String>) -> bool {
        self.tx.send(query.into()).is_ok()
    }

    /// Close the input side and wait for any pending evaluation to flush.
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}
