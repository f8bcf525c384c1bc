//! Tracked background tasks.

use std::future::Future;
use std::sync::Mutex;

use tokio::task::JoinHandle;

/// Registry of in-flight background sync tasks.
///
/// Remote stock syncs are fire-and-forget from the caller's point of view,
/// but the handles are tracked so tests (and orderly shutdown) can wait for
/// the in-flight set to settle with [`SyncTracker::flush`].
#[derive(Debug, Default)]
pub struct SyncTracker {
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a tracked background task.
    pub fn spawn(&self, fut: impl Future<Output = ()> + Send + 'static) {
        let handle = tokio::spawn(fut);
        self.tasks.lock().unwrap().push(handle);
    }

    /// Number of tasks spawned and not yet flushed.
    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Waits until every tracked task has settled, including tasks spawned
    /// while flushing.
    pub async fn flush(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = {
                let mut tasks = self.tasks.lock().unwrap();
                tasks.drain(..).collect()
            };
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!(error = %e, "background sync task panicked");
                }
            }
        }
    }
}
