//! The work queue carrying job identifiers to the worker pool.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

/// Unbounded queue of job identifiers awaiting a worker.
///
/// The send side fans in from the submission surface; the receive side is
/// shared, so any number of workers may block in [`WorkQueue::dequeue`]
/// and each queued identifier is delivered to exactly one of them.
/// Cloning the queue clones both handles onto the same channel.
#[derive(Debug, Clone)]
pub struct WorkQueue {
    tx: mpsc::UnboundedSender<String>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Enqueues a job identifier for eventual delivery to one worker.
    pub fn enqueue(&self, job_id: impl Into<String>) {
        let job_id = job_id.into();
        log::debug!("Enqueuing job {job_id}");
        if self.tx.send(job_id).is_err() {
            log::warn!("Work queue is closed; dropping job identifier");
        }
    }

    /// Takes the next job identifier, suspending the calling worker until
    /// one is available. There is no timeout: under empty load workers
    /// idle here indefinitely.
    ///
    /// Returns `None` once the queue has been closed and drained, which
    /// is the workers' signal to exit.
    pub async fn dequeue(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }

    /// Closes the queue: already-queued identifiers are still delivered,
    /// after which `dequeue` returns `None`.
    pub async fn close(&self) {
        self.rx.lock().await.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_in_fifo_order() {
        let queue = WorkQueue::new();
        queue.enqueue("first");
        queue.enqueue("second");

        assert_eq!(queue.dequeue().await.as_deref(), Some("first"));
        assert_eq!(queue.dequeue().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn each_entry_goes_to_exactly_one_consumer() {
        let queue = WorkQueue::new();
        queue.enqueue("only");

        let a = queue.clone();
        let b = queue.clone();
        queue.close().await;

        let (from_a, from_b) = tokio::join!(a.dequeue(), b.dequeue());
        let delivered: Vec<String> = from_a.into_iter().chain(from_b).collect();

        assert_eq!(delivered, vec!["only".to_string()]);
    }

    #[tokio::test]
    async fn close_drains_then_ends() {
        let queue = WorkQueue::new();
        queue.enqueue("queued");
        queue.close().await;

        assert_eq!(queue.dequeue().await.as_deref(), Some("queued"));
        assert_eq!(queue.dequeue().await, None);
    }
}
