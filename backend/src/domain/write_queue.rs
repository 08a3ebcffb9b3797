//! FIFO write serializer.
//!
//! The posts document is a single file, so two concurrent read-modify-write
//! sequences would lose updates. [`WriteQueue`] funnels every such sequence
//! through one worker task: jobs run strictly one at a time in the order
//! [`WriteQueue::enqueue`] was called.
//!
//! Guarantees:
//! - A job that returns an error is just a result; later jobs still run.
//! - A job that panics is caught and reported as
//!   [`WriteQueueError::TaskPanicked`]; the worker keeps draining.
//! - Once enqueued, a job runs to completion even if the caller stops
//!   waiting (for example because the HTTP client disconnected).
//! - Jobs run inside the enqueuing caller's [`TraceId`] scope.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::middleware::trace::TraceId;

type Job = BoxFuture<'static, ()>;

/// Failures of the queue itself, as opposed to failures of a job.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteQueueError {
    /// The worker has stopped; nothing can be enqueued.
    #[error("write queue is closed")]
    Closed,
    /// The job panicked before producing a result.
    #[error("write queue task panicked")]
    TaskPanicked,
}

/// Handle to a single-worker FIFO executor.
///
/// Cloning the handle shares the same worker. The worker stops once every
/// handle has been dropped and the backlog is drained.
#[derive(Clone, Debug)]
pub struct WriteQueue {
    sender: mpsc::UnboundedSender<Job>,
}

impl WriteQueue {
    /// Spawn the worker on the current Tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn spawn() -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                job.await;
            }
            debug!("write queue drained and closed");
        });
        Self { sender }
    }

    /// Run `task` after every previously enqueued task has finished.
    ///
    /// # Errors
    /// Returns [`WriteQueueError::Closed`] when the worker is gone and
    /// [`WriteQueueError::TaskPanicked`] when `task` panicked.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::WriteQueue;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let queue = WriteQueue::spawn();
    /// let value = queue.enqueue(async { 2 + 2 }).await.expect("queue open");
    /// assert_eq!(value, 4);
    /// # });
    /// ```
    pub async fn enqueue<Fut, T>(&self, task: Fut) -> Result<T, WriteQueueError>
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply, outcome) = oneshot::channel();
        let trace_id = TraceId::current();
        let job = async move {
            let result = match trace_id {
                Some(id) => AssertUnwindSafe(TraceId::scope(id, task)).catch_unwind().await,
                None => AssertUnwindSafe(task).catch_unwind().await,
            };
            let result = result.map_err(|_| {
                error!("write queue task panicked; continuing with next task");
                WriteQueueError::TaskPanicked
            });
            if reply.send(result).is_err() {
                debug!("write queue caller stopped waiting; result discarded");
            }
        };

        self.sender
            .send(Box::pin(job))
            .map_err(|_| WriteQueueError::Closed)?;
        outcome.await.map_err(|_| WriteQueueError::Closed)?
    }
}
