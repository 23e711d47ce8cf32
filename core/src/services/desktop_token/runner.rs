//! Background execution of fire-and-forget store cleanups.
//!
//! Deleting a consumed or expired token never blocks the response to the
//! caller. The service hands the deletion to a [`TaskRunner`] and moves on;
//! a failed deletion is only logged.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// A detached unit of background work
pub type CleanupJob = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Executes background jobs without the caller awaiting them
pub trait TaskRunner: Send + Sync {
    /// Schedule `job` for execution. Must return without waiting for it.
    fn spawn(&self, name: &'static str, job: CleanupJob);
}

/// Runs jobs on the ambient tokio runtime, bounded by a semaphore
pub struct TokioTaskRunner {
    permits: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
}

impl TokioTaskRunner {
    /// Create a runner allowing at most `max_concurrent` jobs at once
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of jobs spawned and not yet finished
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl Default for TokioTaskRunner {
    fn default() -> Self {
        Self::new(16)
    }
}

impl TaskRunner for TokioTaskRunner {
    fn spawn(&self, name: &'static str, job: CleanupJob) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(job = name, "No tokio runtime available, dropping background job");
                return;
            }
        };

        let permits = Arc::clone(&self.permits);
        let guard = InFlightGuard::enter(&self.in_flight);

        handle.spawn(async move {
            let _guard = guard;
            // Closed semaphores never happen here; run the job anyway if one does.
            let _permit = permits.acquire_owned().await.ok();
            debug!(job = name, "Running background job");
            job.await;
        });
    }
}

/// Counts a job as in flight until dropped, including when the job panics
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Queues jobs until [`ManualTaskRunner::run_pending`] is called
///
/// Useful for tests that need to observe state before and after the
/// background cleanups have run.
#[derive(Default)]
pub struct ManualTaskRunner {
    queue: Mutex<VecDeque<(&'static str, CleanupJob)>>,
}

impl ManualTaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued jobs
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Names of queued jobs, oldest first
    pub fn pending_names(&self) -> Vec<&'static str> {
        self.lock().iter().map(|(name, _)| *name).collect()
    }

    /// Run every queued job to completion, returning how many ran
    pub async fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.lock().pop_front();
            match next {
                Some((name, job)) => {
                    debug!(job = name, "Running queued job");
                    job.await;
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Drop all queued jobs without running them
    pub fn discard_pending(&self) -> usize {
        let mut queue = self.lock();
        let count = queue.len();
        queue.clear();
        count
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<(&'static str, CleanupJob)>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TaskRunner for ManualTaskRunner {
    fn spawn(&self, name: &'static str, job: CleanupJob) {
        self.lock().push_back((name, job));
    }
}
