//! Deferred execution ("next tick")
//!
//! Work scheduled here never runs inside the caller's stack frame. Route
//! redirects use it so a navigation is never started while another
//! transition is still being evaluated.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::runtime::Handle;

/// A unit of deferred work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run a task on a later scheduling turn
pub trait Scheduler: Send + Sync {
    fn defer(&self, task: Task);
}

/// Scheduler backed by the tokio runtime
///
/// Each task is spawned and yields once before running, so it never runs
/// inline. On a multi-thread runtime another worker may pick it up while
/// the caller is still busy, so it can overlap the rest of the caller's
/// work. For strict next-tick ordering, build it with
/// [`TokioScheduler::with_handle`] on a current-thread runtime.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    handle: Option<Handle>,
}

impl TokioScheduler {
    /// Use the runtime that is current when a task is deferred
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Always spawn onto the given runtime
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn defer(&self, task: Task) {
        let handle = match self.handle.clone().or_else(|| Handle::try_current().ok()) {
            Some(handle) => handle,
            None => {
                tracing::error!("No tokio runtime available; deferred task dropped");
                return;
            }
        };

        handle.spawn(async move {
            tokio::task::yield_now().await;
            task();
        });
        tracing::debug!("Task deferred to next tick");
    }
}

/// Scheduler that only runs tasks when asked to
///
/// Tasks deferred while [`ManualScheduler::run_pending`] is running are kept
/// for the following call, which mirrors a real next-tick queue.
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<VecDeque<Task>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting
    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Run every task queued before this call. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        // Release the lock before running: tasks may defer more work.
        let batch = {
            let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *queue)
        };
        let ran = batch.len();
        for task in batch {
            task();
        }
        ran
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, task: Task) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_manual_scheduler_runs_only_on_demand() {
        let scheduler = ManualScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        scheduler.defer(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_manual_scheduler_defers_nested_tasks_to_next_round() {
        let scheduler = Arc::new(ManualScheduler::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let s = scheduler.clone();
        let c = counter.clone();
        scheduler.defer(Box::new(move || {
            let c2 = c.clone();
            s.defer(Box::new(move || {
                c2.fetch_add(10, Ordering::SeqCst);
            }));
            c.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_current_thread_handle_runs_after_caller() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let scheduler = TokioScheduler::with_handle(runtime.handle().clone());
        let order = Arc::new(Mutex::new(Vec::new()));

        runtime.block_on(async {
            let o = order.clone();
            scheduler.defer(Box::new(move || o.lock().unwrap().push("deferred")));

            // No worker can take the task while the caller is busy
            std::thread::sleep(std::time::Duration::from_millis(20));
            order.lock().unwrap().push("caller");

            while order.lock().unwrap().len() < 2 {
                tokio::task::yield_now().await;
            }
        });

        assert_eq!(*order.lock().unwrap(), vec!["caller", "deferred"]);
    }

    #[tokio::test]
    async fn test_tokio_scheduler_never_runs_inline() {
        let scheduler = TokioScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = tokio::sync::oneshot::channel();

        let c = counter.clone();
        scheduler.defer(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(());
        }));

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        tokio_test::assert_ok!(rx.await);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
