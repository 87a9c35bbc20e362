use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Body of a repeating task.
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    async fn run(&self);
}

/// Handle to a scheduled task; cancelling stops future runs.
pub trait Cancellable: Send + Sync {
    fn cancel(&self);
}

/// Shared scheduling facility supplied by the host daemon.
pub trait Scheduler: Send + Sync {
    fn schedule_with_fixed_delay(
        &self,
        task: Arc<dyn ScheduledTask>,
        initial_delay: Duration,
        period: Duration,
    ) -> Box<dyn Cancellable>;
}

/// Runs scheduled tasks on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

struct TokioTask(AbortHandle);

impl Cancellable for TokioTask {
    fn cancel(&self) {
        self.0.abort();
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_with_fixed_delay(
        &self,
        task: Arc<dyn ScheduledTask>,
        initial_delay: Duration,
        period: Duration,
    ) -> Box<dyn Cancellable> {
        let join = self.handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + initial_delay, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                task.run().await;
            }
        });
        Box::new(TokioTask(join.abort_handle()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    pub(crate) struct ManualTask {
        pub task: Arc<dyn ScheduledTask>,
        pub initial_delay: Duration,
        pub period: Duration,
        pub cancelled: Arc<AtomicBool>,
    }

    /// Records scheduled tasks so tests can run ticks by hand.
    #[derive(Default)]
    pub(crate) struct ManualScheduler {
        tasks: Mutex<Vec<ManualTask>>,
    }

    struct ManualHandle(Arc<AtomicBool>);

    impl Cancellable for ManualHandle {
        fn cancel(&self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    impl ManualScheduler {
        pub fn scheduled(&self) -> usize {
            self.tasks.lock().len()
        }

        pub fn delays(&self, index: usize) -> (Duration, Duration) {
            let tasks = self.tasks.lock();
            (tasks[index].initial_delay, tasks[index].period)
        }

        pub fn is_cancelled(&self, index: usize) -> bool {
            self.tasks.lock()[index].cancelled.load(Ordering::SeqCst)
        }

        /// Runs every live task once.
        pub async fn tick(&self) {
            let live: Vec<Arc<dyn ScheduledTask>> = self
                .tasks
                .lock()
                .iter()
                .filter(|t| !t.cancelled.load(Ordering::SeqCst))
                .map(|t| Arc::clone(&t.task))
                .collect();
            for task in live {
                task.run().await;
            }
        }
    }

    impl Scheduler for ManualScheduler {
        fn schedule_with_fixed_delay(
            &self,
            task: Arc<dyn ScheduledTask>,
            initial_delay: Duration,
            period: Duration,
        ) -> Box<dyn Cancellable> {
            let cancelled = Arc::new(AtomicBool::new(false));
            self.tasks.lock().push(ManualTask {
                task,
                initial_delay,
                period,
                cancelled: Arc::clone(&cancelled),
            });
            Box::new(ManualHandle(cancelled))
        }
    }
}
