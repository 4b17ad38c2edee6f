use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delay before the authority recommendation is fetched after the last edit
pub const RECOMMENDATION_DEBOUNCE: Duration = Duration::from_secs(1);

/// Restartable timer: scheduling aborts whatever was pending, so the latest input wins.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Run `task` after the delay, aborting the previously scheduled task
    /// whether it is still waiting or already running.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
