//! Per-invocation execution context handed to a job by the scheduler.

use tokio::sync::watch;

/// Scheduler side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Requests cancellation of every job holding the paired signal.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Job side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Creates a linked handle/signal pair.
    #[must_use]
    pub fn pair() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, Self { rx })
    }

    /// A signal that never fires.
    #[must_use]
    pub fn never() -> Self {
        let (_, signal) = Self::pair();
        signal
    }

    /// Returns true if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once cancellation is requested.
    ///
    /// Pends forever if the handle is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let fired = rx.wait_for(|cancelled| *cancelled).await.is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::never()
    }
}

/// Execution context for one job invocation.
///
/// Carries the identity the scheduler assigned to the invocation (used to
/// correlate log output) and the cancellation signal for in-flight work.
#[derive(Debug, Clone)]
pub struct JobContext {
    job_id: String,
    cancel: CancelSignal,
}

impl JobContext {
    /// Creates a context that is never cancelled.
    #[must_use]
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            cancel: CancelSignal::never(),
        }
    }

    /// Attaches a cancellation signal.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the scheduler-assigned job id.
    #[must_use]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Returns the cancellation signal.
    #[must_use]
    pub const fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    /// The job's logger: a span that scopes all events of this invocation.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("webhook_job", job_id = %self.job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn new_context_is_not_cancelled() {
        let ctx = JobContext::new("job-1");

        assert_eq!(ctx.job_id(), "job-1");
        assert!(!ctx.cancel_signal().is_cancelled());
    }

    #[test]
    fn cancel_is_visible_to_all_clones() {
        let (handle, signal) = CancelSignal::pair();
        let other = signal.clone();

        handle.cancel();

        assert!(signal.is_cancelled());
        assert!(other.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_completes_after_cancel() {
        let (handle, signal) = CancelSignal::pair();
        let waiter = tokio::spawn(async move { signal.cancelled().await });

        handle.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancelled() should complete")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn never_signal_does_not_complete() {
        let signal = CancelSignal::never();

        let result = tokio::time::timeout(Duration::from_secs(60), signal.cancelled()).await;

        assert!(result.is_err());
    }

    #[test]
    fn context_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JobContext>();
    }
}
