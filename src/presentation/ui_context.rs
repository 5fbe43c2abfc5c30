//! Explicit UI-affine execution context.
//!
//! Completions that touch UI-visible state are marshalled onto one logical
//! main queue: producers hold a cloneable [`UiContext`] and the owner of the
//! render loop drains the matching [`UiRunner`]. Only short, already-resolved
//! continuations belong here, never network I/O.

use tokio::sync::mpsc;

type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Creates a connected context/runner pair.
#[must_use]
pub fn ui_channel() -> (UiContext, UiRunner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiContext { tx }, UiRunner { rx })
}

/// Cloneable handle that schedules closures onto the UI queue.
///
/// Passed explicitly to anything that delivers completions there; there is no
/// ambient scheduler to capture.
#[derive(Clone)]
pub struct UiContext {
    tx: mpsc::UnboundedSender<UiTask>,
}

impl UiContext {
    /// Enqueues a closure to run on the UI queue.
    ///
    /// Silently dropped when the runner is gone; a UI that is shutting down
    /// has no use for late completions.
    pub fn run<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let _ = self.tx.send(Box::new(task));
    }
}

impl std::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiContext").finish_non_exhaustive()
    }
}

/// Receiving side of the UI queue, owned by the main loop.
pub struct UiRunner {
    rx: mpsc::UnboundedReceiver<UiTask>,
}

impl UiRunner {
    /// Runs queued tasks until every [`UiContext`] handle is dropped.
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            task();
        }
    }

    /// Drains currently queued tasks without waiting. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }
}

impl std::fmt::Debug for UiRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiRunner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[tokio::test]
    async fn test_tasks_run_in_fifo_order() {
        let (ctx, mut runner) = ui_channel();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let seen = Arc::clone(&seen);
            ctx.run(move || seen.lock().push(i));
        }

        assert_eq!(runner.run_pending(), 3);
        assert_eq!(*seen.lock(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_run_pending_on_empty_queue() {
        let (_ctx, mut runner) = ui_channel();
        assert_eq!(runner.run_pending(), 0);
    }

    #[tokio::test]
    async fn test_run_exits_when_handles_dropped() {
        let (ctx, runner) = ui_channel();
        let seen = Arc::new(Mutex::new(0));

        let counter = Arc::clone(&seen);
        ctx.run(move || *counter.lock() += 1);
        drop(ctx);

        tokio::time::timeout(std::time::Duration::from_secs(1), runner.run())
            .await
            .expect("runner should exit once senders are gone");
        assert_eq!(*seen.lock(), 1);
    }

    #[tokio::test]
    async fn test_enqueue_after_runner_dropped_is_silent() {
        let (ctx, runner) = ui_channel();
        drop(runner);
        ctx.run(|| panic!("never runs"));
    }
}
