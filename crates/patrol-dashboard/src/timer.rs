//! Cancellable timers.
//!
//! Each timer is a spawned tokio task behind a [`TimerHandle`]. Cancelling or
//! dropping the handle aborts the task, so a timer never outlives its owner.

use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

#[derive(Debug)]
pub struct TimerHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// True once the task returned on its own or was aborted.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn cancel(self) {
        // Drop aborts
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            tracing::debug!("Cancelling {} timer", self.name);
        }
        self.task.abort();
    }
}

/// Run `tick` every `period`, first after one full period.
///
/// The loop ends when `tick` returns `ControlFlow::Break` or the handle is
/// cancelled.
pub fn spawn_periodic<F>(name: &'static str, period: Duration, mut tick: F) -> TimerHandle
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    tracing::debug!("Starting {} timer every {:?}", name, period);
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if tick().is_break() {
                tracing::debug!("{} timer stopped itself", name);
                break;
            }
        }
    });
    TimerHandle { name, task }
}

/// Run `f` once after `delay`.
pub fn spawn_delayed<F>(name: &'static str, delay: Duration, f: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let task = tokio::spawn(async move {
        sleep(delay).await;
        f();
    });
    TimerHandle { name, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() -> ControlFlow<()> + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        })
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_after_one_period() {
        let (count, tick) = counter();
        let _timer = spawn_periodic("test", Duration::from_millis(100), tick);

        sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(1_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let (count, tick) = counter();
        let timer = spawn_periodic("test", Duration::from_millis(100), tick);

        sleep(Duration::from_millis(250)).await;
        timer.cancel();
        sleep(Duration::from_millis(1_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_ticks() {
        let (count, tick) = counter();
        {
            let _timer = spawn_periodic("test", Duration::from_millis(100), tick);
            sleep(Duration::from_millis(150)).await;
        }
        sleep(Duration::from_millis(1_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn break_ends_the_loop() {
        let timer = spawn_periodic("test", Duration::from_millis(100), || ControlFlow::Break(()));
        sleep(Duration::from_millis(150)).await;
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_runs_once_unless_cancelled() {
        let fired = Arc::new(AtomicUsize::new(0));

        let inner = fired.clone();
        let _kept = spawn_delayed("kept", Duration::from_millis(100), move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        let inner = fired.clone();
        let dropped = spawn_delayed("dropped", Duration::from_millis(100), move || {
            inner.fetch_add(10, Ordering::SeqCst);
        });
        dropped.cancel();

        sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
