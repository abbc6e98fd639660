//! Resend cooldown countdown.
//!
//! A single countdown that ticks down once per period on a tokio task.
//! Starting a new countdown supersedes the running one: the old task is
//! aborted and a generation counter makes sure a tick already in flight
//! cannot touch the new value.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Countdown {
    generation: u64,
    remaining: u32,
}

/// Owned countdown used to gate "resend code".
///
/// Must be used from within a tokio runtime.
pub struct TimerService {
    period: Duration,
    state: Arc<watch::Sender<Countdown>>,
    ticker: Option<JoinHandle<()>>,
}

impl TimerService {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    pub fn new(period: Duration) -> Self {
        let (state, _) = watch::channel(Countdown::default());
        Self {
            period,
            state: Arc::new(state),
            ticker: None,
        }
    }

    /// Cancel any running countdown and begin a new one at `seconds`.
    pub fn start(&mut self, seconds: u32) {
        self.cancel();

        let mut generation = 0;
        self.state.send_modify(|c| {
            c.generation += 1;
            c.remaining = seconds;
            generation = c.generation;
        });

        if seconds == 0 {
            return;
        }

        debug!(seconds, generation, "Countdown started");

        let state = Arc::clone(&self.state);
        let period = self.period;
        self.ticker = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;

                let mut finished = false;
                state.send_if_modified(|c| {
                    if c.generation != generation {
                        finished = true;
                        return false;
                    }
                    c.remaining = c.remaining.saturating_sub(1);
                    finished = c.remaining == 0;
                    true
                });

                if finished {
                    break;
                }
            }
        }));
    }

    /// Stop the running countdown, keeping its last value.
    pub fn cancel(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        // Invalidate any tick that raced past the abort
        self.state.send_if_modified(|c| {
            c.generation += 1;
            false
        });
    }

    /// Stop the running countdown and zero it.
    pub fn reset(&mut self) {
        self.cancel();
        self.state.send_modify(|c| c.remaining = 0);
    }

    /// Seconds (ticks) left before resend is allowed.
    pub fn remaining(&self) -> u32 {
        self.state.borrow().remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining() > 0
            && self
                .ticker
                .as_ref()
                .map(|ticker| !ticker.is_finished())
                .unwrap_or(false)
    }

    /// Receiver that yields the remaining count on every tick.
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        let mut source = self.state.subscribe();
        let (tx, rx) = watch::channel(source.borrow().remaining);
        tokio::spawn(async move {
            while source.changed().await.is_ok() {
                let remaining = source.borrow_and_update().remaining;
                if tx.send(remaining).is_err() {
                    break;
                }
            }
        });
        rx
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}
