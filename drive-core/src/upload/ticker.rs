//! ``src/upload/ticker.rs``
//! Tick sources driving the upload simulator.
//!
//! The event loop arms a source when a run starts and disarms it on
//! completion; `next_tick` is only polled while armed. `IntervalTicker` is
//! the wall-clock source, `ImmediateTicker` fires as fast as the loop can
//! poll it and is what tests and scripted runs use.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

pub trait TickSource: Send {
    fn arm(&mut self);

    fn disarm(&mut self);

    fn is_armed(&self) -> bool;

    fn next_tick(&mut self) -> impl Future<Output = ()> + Send;
}

/// Fixed-period timer. The first tick lands one full period after `arm`.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    interval: Option<Interval>,
}

impl IntervalTicker {
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

impl TickSource for IntervalTicker {
    fn arm(&mut self) {
        let period = self.period.max(Duration::from_millis(1));
        let mut interval = time::interval_at(time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    fn next_tick(&mut self) -> impl Future<Output = ()> + Send {
        async move {
            match self.interval.as_mut() {
                Some(interval) => {
                    interval.tick().await;
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}

/// Ticks on every poll, yielding to the runtime in between.
#[derive(Debug, Default)]
pub struct ImmediateTicker {
    armed: bool,
    fired: u64,
}

impl ImmediateTicker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            armed: false,
            fired: 0,
        }
    }

    #[must_use]
    pub const fn fired(&self) -> u64 {
        self.fired
    }
}

impl TickSource for ImmediateTicker {
    fn arm(&mut self) {
        self.armed = true;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn next_tick(&mut self) -> impl Future<Output = ()> + Send {
        async move {
            if !self.armed {
                std::future::pending::<()>().await;
            }
            tokio::task::yield_now().await;
            self.fired += 1;
        }
    }
}
