//! src/util/clock.rs
//! Wall-clock abstraction so commit timestamps and generated ids can be
//! pinned in tests.

use std::fmt::Debug;

use chrono::{DateTime, Local};

pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Reads the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
