//! Shared simulation clock.
//!
//! The simulation is the only writer. The input activity reads it to stamp
//! freshly fired bullets with a schedule baseline, and to tell a missing cursor
//! after game over apart from a corrupted world.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct SimClock {
    elapsed_ms: Arc<AtomicU64>,
    stopped: Arc<AtomicBool>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::Acquire))
    }

    /// True once the game has ended and no further ticks will run.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    pub(crate) fn publish(&self, now: Duration) {
        let ms = u64::try_from(now.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms.store(ms, Ordering::Release);
    }

    pub(crate) fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }
}
