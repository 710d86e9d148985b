//! Time and block height as seen by the engine.

use contest_types::{BlockHeight, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the current time and chain height.
pub trait ChainContext: Send + Sync {
    /// Current time in seconds.
    fn now(&self) -> Timestamp;

    /// Current block height.
    fn block_height(&self) -> BlockHeight;
}

/// A clock that only moves when told to.
///
/// Every advance also produces blocks at a fixed block time, so heights stay
/// consistent with timestamps.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicU64,
    height: AtomicU64,
    block_time: u64,
}

impl ManualClock {
    /// Default seconds per block.
    pub const DEFAULT_BLOCK_TIME: u64 = 15;

    /// Creates a clock at `now` and height 1.
    pub fn new(now: Timestamp) -> Self {
        Self::with_block_time(now, Self::DEFAULT_BLOCK_TIME)
    }

    /// Creates a clock with a custom block time (at least one second).
    pub fn with_block_time(now: Timestamp, block_time: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
            height: AtomicU64::new(1),
            block_time: block_time.max(1),
        }
    }

    /// Moves time forward and mines the blocks produced meanwhile (at least one).
    ///
    /// Time and height stop at their maximum instead of wrapping.
    pub fn advance(&self, seconds: u64) {
        saturating_add(&self.now, seconds);
        saturating_add(&self.height, (seconds / self.block_time).max(1));
    }

    /// Mines a single block without moving time.
    pub fn mine(&self) {
        saturating_add(&self.height, 1);
    }
}

fn saturating_add(counter: &AtomicU64, amount: u64) {
    let mut current = counter.load(Ordering::SeqCst);
    loop {
        match counter.compare_exchange_weak(
            current,
            current.saturating_add(amount),
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => return,
            Err(actual) => current = actual,
        }
    }
}

impl ChainContext for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }

    fn block_height(&self) -> BlockHeight {
        self.height.load(Ordering::SeqCst)
    }
}
