//! Wall-clock abstraction.
//!
//! Block timestamps and challenge expiry both read seconds-granularity
//! wall time. The trait exists so tests can drive the clock; production
//! code uses [`SystemClock`].

use std::sync::atomic::{AtomicI64, Ordering};

/// A source of Unix-seconds wall time.
pub trait Clock: Send + Sync {
    /// Current time, seconds since epoch.
    fn now_secs(&self) -> i64;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_secs() as i64
    }
}

/// A clock that only moves when told to.
///
/// For tests and simulations: set an issuance time, advance past the
/// challenge window, and observe expiry without waiting.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock pinned at the given time.
    pub fn new(now_secs: i64) -> Self {
        Self {
            now: AtomicI64::new(now_secs),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Pin the clock to an absolute time.
    pub fn set(&self, now_secs: i64) {
        self.now.store(now_secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
