//! Wall-clock abstraction.
//!
//! Stores never read the system time directly -- a `Clock` is injected at
//! construction so reconciliation and tick behavior stay testable against
//! a controlled timeline. Timer math itself takes epoch milliseconds as a
//! plain parameter; the trait only decides where those milliseconds come from.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64 {
        self.now().timestamp_millis().max(0) as u64
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock for deterministic tests.
///
/// Clones share the same underlying instant, so a handle kept by the test
/// keeps controlling a clone that was boxed into a store.
#[derive(Debug, Clone)]
pub struct ManualClock {
    epoch_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_epoch_ms: u64) -> Self {
        Self {
            epoch_ms: Arc::new(AtomicU64::new(start_epoch_ms)),
        }
    }

    pub fn set_ms(&self, epoch_ms: u64) {
        self.epoch_ms.store(epoch_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.epoch_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs.saturating_mul(1000));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.epoch_ms.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms as i64).unwrap_or_default()
    }
}
