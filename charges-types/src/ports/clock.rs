//! Time source port.

use crate::domain::TimeMillis;

/// Injected so services stay deterministic under test.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> TimeMillis;
}

/// Wall clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimeMillis {
        TimeMillis::saturating(chrono::Utc::now().timestamp_millis())
    }
}
