use crate::types::HostTime;
use parking_lot::Mutex;

/// Source of host timestamps. Only the session reads it.
pub trait HostClock: Send + Sync {
    fn now(&self) -> HostTime;
}

/// Deterministic clock driven by hand. Time never moves unless told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<HostTime>,
}

impl ManualClock {
    pub fn new(start: HostTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, delta_ms: HostTime) -> HostTime {
        let mut now = self.now.lock();
        *now += delta_ms;
        *now
    }
}

impl HostClock for ManualClock {
    fn now(&self) -> HostTime {
        *self.now.lock()
    }
}
