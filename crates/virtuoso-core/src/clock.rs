use serde::{Deserialize, Serialize};
use std::time::Instant;
use virtuoso_ports::clock::HostClock;
use virtuoso_ports::types::{HostTime, TimeMs};

/// Largest host delta treated as ordinary elapsed time between two samples.
pub const MAX_TICK_DELTA_MS: TimeMs = 250.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClockAnomaly {
    pub raw_delta_ms: TimeMs,
    pub clamped_delta_ms: TimeMs,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockSample {
    pub time: TimeMs,
    pub anomaly: Option<ClockAnomaly>,
}

/// Song time derived from host timestamps: `current = host - origin`.
///
/// Never runs backwards. A delta above the sanity bound is clamped and the
/// excess is absorbed into the origin, so a suspended host resumes where it
/// left off instead of jumping over notes.
#[derive(Clone, Debug)]
pub struct GameClock {
    origin: HostTime,
    last_host: HostTime,
    current: TimeMs,
    running: bool,
    max_delta_ms: TimeMs,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::with_max_delta(MAX_TICK_DELTA_MS)
    }

    pub fn with_max_delta(max_delta_ms: TimeMs) -> Self {
        Self {
            origin: 0.0,
            last_host: 0.0,
            current: 0.0,
            running: false,
            max_delta_ms: max_delta_ms.max(1.0),
        }
    }

    pub fn start(&mut self, now: HostTime) {
        self.origin = now;
        self.last_host = now;
        self.current = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn origin(&self) -> HostTime {
        self.origin
    }

    pub fn current_time(&self) -> TimeMs {
        self.current
    }

    pub fn advance(&mut self, now: HostTime) -> ClockSample {
        if !self.running || !now.is_finite() {
            return ClockSample {
                time: self.current,
                anomaly: None,
            };
        }

        let delta = now - self.last_host;
        if delta <= 0.0 {
            return ClockSample {
                time: self.current,
                anomaly: None,
            };
        }

        let mut anomaly = None;
        if delta > self.max_delta_ms {
            self.origin += delta - self.max_delta_ms;
            anomaly = Some(ClockAnomaly {
                raw_delta_ms: delta,
                clamped_delta_ms: self.max_delta_ms,
            });
        }

        self.last_host = now;
        self.current = (now - self.origin).max(self.current);
        ClockSample {
            time: self.current,
            anomaly,
        }
    }
}

/// Host clock backed by [`Instant`], reporting ms since construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for SystemClock {
    fn now(&self) -> HostTime {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}
