use serde::{Deserialize, Serialize};
use virtuoso_ports::types::TimeMs;

pub const HISTORY_INTERVAL_MS: TimeMs = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub time: TimeMs,
    pub score: u64,
}

/// Append-only score timeline, at most one sample per interval bucket.
#[derive(Clone, Debug)]
pub struct HistoryRecorder {
    interval_ms: TimeMs,
    next_due: TimeMs,
    samples: Vec<HistorySample>,
}

impl Default for HistoryRecorder {
    fn default() -> Self {
        Self::new(HISTORY_INTERVAL_MS)
    }
}

impl HistoryRecorder {
    pub fn new(interval_ms: TimeMs) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            next_due: 0.0,
            samples: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.next_due = 0.0;
        self.samples.clear();
    }

    pub fn record(&mut self, time: TimeMs, score: u64) -> bool {
        if time < self.next_due {
            return false;
        }
        self.samples.push(HistorySample { time, score });
        self.next_due = ((time / self.interval_ms).floor() + 1.0) * self.interval_ms;
        true
    }

    pub fn samples(&self) -> &[HistorySample] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_once_per_bucket() {
        let mut history = HistoryRecorder::default();

        for t in [0.0, 16.0, 33.0, 50.0, 66.0, 99.0, 100.0, 260.0] {
            history.record(t, t as u64);
        }

        let times: Vec<_> = history.samples().iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0.0, 50.0, 100.0, 260.0]);
    }

    #[test]
    fn reset_empties_timeline() {
        let mut history = HistoryRecorder::default();
        history.record(120.0, 10);
        history.reset();

        assert!(history.samples().is_empty());
        assert!(history.record(0.0, 0));
    }
}
