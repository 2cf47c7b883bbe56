use serde::{Deserialize, Serialize};
use std::fmt;

pub type TimeMs = f64; // song time, ms since the clock origin
pub type HostTime = f64; // host timestamp in ms, monotonic while the process runs

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Gain in `0.0..=1.0`. Deserializing goes through [`Volume01::new`], so a
/// hand-edited settings file cannot push it out of range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "f32")]
pub struct Volume01(pub f32);

impl Volume01 {
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl From<f32> for Volume01 {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_clamped_when_deserialized() {
        let loud: Volume01 = serde_json::from_str("3.0").unwrap();
        let negative: Volume01 = serde_json::from_str("-0.5").unwrap();

        assert_eq!(loud, Volume01(1.0));
        assert_eq!(negative, Volume01(0.0));
        assert_eq!(serde_json::to_string(&Volume01::new(0.25)).unwrap(), "0.25");
    }
}
