use serde::{Deserialize, Serialize};

pub const PERFECT_BASE_SCORE: u64 = 100;
pub const PERFECT_COMBO_BONUS: u64 = 10;
pub const GOOD_BASE_SCORE: u64 = 50;
pub const GOOD_COMBO_BONUS: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Judgment {
    Perfect,
    Good,
    Miss,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub score: u64,
    pub perfect: u32,
    pub good: u32,
    pub miss: u32,
    pub combo: u32,
    pub max_combo: u32,
}

impl PerformanceStats {
    /// Folds one judgment in. The combo bonus uses the combo value from
    /// before this judgment.
    pub fn apply(&mut self, judgment: Judgment) {
        let combo = u64::from(self.combo);
        match judgment {
            Judgment::Perfect => {
                self.score += PERFECT_BASE_SCORE + combo * PERFECT_COMBO_BONUS;
                self.perfect += 1;
                self.combo += 1;
            }
            Judgment::Good => {
                self.score += GOOD_BASE_SCORE + combo * GOOD_COMBO_BONUS;
                self.good += 1;
                self.combo += 1;
            }
            Judgment::Miss => {
                self.combo = 0;
                self.miss += 1;
            }
        }
        self.max_combo = self.max_combo.max(self.combo);
    }

    pub fn judged(&self) -> u32 {
        self.perfect + self.good + self.miss
    }

    pub fn accuracy(&self) -> f32 {
        let total = self.judged();
        if total == 0 {
            0.0
        } else {
            (self.perfect + self.good) as f32 / total as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_bonus_uses_pre_increment_combo() {
        let mut stats = PerformanceStats::default();
        stats.apply(Judgment::Perfect);
        stats.apply(Judgment::Perfect);
        stats.apply(Judgment::Good);

        // 100 + (100 + 10) + (50 + 2*5)
        assert_eq!(stats.score, 270);
        assert_eq!(stats.combo, 3);
        assert_eq!(stats.max_combo, 3);
    }

    #[test]
    fn miss_resets_combo_but_keeps_max() {
        let mut stats = PerformanceStats::default();
        stats.apply(Judgment::Good);
        stats.apply(Judgment::Good);
        stats.apply(Judgment::Miss);
        stats.apply(Judgment::Perfect);

        assert_eq!(stats.combo, 1);
        assert_eq!(stats.max_combo, 2);
        assert_eq!(stats.miss, 1);
        assert_eq!(stats.score, 50 + 55 + 100);
    }

    #[test]
    fn accuracy_counts_hits_over_judged() {
        let mut stats = PerformanceStats::default();
        assert_eq!(stats.accuracy(), 0.0);
        stats.apply(Judgment::Perfect);
        stats.apply(Judgment::Miss);
        assert_eq!(stats.accuracy(), 0.5);
    }
}
