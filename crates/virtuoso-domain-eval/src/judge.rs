use crate::stats::{Judgment, PerformanceStats};
use serde::{Deserialize, Serialize};
use virtuoso_domain_song::Song;
use virtuoso_ports::types::TimeMs;

/// Maximum distance between a press and a note start for the note to be eligible.
pub const HIT_WINDOW_MS: TimeMs = 300.0;
/// Presses strictly closer than this are Perfect; the rest of the window is Good.
pub const PERFECT_WINDOW_MS: TimeMs = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissReason {
    /// A press with no eligible Pending note.
    WrongNote,
    /// A note whose window closed without a press.
    Expired,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub judgment: Judgment,
    pub note_id: Option<String>,
    pub delta_ms: Option<TimeMs>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JudgeEvent {
    Hit {
        note_id: String,
        note_name: String,
        judgment: Judgment,
        delta_ms: TimeMs,
    },
    Miss {
        note_id: Option<String>,
        note_name: String,
        reason: MissReason,
    },
    Stats(PerformanceStats),
}

/// Classifies one press against the schedule and marks the matched note Hit.
/// A Miss mutates nothing.
pub fn judge(song: &mut Song, note_name: &str, now: TimeMs) -> Verdict {
    let matched = song
        .find_match_index(note_name, now, HIT_WINDOW_MS)
        .and_then(|idx| song.note_mut(idx));
    let Some(note) = matched else {
        return Verdict {
            judgment: Judgment::Miss,
            note_id: None,
            delta_ms: None,
        };
    };

    let delta = now - note.start_time;
    let judgment = if delta.abs() < PERFECT_WINDOW_MS {
        Judgment::Perfect
    } else {
        Judgment::Good
    };
    note.mark_hit();

    Verdict {
        judgment,
        note_id: Some(note.id.clone()),
        delta_ms: Some(delta),
    }
}

/// Owns the running stats for one play-through and turns presses and clock
/// advances into [`JudgeEvent`]s.
#[derive(Debug, Default)]
pub struct Judge {
    stats: PerformanceStats,
}

impl Judge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> PerformanceStats {
        self.stats
    }

    pub fn reset(&mut self) {
        self.stats = PerformanceStats::default();
    }

    pub fn on_press(&mut self, song: &mut Song, note_name: &str, now: TimeMs) -> Vec<JudgeEvent> {
        let verdict = judge(song, note_name, now);
        let mut events = Vec::with_capacity(2);

        match (&verdict.note_id, verdict.delta_ms) {
            (Some(note_id), Some(delta_ms)) => {
                log::debug!(
                    "{:?} on {} ({}) at {:.1}ms, delta {:+.1}ms",
                    verdict.judgment,
                    note_id,
                    note_name,
                    now,
                    delta_ms
                );
                events.push(JudgeEvent::Hit {
                    note_id: note_id.clone(),
                    note_name: note_name.to_string(),
                    judgment: verdict.judgment,
                    delta_ms,
                });
            }
            _ => {
                log::debug!("wrong note {} at {:.1}ms", note_name, now);
                events.push(JudgeEvent::Miss {
                    note_id: None,
                    note_name: note_name.to_string(),
                    reason: MissReason::WrongNote,
                });
            }
        }

        self.stats.apply(verdict.judgment);
        events.push(JudgeEvent::Stats(self.stats));
        events
    }

    /// Miss sweep: every Pending note whose window closed before `now` becomes
    /// Missed, once. Run it before judging input for the same instant.
    pub fn advance_to(&mut self, song: &mut Song, now: TimeMs) -> Vec<JudgeEvent> {
        let mut events = Vec::new();
        for note in song.notes_mut() {
            if !note.is_pending() || now - (note.start_time + HIT_WINDOW_MS) <= 0.0 {
                continue;
            }
            if !note.mark_missed() {
                continue;
            }
            log::debug!("note {} ({}) expired at {:.1}ms", note.id, note.note_name, now);
            events.push(JudgeEvent::Miss {
                note_id: Some(note.id.clone()),
                note_name: note.note_name.clone(),
                reason: MissReason::Expired,
            });
            self.stats.apply(Judgment::Miss);
        }

        if !events.is_empty() {
            events.push(JudgeEvent::Stats(self.stats));
        }
        events
    }
}
