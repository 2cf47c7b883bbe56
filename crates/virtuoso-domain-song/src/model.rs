use serde::{Deserialize, Serialize};
use virtuoso_ports::types::{Difficulty, TimeMs};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitState {
    #[default]
    Pending,
    Hit,
    Missed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNote {
    pub id: String,
    pub note_name: String,
    pub start_time: TimeMs,
    pub duration: TimeMs,
    hit_state: HitState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub description: String,
    pub bpm: f64,
    pub difficulty: Difficulty,
    notes: Vec<ScheduledNote>,
}

impl ScheduledNote {
    pub fn new(id: impl Into<String>, note_name: impl Into<String>, start_time: TimeMs, duration: TimeMs) -> Self {
        Self {
            id: id.into(),
            note_name: note_name.into(),
            start_time,
            duration,
            hit_state: HitState::Pending,
        }
    }

    pub fn hit_state(&self) -> HitState {
        self.hit_state
    }

    pub fn is_pending(&self) -> bool {
        self.hit_state == HitState::Pending
    }

    pub fn end_time(&self) -> TimeMs {
        self.start_time + self.duration
    }

    /// Pending -> Hit. Returns false if the note was already resolved.
    pub fn mark_hit(&mut self) -> bool {
        self.resolve(HitState::Hit)
    }

    /// Pending -> Missed. Returns false if the note was already resolved.
    pub fn mark_missed(&mut self) -> bool {
        self.resolve(HitState::Missed)
    }

    fn resolve(&mut self, to: HitState) -> bool {
        if self.hit_state != HitState::Pending {
            return false;
        }
        self.hit_state = to;
        true
    }
}

impl Song {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        bpm: f64,
        difficulty: Difficulty,
        notes: Vec<ScheduledNote>,
    ) -> Self {
        let mut song = Self {
            title: title.into(),
            description: description.into(),
            bpm,
            difficulty,
            notes,
        };
        song.reset();
        song
    }

    pub fn notes(&self) -> &[ScheduledNote] {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> impl Iterator<Item = &mut ScheduledNote> {
        self.notes.iter_mut()
    }

    pub fn note_mut(&mut self, index: usize) -> Option<&mut ScheduledNote> {
        self.notes.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Puts every note back to Pending. Stats live elsewhere and are untouched.
    pub fn reset(&mut self) {
        for note in &mut self.notes {
            note.hit_state = HitState::Pending;
        }
    }

    /// A copy of this song with every note Pending.
    pub fn fresh(&self) -> Song {
        let mut song = self.clone();
        song.reset();
        song
    }

    /// First Pending note in schedule order with this name whose start lies
    /// within `tolerance` of `now`. Schedule order wins over proximity.
    pub fn find_match(&self, note_name: &str, now: TimeMs, tolerance: TimeMs) -> Option<&ScheduledNote> {
        self.find_match_index(note_name, now, tolerance)
            .map(|idx| &self.notes[idx])
    }

    pub fn find_match_index(&self, note_name: &str, now: TimeMs, tolerance: TimeMs) -> Option<usize> {
        self.notes.iter().position(|note| {
            note.is_pending()
                && note.note_name == note_name
                && (note.start_time - now).abs() <= tolerance
        })
    }

    /// `start + duration` of the last note in schedule order, even if an
    /// earlier note rings longer. None for an empty song.
    pub fn end_time(&self) -> Option<TimeMs> {
        self.notes.last().map(ScheduledNote::end_time)
    }

    pub fn count(&self, state: HitState) -> usize {
        self.notes.iter().filter(|n| n.hit_state == state).count()
    }
}
