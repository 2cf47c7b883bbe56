use crate::model::{ScheduledNote, Song};
use virtuoso_ports::types::Difficulty;

const TWINKLE: [(&str, f64, f64); 14] = [
    ("C4", 0.0, 500.0),
    ("C4", 600.0, 500.0),
    ("G4", 1200.0, 500.0),
    ("G4", 1800.0, 500.0),
    ("A4", 2400.0, 500.0),
    ("A4", 3000.0, 500.0),
    ("G4", 3600.0, 1000.0),
    ("F4", 4800.0, 500.0),
    ("F4", 5400.0, 500.0),
    ("E4", 6000.0, 500.0),
    ("E4", 6600.0, 500.0),
    ("D4", 7200.0, 500.0),
    ("D4", 7800.0, 500.0),
    ("C4", 8400.0, 1000.0),
];

/// The song loaded before anything has been generated.
pub fn twinkle_twinkle() -> Song {
    let notes = TWINKLE
        .iter()
        .enumerate()
        .map(|(idx, (name, start, duration))| {
            ScheduledNote::new((idx + 1).to_string(), *name, *start, *duration)
        })
        .collect();
    Song::new(
        "Twinkle Twinkle Little Star",
        "A classic beginner nursery rhyme.",
        100.0,
        Difficulty::Easy,
        notes,
    )
}
