use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NoteKind {
    Natural,
    Sharp,
}

/// One playable key. Static, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NoteDefinition {
    pub name: &'static str,
    pub frequency_hz: f32,
    pub kind: NoteKind,
    pub keyboard_key: char,
}

const fn def(name: &'static str, frequency_hz: f32, kind: NoteKind, keyboard_key: char) -> NoteDefinition {
    NoteDefinition {
        name,
        frequency_hz,
        kind,
        keyboard_key,
    }
}

pub static PIANO_NOTES: [NoteDefinition; 15] = [
    def("C4", 261.63, NoteKind::Natural, 'a'),
    def("C#4", 277.18, NoteKind::Sharp, 'w'),
    def("D4", 293.66, NoteKind::Natural, 's'),
    def("D#4", 311.13, NoteKind::Sharp, 'e'),
    def("E4", 329.63, NoteKind::Natural, 'd'),
    def("F4", 349.23, NoteKind::Natural, 'f'),
    def("F#4", 369.99, NoteKind::Sharp, 't'),
    def("G4", 392.00, NoteKind::Natural, 'g'),
    def("G#4", 415.30, NoteKind::Sharp, 'y'),
    def("A4", 440.00, NoteKind::Natural, 'h'),
    def("A#4", 466.16, NoteKind::Sharp, 'u'),
    def("B4", 493.88, NoteKind::Natural, 'j'),
    def("C5", 523.25, NoteKind::Natural, 'k'),
    def("C#5", 554.37, NoteKind::Sharp, 'o'),
    def("D5", 587.33, NoteKind::Natural, 'l'),
];

pub fn note_by_name(name: &str) -> Option<&'static NoteDefinition> {
    PIANO_NOTES.iter().find(|note| note.name == name)
}

pub fn note_by_keyboard_key(key: char) -> Option<&'static NoteDefinition> {
    let key = key.to_ascii_lowercase();
    PIANO_NOTES.iter().find(|note| note.keyboard_key == key)
}

pub fn is_known_note(name: &str) -> bool {
    note_by_name(name).is_some()
}
