use crate::catalog::is_known_note;
use crate::model::{ScheduledNote, Song};
use virtuoso_ports::generation::GeneratedSongDto;
use virtuoso_ports::types::Difficulty;

pub const DEFAULT_GENERATED_TITLE: &str = "AI Generated Song";
pub const DEFAULT_GENERATED_DESCRIPTION: &str = "A unique melody created by the generator.";
pub const DEFAULT_GENERATED_BPM: f64 = 100.0;

#[derive(thiserror::Error, Debug)]
pub enum SongError {
    #[error("malformed song data: {0}")]
    Malformed(String),
    #[error("song has no notes")]
    Empty,
    #[error("note {note_id} references unknown pitch {note_name:?}")]
    UnknownNote { note_id: String, note_name: String },
    #[error("note {note_id} has invalid timing: {reason}")]
    InvalidTiming { note_id: String, reason: String },
}

pub fn parse_generated_json(data: &str) -> Result<GeneratedSongDto, SongError> {
    serde_json::from_str(data).map_err(|e| SongError::Malformed(e.to_string()))
}

/// Builds a playable song from a generator payload. The whole song is
/// rejected if any single note fails validation.
pub fn song_from_generated(dto: GeneratedSongDto, difficulty: Difficulty) -> Result<Song, SongError> {
    let notes = dto
        .notes
        .into_iter()
        .enumerate()
        .map(|(idx, note)| {
            ScheduledNote::new(format!("gen-{idx}"), note.note_name, note.start_time, note.duration)
        })
        .collect();

    let bpm = dto
        .bpm
        .filter(|bpm| bpm.is_finite() && *bpm > 0.0)
        .unwrap_or(DEFAULT_GENERATED_BPM);

    let song = Song::new(
        non_blank(dto.title).unwrap_or_else(|| DEFAULT_GENERATED_TITLE.to_string()),
        non_blank(dto.description).unwrap_or_else(|| DEFAULT_GENERATED_DESCRIPTION.to_string()),
        bpm,
        difficulty,
        notes,
    );
    validate_song(&song)?;
    Ok(song)
}

pub fn validate_song(song: &Song) -> Result<(), SongError> {
    if song.is_empty() {
        return Err(SongError::Empty);
    }

    for note in song.notes() {
        if !is_known_note(&note.note_name) {
            return Err(SongError::UnknownNote {
                note_id: note.id.clone(),
                note_name: note.note_name.clone(),
            });
        }
        if !note.start_time.is_finite() || note.start_time < 0.0 {
            return Err(SongError::InvalidTiming {
                note_id: note.id.clone(),
                reason: format!("start time {}", note.start_time),
            });
        }
        if !note.duration.is_finite() || note.duration < 0.0 {
            return Err(SongError::InvalidTiming {
                note_id: note.id.clone(),
                reason: format!("duration {}", note.duration),
            });
        }
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
