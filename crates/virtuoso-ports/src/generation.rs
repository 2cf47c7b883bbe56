use crate::types::Difficulty;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub difficulty: Difficulty,
}

/// Raw chart as handed back by a generator, before any validation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSongDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bpm: Option<f64>,
    #[serde(default)]
    pub notes: Vec<GeneratedNoteDto>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNoteDto {
    pub note_name: String,
    pub start_time: f64,
    pub duration: f64,
}

#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Thread model: `generate` may block for a long time; the core always calls
/// it from a background thread and never from the tick path.
pub trait SongGeneratorPort: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<GeneratedSongDto, GenerationError>;
}
