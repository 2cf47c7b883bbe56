use crate::types::*;
use serde::{Deserialize, Serialize};

fn default_generation_topic() -> String {
    "Pop hits".to_string()
}

fn default_master_volume() -> Volume01 {
    Volume01::new(0.5)
}

fn default_note_duration_ms() -> u32 {
    500
}

fn default_frame_interval_ms() -> u64 {
    16
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDto {
    #[serde(default = "default_generation_topic")]
    pub generation_topic: String,
    pub generation_difficulty: Difficulty,
    #[serde(default = "default_master_volume")]
    pub master_volume: Volume01,
    #[serde(default = "default_note_duration_ms")]
    pub note_duration_ms: u32,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for SettingsDto {
    fn default() -> Self {
        Self {
            generation_topic: default_generation_topic(),
            generation_difficulty: Difficulty::Easy,
            master_volume: default_master_volume(),
            note_duration_ms: default_note_duration_ms(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

pub trait StoragePort: Send + Sync {
    fn load_settings(&self) -> Result<SettingsDto, StorageError>;
    fn save_settings(&self, s: &SettingsDto) -> Result<(), StorageError>;
}
