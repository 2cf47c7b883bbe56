use crate::history::HistorySample;
use serde::{Deserialize, Serialize};
use virtuoso_domain_eval::{Judgment, MissReason, PerformanceStats};
use virtuoso_domain_song::ScheduledNote;
use virtuoso_ports::generation::GeneratedSongDto;
use virtuoso_ports::storage::SettingsDto;
use virtuoso_ports::types::{Difficulty, TimeMs, Volume01};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Menu,
    Playing,
    Finished,
}

/// Input edge as delivered by an input adapter. Auto-repeat must already be
/// filtered out upstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Press(String),
    Release(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    StartGame,
    Replay,
    StopGame,
    BackToMenu,
    PressNote { note: String },
    ReleaseNote { note: String },
    GenerateSong { topic: Option<String>, difficulty: Option<Difficulty> },
    LoadSong { song: GeneratedSongDto, difficulty: Difficulty },
    LoadBuiltinSong,
    SetGenerationTopic { topic: String },
    SetGenerationDifficulty { difficulty: Difficulty },
    SetMasterVolume { volume: Volume01 },
    SetNoteDurationMs { ms: u32 },
    SetFrameIntervalMs { ms: u64 },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    SessionStateUpdated { state: SessionState },
    SongLoaded {
        title: String,
        description: String,
        difficulty: Difficulty,
        note_count: usize,
    },
    GenerationStarted { topic: String, difficulty: Difficulty },
    GenerationFailed { message: String },
    JudgeFeedback {
        note_id: Option<String>,
        note_name: String,
        judgment: Judgment,
        delta_ms: Option<TimeMs>,
        miss_reason: Option<MissReason>,
    },
    StatsUpdated { stats: PerformanceStats, accuracy: f32 },
    ClockAnomaly { raw_delta_ms: TimeMs, clamped_delta_ms: TimeMs },
    SettingsUpdated { settings: SettingsDto },
}

/// Read-only view handed to renderers once per frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub current_time: TimeMs,
    pub title: String,
    pub notes: Vec<ScheduledNote>,
    pub stats: PerformanceStats,
    pub history: Vec<HistorySample>,
    pub guide_notes: Vec<String>,
    pub held_notes: Vec<String>,
}
