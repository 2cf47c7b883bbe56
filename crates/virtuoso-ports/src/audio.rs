use crate::types::Volume01;

/// Fire-and-forget note playback. The core never waits on it and never reads
/// anything back, so implementations must not block the caller.
pub trait AudioPort: Send + Sync {
    fn play_note(&self, frequency_hz: f32, duration_ms: Option<u32>);
    fn set_master_volume(&self, volume: Volume01);
}
