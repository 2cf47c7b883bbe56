use serde::Serialize;
use virtuoso_core::{AppCore, SessionState};
use virtuoso_domain_eval::PerformanceStats;
use virtuoso_domain_song::HitState;

#[derive(Debug, Serialize)]
pub struct Report {
    pub title: String,
    pub state: SessionState,
    pub stats: PerformanceStats,
    pub accuracy: f32,
    pub notes_hit: usize,
    pub notes_missed: usize,
    pub notes_pending: usize,
    pub history_samples: usize,
    pub final_time_ms: f64,
}

impl Report {
    pub fn from_core(core: &AppCore) -> Self {
        let session = core.session();
        let song = session.song();
        let stats = session.stats();
        Self {
            title: song.title.clone(),
            state: session.state(),
            stats,
            accuracy: stats.accuracy(),
            notes_hit: song.count(HitState::Hit),
            notes_missed: song.count(HitState::Missed),
            notes_pending: song.count(HitState::Pending),
            history_samples: session.history().len(),
            final_time_ms: session.current_time(),
        }
    }
}
