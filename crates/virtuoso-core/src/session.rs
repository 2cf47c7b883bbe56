use crate::clock::{ClockAnomaly, GameClock};
use crate::history::{HistoryRecorder, HistorySample};
use crate::ipc::{InputEvent, SessionSnapshot, SessionState};
use crate::scheduler::{FrameScheduler, PendingFrame};
use std::collections::BTreeSet;
use virtuoso_domain_eval::{Judge, JudgeEvent, PerformanceStats};
use virtuoso_domain_song::Song;
use virtuoso_ports::types::{HostTime, TimeMs};

/// Silence after the last note ends before the session finishes.
pub const END_PADDING_MS: TimeMs = 2000.0;
/// Pending notes this close to the current time light up their key.
pub const GUIDE_WINDOW_MS: TimeMs = 200.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        state: SessionState,
        action: &'static str,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PressOutcome {
    pub accepted: bool,
    pub judge_events: Vec<JudgeEvent>,
    pub anomaly: Option<ClockAnomaly>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// False when the tick was dropped (no frame requested, or not playing).
    pub ticked: bool,
    pub time: TimeMs,
    pub judge_events: Vec<JudgeEvent>,
    pub accepted_presses: Vec<String>,
    pub anomaly: Option<ClockAnomaly>,
    pub finished: bool,
}

/// Single owner of one play-through. Only `tick` and the input methods
/// mutate it, and each call leaves it consistent before returning.
pub struct Session {
    state: SessionState,
    clock: GameClock,
    song: Song,
    judge: Judge,
    history: HistoryRecorder,
    held: BTreeSet<String>,
    frames: Box<dyn FrameScheduler>,
}

impl Session {
    pub fn new(song: Song) -> Self {
        Self::with_scheduler(song, Box::new(PendingFrame::new()))
    }

    pub fn with_scheduler(song: Song, frames: Box<dyn FrameScheduler>) -> Self {
        Self {
            state: SessionState::Menu,
            clock: GameClock::new(),
            song: song.fresh(),
            judge: Judge::new(),
            history: HistoryRecorder::default(),
            held: BTreeSet::new(),
            frames,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn stats(&self) -> PerformanceStats {
        self.judge.stats()
    }

    pub fn history(&self) -> &[HistorySample] {
        self.history.samples()
    }

    pub fn current_time(&self) -> TimeMs {
        self.clock.current_time()
    }

    pub fn frame_pending(&self) -> bool {
        self.frames.is_pending()
    }

    pub fn held_notes(&self) -> impl Iterator<Item = &str> {
        self.held.iter().map(String::as_str)
    }

    pub fn start(&mut self, now: HostTime) -> Result<(), SessionError> {
        if self.state == SessionState::Playing {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "start",
            });
        }

        self.song.reset();
        self.judge.reset();
        self.history.reset();
        self.clock.start(now);
        self.frames.cancel_frame();
        self.frames.request_frame();
        self.state = SessionState::Playing;
        log::info!("session started: {}", self.song.title);
        Ok(())
    }

    pub fn replay(&mut self, now: HostTime) -> Result<(), SessionError> {
        if self.state != SessionState::Finished {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "replay",
            });
        }
        self.start(now)
    }

    /// Forces Playing into Finished and cancels the pending frame. Stopping a
    /// finished session is a no-op. From Menu there is no play-through to
    /// finish, so it is rejected and the session stays in Menu.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Playing => {
                self.finish();
                Ok(())
            }
            SessionState::Finished => Ok(()),
            SessionState::Menu => Err(SessionError::InvalidTransition {
                state: self.state,
                action: "stop",
            }),
        }
    }

    pub fn back_to_menu(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Playing {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "return to menu",
            });
        }
        self.state = SessionState::Menu;
        Ok(())
    }

    /// Swaps in a new song (always a fresh, all-Pending copy) and returns to
    /// the menu. Any running play-through is abandoned.
    pub fn replace_song(&mut self, song: Song) {
        self.frames.cancel_frame();
        self.clock.stop();
        self.song = song.fresh();
        self.state = SessionState::Menu;
        log::info!(
            "song replaced: {} ({} notes)",
            self.song.title,
            self.song.notes().len()
        );
    }

    /// Applies a press immediately. A press of a note that is already held is
    /// ignored entirely; judging only happens while playing.
    pub fn press(&mut self, note_name: &str, now: HostTime) -> PressOutcome {
        if !self.held.insert(note_name.to_string()) {
            return PressOutcome::default();
        }

        let mut outcome = PressOutcome {
            accepted: true,
            ..PressOutcome::default()
        };
        if self.state != SessionState::Playing {
            return outcome;
        }

        let sample = self.clock.advance(now);
        outcome.anomaly = sample.anomaly;
        outcome.judge_events = self.judge.advance_to(&mut self.song, sample.time);
        outcome
            .judge_events
            .extend(self.judge.on_press(&mut self.song, note_name, sample.time));
        outcome
    }

    pub fn release(&mut self, note_name: &str) -> bool {
        self.held.remove(note_name)
    }

    /// One frame: advance the clock, sweep expired notes, judge queued input,
    /// sample history, then check for the end of the song.
    pub fn tick(&mut self, now: HostTime, inputs: Vec<InputEvent>) -> TickReport {
        let frame = self.frames.take_frame();
        if !frame || self.state != SessionState::Playing {
            return self.apply_inputs_immediately(now, inputs);
        }

        let sample = self.clock.advance(now);
        let time = sample.time;
        let mut report = TickReport {
            ticked: true,
            time,
            anomaly: sample.anomaly,
            ..TickReport::default()
        };

        report.judge_events = self.judge.advance_to(&mut self.song, time);

        for input in inputs {
            match input {
                InputEvent::Press(note) => {
                    if !self.held.insert(note.clone()) {
                        continue;
                    }
                    let events = self.judge.on_press(&mut self.song, &note, time);
                    report.judge_events.extend(events);
                    report.accepted_presses.push(note);
                }
                InputEvent::Release(note) => {
                    self.held.remove(&note);
                }
            }
        }

        self.history.record(time, self.judge.stats().score);

        if self.is_past_end(time) {
            self.finish();
            report.finished = true;
        } else {
            self.frames.request_frame();
        }
        report
    }

    /// Note names with a Pending note close enough to now to be highlighted.
    pub fn guide_notes(&self) -> Vec<String> {
        if self.state != SessionState::Playing {
            return Vec::new();
        }
        let now = self.clock.current_time();
        self.song
            .notes()
            .iter()
            .filter(|note| note.is_pending() && (note.start_time - now).abs() < GUIDE_WINDOW_MS)
            .map(|note| note.note_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            current_time: self.clock.current_time(),
            title: self.song.title.clone(),
            notes: self.song.notes().to_vec(),
            stats: self.judge.stats(),
            history: self.history.samples().to_vec(),
            guide_notes: self.guide_notes(),
            held_notes: self.held_notes().map(str::to_string).collect(),
        }
    }

    fn apply_inputs_immediately(&mut self, now: HostTime, inputs: Vec<InputEvent>) -> TickReport {
        let mut report = TickReport {
            time: self.clock.current_time(),
            ..TickReport::default()
        };
        for input in inputs {
            match input {
                InputEvent::Press(note) => {
                    let outcome = self.press(&note, now);
                    if outcome.accepted {
                        report.judge_events.extend(outcome.judge_events);
                        report.anomaly = report.anomaly.or(outcome.anomaly);
                        report.accepted_presses.push(note);
                    }
                }
                InputEvent::Release(note) => {
                    self.release(&note);
                }
            }
        }
        report.time = self.clock.current_time();
        report
    }

    fn is_past_end(&self, time: TimeMs) -> bool {
        let end = self.song.end_time().unwrap_or(0.0);
        time > end + END_PADDING_MS
    }

    fn finish(&mut self) {
        self.frames.cancel_frame();
        self.clock.stop();
        self.state = SessionState::Finished;
        let stats = self.judge.stats();
        log::info!(
            "session finished: score {} (perfect {}, good {}, miss {}, max combo {})",
            stats.score,
            stats.perfect,
            stats.good,
            stats.miss,
            stats.max_combo
        );
    }
}
