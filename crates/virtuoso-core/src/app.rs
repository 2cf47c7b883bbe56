use crate::clock::ClockAnomaly;
use crate::ipc::{Command, Event, InputEvent, SessionSnapshot};
use crate::session::{Session, SessionError};
use parking_lot::Mutex;
use rtrb::{Consumer, Producer, RingBuffer};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use virtuoso_domain_eval::{JudgeEvent, Judgment};
use virtuoso_domain_song::{note_by_name, song_from_generated, twinkle_twinkle, Song, SongError};
use virtuoso_ports::audio::AudioPort;
use virtuoso_ports::clock::HostClock;
use virtuoso_ports::generation::{
    GeneratedSongDto, GenerationError, GenerationRequest, SongGeneratorPort,
};
use virtuoso_ports::storage::{SettingsDto, StoragePort};
use virtuoso_ports::types::Difficulty;

const INPUT_QUEUE_CAPACITY: usize = 256;
const GENERATION_QUEUE_CAPACITY: usize = 4;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("song rejected: {0}")]
    Song(#[from] SongError),
    #[error("unknown note: {0}")]
    UnknownNote(String),
    #[error("a song is already being generated")]
    GenerationBusy,
    #[error("failed to start generation: {0}")]
    GenerationSpawn(String),
}

type GenerationOutcome = (GenerationRequest, Result<GeneratedSongDto, GenerationError>);

/// Thread-safe handle for input adapters running off the core thread. Events
/// are queued and judged on the next tick.
#[derive(Clone)]
pub struct InputSender {
    producer: Arc<Mutex<Producer<InputEvent>>>,
}

impl InputSender {
    pub fn press(&self, note: impl Into<String>) -> bool {
        self.push(InputEvent::Press(note.into()))
    }

    pub fn release(&self, note: impl Into<String>) -> bool {
        self.push(InputEvent::Release(note.into()))
    }

    fn push(&self, event: InputEvent) -> bool {
        self.producer.lock().push(event).is_ok()
    }
}

pub struct AppCore {
    audio: Arc<dyn AudioPort>,
    generator: Arc<dyn SongGeneratorPort>,
    storage: Option<Box<dyn StoragePort>>,
    clock: Arc<dyn HostClock>,
    settings: SettingsDto,
    session: Session,
    events: VecDeque<Event>,
    input_tx: InputSender,
    input_rx: Consumer<InputEvent>,
    generation_tx: Arc<Mutex<Producer<GenerationOutcome>>>,
    generation_rx: Consumer<GenerationOutcome>,
    generation_in_flight: Option<GenerationRequest>,
}

impl AppCore {
    pub fn new(
        audio: Arc<dyn AudioPort>,
        generator: Arc<dyn SongGeneratorPort>,
        storage: Option<Box<dyn StoragePort>>,
        clock: Arc<dyn HostClock>,
    ) -> Self {
        let settings = match storage.as_ref().map(|s| s.load_settings()) {
            Some(Ok(settings)) => settings,
            Some(Err(err)) => {
                log::warn!("failed to load settings, using defaults: {err}");
                SettingsDto::default()
            }
            None => SettingsDto::default(),
        };
        audio.set_master_volume(settings.master_volume);

        let (input_producer, input_rx) = RingBuffer::new(INPUT_QUEUE_CAPACITY);
        let (generation_producer, generation_rx) = RingBuffer::new(GENERATION_QUEUE_CAPACITY);

        Self {
            audio,
            generator,
            storage,
            clock,
            settings,
            session: Session::new(twinkle_twinkle()),
            events: VecDeque::new(),
            input_tx: InputSender {
                producer: Arc::new(Mutex::new(input_producer)),
            },
            input_rx,
            generation_tx: Arc::new(Mutex::new(generation_producer)),
            generation_rx,
            generation_in_flight: None,
        }
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), AppError> {
        match cmd {
            Command::StartGame => {
                self.session.start(self.clock.now())?;
                self.emit_session_state();
                self.emit_stats();
            }
            Command::Replay => {
                self.session.replay(self.clock.now())?;
                self.emit_session_state();
                self.emit_stats();
            }
            Command::StopGame => {
                let before = self.session.state();
                self.session.stop()?;
                if before != self.session.state() {
                    self.emit_session_state();
                }
            }
            Command::BackToMenu => {
                self.session.back_to_menu()?;
                self.emit_session_state();
            }
            Command::PressNote { note } => {
                self.press_note(&note)?;
            }
            Command::ReleaseNote { note } => {
                self.session.release(&note);
            }
            Command::GenerateSong { topic, difficulty } => {
                let topic = topic.unwrap_or_else(|| self.settings.generation_topic.clone());
                let difficulty = difficulty.unwrap_or(self.settings.generation_difficulty);
                self.request_song(topic, difficulty)?;
            }
            Command::LoadSong { song, difficulty } => {
                let song = song_from_generated(song, difficulty)?;
                self.apply_song(song);
            }
            Command::LoadBuiltinSong => {
                self.apply_song(twinkle_twinkle());
            }
            Command::SetGenerationTopic { topic } => {
                self.settings.generation_topic = topic;
                self.settings_changed();
            }
            Command::SetGenerationDifficulty { difficulty } => {
                self.settings.generation_difficulty = difficulty;
                self.settings_changed();
            }
            Command::SetMasterVolume { volume } => {
                self.settings.master_volume = volume;
                self.audio.set_master_volume(volume);
                self.settings_changed();
            }
            Command::SetNoteDurationMs { ms } => {
                self.settings.note_duration_ms = ms;
                self.settings_changed();
            }
            Command::SetFrameIntervalMs { ms } => {
                self.settings.frame_interval_ms = ms.max(1);
                self.settings_changed();
            }
        }
        Ok(())
    }

    pub fn tick(&mut self) {
        self.poll_generation();

        let mut inputs = Vec::new();
        while let Ok(event) = self.input_rx.pop() {
            if let InputEvent::Press(note) = &event {
                if note_by_name(note).is_none() {
                    log::warn!("dropping press of unknown note {note:?}");
                    continue;
                }
            }
            inputs.push(event);
        }

        let before = self.session.state();
        let report = self.session.tick(self.clock.now(), inputs);

        for note in &report.accepted_presses {
            self.play_note(note);
        }
        self.handle_anomaly(report.anomaly);
        for event in report.judge_events {
            self.handle_judge_event(event);
        }
        if self.session.state() != before {
            self.emit_session_state();
        }
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    pub fn input_sender(&self) -> InputSender {
        self.input_tx.clone()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn settings(&self) -> &SettingsDto {
        &self.settings
    }

    pub fn is_generating(&self) -> bool {
        self.generation_in_flight.is_some()
    }

    /// True while the session wants another frame; hosts stop ticking once
    /// this goes false.
    pub fn frame_pending(&self) -> bool {
        self.session.frame_pending()
    }

    fn press_note(&mut self, note: &str) -> Result<(), AppError> {
        if note_by_name(note).is_none() {
            return Err(AppError::UnknownNote(note.to_string()));
        }

        let outcome = self.session.press(note, self.clock.now());
        if !outcome.accepted {
            return Ok(());
        }

        self.play_note(note);
        self.handle_anomaly(outcome.anomaly);
        for event in outcome.judge_events {
            self.handle_judge_event(event);
        }
        Ok(())
    }

    fn play_note(&self, note: &str) {
        if let Some(def) = note_by_name(note) {
            self.audio
                .play_note(def.frequency_hz, Some(self.settings.note_duration_ms));
        }
    }

    fn request_song(&mut self, topic: String, difficulty: Difficulty) -> Result<(), AppError> {
        if self.generation_in_flight.is_some() {
            return Err(AppError::GenerationBusy);
        }

        let request = GenerationRequest { topic, difficulty };
        let generator = self.generator.clone();
        let tx = self.generation_tx.clone();
        let job = request.clone();
        std::thread::Builder::new()
            .name("song-generation".to_string())
            .spawn(move || {
                // A panicking provider must still hand back a result, or the
                // core would stay busy forever.
                let result = panic::catch_unwind(AssertUnwindSafe(|| generator.generate(&job)))
                    .unwrap_or_else(|_| {
                        Err(GenerationError::Provider("generator panicked".to_string()))
                    });
                if tx.lock().push((job, result)).is_err() {
                    log::warn!("generation result dropped: queue full");
                }
            })
            .map_err(|e| AppError::GenerationSpawn(e.to_string()))?;

        log::info!(
            "generating song: topic {:?}, difficulty {}",
            request.topic,
            request.difficulty
        );
        self.events.push_back(Event::GenerationStarted {
            topic: request.topic.clone(),
            difficulty: request.difficulty,
        });
        self.generation_in_flight = Some(request);
        Ok(())
    }

    fn poll_generation(&mut self) {
        while let Ok((request, result)) = self.generation_rx.pop() {
            self.generation_in_flight = None;

            let song = result.map_err(|e| e.to_string()).and_then(|dto| {
                song_from_generated(dto, request.difficulty).map_err(|e| e.to_string())
            });

            match song {
                Ok(song) => self.apply_song(song),
                Err(message) => {
                    log::warn!("song generation for {:?} failed: {message}", request.topic);
                    self.events.push_back(Event::GenerationFailed { message });
                }
            }
        }
    }

    fn apply_song(&mut self, song: Song) {
        self.session.replace_song(song);
        let song = self.session.song();
        self.events.push_back(Event::SongLoaded {
            title: song.title.clone(),
            description: song.description.clone(),
            difficulty: song.difficulty,
            note_count: song.notes().len(),
        });
        self.emit_session_state();
    }

    fn handle_judge_event(&mut self, event: JudgeEvent) {
        match event {
            JudgeEvent::Hit {
                note_id,
                note_name,
                judgment,
                delta_ms,
            } => {
                self.events.push_back(Event::JudgeFeedback {
                    note_id: Some(note_id),
                    note_name,
                    judgment,
                    delta_ms: Some(delta_ms),
                    miss_reason: None,
                });
            }
            JudgeEvent::Miss {
                note_id,
                note_name,
                reason,
            } => {
                self.events.push_back(Event::JudgeFeedback {
                    note_id,
                    note_name,
                    judgment: Judgment::Miss,
                    delta_ms: None,
                    miss_reason: Some(reason),
                });
            }
            JudgeEvent::Stats(stats) => {
                self.events.push_back(Event::StatsUpdated {
                    stats,
                    accuracy: stats.accuracy(),
                });
            }
        }
    }

    fn handle_anomaly(&mut self, anomaly: Option<ClockAnomaly>) {
        let Some(anomaly) = anomaly else {
            return;
        };
        log::warn!(
            "clock jumped {:.0}ms, clamped to {:.0}ms",
            anomaly.raw_delta_ms,
            anomaly.clamped_delta_ms
        );
        self.events.push_back(Event::ClockAnomaly {
            raw_delta_ms: anomaly.raw_delta_ms,
            clamped_delta_ms: anomaly.clamped_delta_ms,
        });
    }

    fn emit_session_state(&mut self) {
        self.events.push_back(Event::SessionStateUpdated {
            state: self.session.state(),
        });
    }

    fn emit_stats(&mut self) {
        let stats = self.session.stats();
        self.events.push_back(Event::StatsUpdated {
            stats,
            accuracy: stats.accuracy(),
        });
    }

    fn settings_changed(&mut self) {
        self.events.push_back(Event::SettingsUpdated {
            settings: self.settings.clone(),
        });
        self.save_settings();
    }

    fn save_settings(&self) {
        if let Some(storage) = self.storage.as_ref() {
            if let Err(err) = storage.save_settings(&self.settings) {
                log::warn!("failed to save settings: {err}");
            }
        }
    }
}
