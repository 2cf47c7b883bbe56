mod autoplay;
mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use parking_lot::Mutex;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use virtuoso_core::{AppCore, Command, Event, FixedStepDriver, FrameLoop, SessionState, SystemClock};
use virtuoso_domain_song::parse_generated_json;
use virtuoso_infra_storage_fs::{FsSongLibrary, FsStorage};
use virtuoso_ports::audio::AudioPort;
use virtuoso_ports::clock::ManualClock;
use virtuoso_ports::generation::{
    GeneratedSongDto, GenerationError, GenerationRequest, SongGeneratorPort,
};
use virtuoso_ports::storage::StoragePort;
use virtuoso_ports::types::{Difficulty, Volume01};

use autoplay::Autoplay;
use report::Report;

const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "virtuoso", about = "Headless autoplay run of a Virtuoso chart")]
struct Args {
    /// Chart JSON to play (same shape a generator returns).
    #[arg(long, conflicts_with = "topic")]
    song: Option<PathBuf>,

    /// Directory of chart JSON files served as the song generator.
    #[arg(long)]
    library: Option<PathBuf>,

    /// Topic to request from the library.
    #[arg(long, requires = "library")]
    topic: Option<String>,

    #[arg(long, value_enum, default_value_t = DifficultyArg::Easy)]
    difficulty: DifficultyArg,

    /// Shift every autoplay press by this many ms (negative presses early).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_ms: f64,

    /// Leave every Nth note unplayed. 0 plays everything.
    #[arg(long, default_value_t = 0)]
    skip_every: usize,

    /// Drive the session from the wall clock instead of a simulated one.
    #[arg(long)]
    realtime: bool,

    /// Load and persist settings in this directory.
    #[arg(long, conflicts_with = "user_settings")]
    settings_dir: Option<PathBuf>,

    /// Load and persist settings in the platform config directory.
    #[arg(long)]
    user_settings: bool,

    /// Print every core event to stderr as a JSON line.
    #[arg(long)]
    events: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

struct LogAudio;

impl AudioPort for LogAudio {
    fn play_note(&self, frequency_hz: f32, duration_ms: Option<u32>) {
        log::debug!("tone {frequency_hz:.2} Hz for {duration_ms:?} ms");
    }

    fn set_master_volume(&self, volume: Volume01) {
        log::debug!("master volume {:.2}", volume.get());
    }
}

struct NoLibrary;

impl SongGeneratorPort for NoLibrary {
    fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedSongDto, GenerationError> {
        Err(GenerationError::Provider(
            "no song library configured".to_string(),
        ))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let generator: Arc<dyn SongGeneratorPort> = match &args.library {
        Some(dir) => Arc::new(FsSongLibrary::new(dir.clone())),
        None => Arc::new(NoLibrary),
    };
    let storage: Option<Box<dyn StoragePort>> = match (&args.settings_dir, args.user_settings) {
        (Some(dir), _) => Some(Box::new(FsStorage::new(dir.clone()))),
        (None, true) => Some(Box::new(FsStorage::in_config_dir())),
        (None, false) => None,
    };

    let report = if args.realtime {
        let clock = Arc::new(SystemClock::new());
        let mut core = AppCore::new(Arc::new(LogAudio), generator, storage, clock);
        load_song(&mut core, &args)?;
        run_realtime(core, &args)?
    } else {
        let clock = Arc::new(ManualClock::new(0.0));
        let mut core = AppCore::new(Arc::new(LogAudio), generator, storage, clock.clone());
        load_song(&mut core, &args)?;
        run_simulated(&mut core, &clock, &args)?
    };

    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}

fn load_song(core: &mut AppCore, args: &Args) -> Result<()> {
    let difficulty = Difficulty::from(args.difficulty);

    if let Some(path) = &args.song {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read chart: {}", path.display()))?;
        let song = parse_generated_json(&raw)
            .with_context(|| format!("failed to parse chart: {}", path.display()))?;
        core.handle_command(Command::LoadSong { song, difficulty })?;
    } else if let Some(topic) = &args.topic {
        core.handle_command(Command::GenerateSong {
            topic: Some(topic.clone()),
            difficulty: Some(difficulty),
        })?;
        wait_for_generation(core, args)?;
    }

    print_events(core.drain_events(), args.events);
    Ok(())
}

fn wait_for_generation(core: &mut AppCore, args: &Args) -> Result<()> {
    let started = Instant::now();
    while core.is_generating() {
        if started.elapsed() > GENERATION_TIMEOUT {
            bail!("song generation timed out");
        }
        std::thread::sleep(Duration::from_millis(5));
        core.tick();
        for event in core.drain_events() {
            if let Event::GenerationFailed { message } = &event {
                bail!("song generation failed: {message}");
            }
            print_events(vec![event], args.events);
        }
    }
    Ok(())
}

fn run_simulated(core: &mut AppCore, clock: &ManualClock, args: &Args) -> Result<Report> {
    let driver = FixedStepDriver::new(core.settings().frame_interval_ms as f64);
    core.handle_command(Command::StartGame)?;

    let mut autoplay = Autoplay::new(core.session().song(), args.offset_ms, args.skip_every);
    let input = core.input_sender();
    while core.frame_pending() {
        let horizon = core.session().current_time() + driver.step_ms();
        autoplay.press_due(horizon, |note| {
            // Re-pressing a held key is ignored, so lift it first.
            input.release(note);
            if !input.press(note) {
                log::warn!("input queue full, dropped press of {note}");
            }
        });
        driver.step(core, clock);
        print_events(core.drain_events(), args.events);
    }

    Ok(Report::from_core(core))
}

fn run_realtime(core: AppCore, args: &Args) -> Result<Report> {
    let interval = Duration::from_millis(core.settings().frame_interval_ms.max(1));
    let core = Arc::new(Mutex::new(core));
    let mut autoplay = {
        let mut core = core.lock();
        core.handle_command(Command::StartGame)?;
        print_events(core.drain_events(), args.events);
        Autoplay::new(core.session().song(), args.offset_ms, args.skip_every)
    };

    let print = args.events;
    let frames = FrameLoop::spawn(core.clone(), interval, move |events| {
        print_events(events, print)
    })
    .context("failed to start frame loop")?;

    loop {
        {
            let mut core = core.lock();
            if core.session().state() != SessionState::Playing {
                break;
            }
            // Presses go through the command path so they are judged on arrival.
            let now = core.session().current_time();
            autoplay.press_due(now, |note| {
                let release = Command::ReleaseNote { note: note.to_string() };
                let press = Command::PressNote { note: note.to_string() };
                for command in [release, press] {
                    if let Err(err) = core.handle_command(command) {
                        log::warn!("autoplay press of {note} rejected: {err}");
                    }
                }
            });
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    frames.stop();

    let core = core.lock();
    Ok(Report::from_core(&core))
}

fn print_events(events: Vec<Event>, enabled: bool) {
    for event in events {
        if !enabled {
            log::trace!("{event:?}");
            continue;
        }
        match serde_json::to_string(&event) {
            Ok(line) => eprintln!("{line}"),
            Err(err) => log::warn!("failed to serialize event: {err}"),
        }
    }
}
