use crate::app::AppCore;
use crate::ipc::Event;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use virtuoso_ports::clock::ManualClock;
use virtuoso_ports::types::TimeMs;

/// Deterministic host: advances a [`ManualClock`] by a fixed step, then ticks.
#[derive(Clone, Copy, Debug)]
pub struct FixedStepDriver {
    step_ms: TimeMs,
    max_frames: usize,
}

impl FixedStepDriver {
    pub fn new(step_ms: TimeMs) -> Self {
        Self {
            step_ms: step_ms.max(0.001),
            max_frames: 1_000_000,
        }
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn step_ms(&self) -> TimeMs {
        self.step_ms
    }

    /// Advances by one step and ticks if the session asked for a frame.
    pub fn step(&self, core: &mut AppCore, clock: &ManualClock) -> bool {
        clock.advance(self.step_ms);
        let pending = core.frame_pending();
        core.tick();
        pending
    }

    /// Steps until the session stops requesting frames. Returns frames run.
    pub fn run_until_idle(&self, core: &mut AppCore, clock: &ManualClock) -> usize {
        let mut frames = 0;
        while core.frame_pending() && frames < self.max_frames {
            self.step(core, clock);
            frames += 1;
        }
        frames
    }

    /// Steps until `duration_ms` of host time has elapsed or play stops.
    pub fn run_for(&self, core: &mut AppCore, clock: &ManualClock, duration_ms: TimeMs) -> usize {
        let mut frames = 0;
        let mut elapsed = 0.0;
        while elapsed + self.step_ms <= duration_ms && core.frame_pending() && frames < self.max_frames {
            self.step(core, clock);
            elapsed += self.step_ms;
            frames += 1;
        }
        frames
    }
}

/// Real-time host loop: ticks the shared core every `interval` on its own
/// thread and hands drained events to `on_events`.
pub struct FrameLoop {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FrameLoop {
    pub fn spawn<F>(core: Arc<Mutex<AppCore>>, interval: Duration, mut on_events: F) -> std::io::Result<Self>
    where
        F: FnMut(Vec<Event>) + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let handle = std::thread::Builder::new()
            .name("frame-loop".to_string())
            .spawn(move || {
                while flag.load(Ordering::Acquire) {
                    let events = {
                        let mut core = core.lock();
                        core.tick();
                        core.drain_events()
                    };
                    if !events.is_empty() {
                        on_events(events);
                    }
                    std::thread::sleep(interval);
                }
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("frame loop thread panicked");
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}
