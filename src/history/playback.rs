use super::{History, Snapshot};
use crate::consts::{MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED};
use crate::state::Scene;
use log::info;

/// Repeating tick driven by the host clock, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
struct Timer {
    interval: f64,
    next_tick: f64,
}

impl Timer {
    fn start(now: f64, speed: f32) -> Self {
        let interval = 1.0 / f64::from(speed);
        Self {
            interval,
            next_tick: now + interval,
        }
    }
}

type FrameCallback = Box<dyn FnMut(usize, usize)>;

/// Replays the undo stack one snapshot per tick.
///
/// Playback never owns a thread: the host calls [`Playback::poll`] with its
/// clock, and at most one frame is restored per call. Every tick restores a
/// frame and then notifies, so stopping between polls never leaves a frame
/// half applied.
///
/// The undo stack holds only states from before each action, so the live
/// scene is set aside when playback or scrubbing first replaces it and put
/// back by [`Playback::stop`].
pub struct Playback {
    speed: f32,
    current_frame: usize,
    timer: Option<Timer>,
    on_frame: Option<FrameCallback>,
    live: Option<Snapshot>,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            speed: 1.0,
            current_frame: 0,
            timer: None,
            on_frame: None,
            live: None,
        }
    }
}

// Custom Debug implementation since the frame callback can't be formatted
impl std::fmt::Debug for Playback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Playback")
            .field("speed", &self.speed)
            .field("current_frame", &self.current_frame)
            .field("timer", &self.timer)
            .field("has_callback", &self.on_frame.is_some())
            .field("reviewing", &self.live.is_some())
            .finish()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the first frame. `on_frame` receives `(frame, total)` after
    /// each frame is restored.
    pub fn play(&mut self, now: f64, scene: &Scene, on_frame: impl FnMut(usize, usize) + 'static) {
        self.hold_live(scene);
        self.on_frame = Some(Box::new(on_frame));
        self.current_frame = 0;
        self.timer = Some(Timer::start(now, self.speed));
        info!("Playback started at {}x", self.speed);
    }

    /// Continue from the current frame after a pause
    pub fn resume(&mut self, now: f64) {
        if self.timer.is_none() {
            self.timer = Some(Timer::start(now, self.speed));
            info!("Playback resumed at frame {}", self.current_frame);
        }
    }

    pub fn pause(&mut self) {
        if self.timer.take().is_some() {
            info!("Playback paused at frame {}", self.current_frame);
        }
    }

    /// Stop, rewind and put the live scene back. Stopping a stopped playback
    /// is a no-op.
    pub fn stop(&mut self, scene: &mut Scene) {
        if self.timer.take().is_some() {
            info!("Playback stopped");
        }
        self.current_frame = 0;
        if let Some(live) = self.live.take() {
            live.restore_into(scene);
        }
    }

    /// Restore `frame` right away, playing or not. Out-of-range frames are
    /// ignored.
    pub fn scrub_to(&mut self, frame: usize, history: &History, scene: &mut Scene) -> bool {
        let Some(snapshot) = history.frame(frame) else {
            return false;
        };
        self.hold_live(scene);
        snapshot.restore_into(scene);
        self.current_frame = frame;
        true
    }

    /// Clamp to the supported range; a running playback keeps its position
    /// and switches to the new interval.
    pub fn set_speed(&mut self, speed: f32, now: f64) {
        self.speed = speed.clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED);
        if self.timer.is_some() {
            self.timer = Some(Timer::start(now, self.speed));
        }
    }

    /// Run the tick that is due at `now`, if any. Returns true when a frame
    /// was restored.
    pub fn poll(&mut self, now: f64, history: &History, scene: &mut Scene) -> bool {
        let Some(timer) = self.timer else {
            return false;
        };
        if now < timer.next_tick {
            return false;
        }

        let total = history.len();
        let Some(snapshot) = history.frame(self.current_frame) else {
            self.stop(scene);
            return false;
        };
        snapshot.restore_into(scene);
        if let Some(on_frame) = &mut self.on_frame {
            on_frame(self.current_frame, total);
        }
        self.current_frame += 1;
        self.timer = Some(Timer {
            next_tick: (timer.next_tick + timer.interval).max(now),
            ..timer
        });
        true
    }

    /// Seconds until the next tick, for scheduling a repaint
    pub fn time_until_tick(&self, now: f64) -> Option<f64> {
        self.timer.map(|timer| (timer.next_tick - now).max(0.0))
    }

    /// True while a history frame is shown in place of the live scene,
    /// playing or paused
    pub fn is_reviewing(&self) -> bool {
        self.live.is_some()
    }

    fn hold_live(&mut self, scene: &Scene) {
        if self.live.is_none() {
            self.live = Some(Snapshot::capture(scene));
        }
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn total_frames(&self, history: &History) -> usize {
        history.len()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}
