//! Frame driver plumbing
//!
//! The host delivers timestamps (ms, monotonically increasing) once per
//! display refresh. `FrameClock` turns them into clamped deltas, and
//! `TickSource` lets the same session run under requestAnimationFrame or a
//! headless loop.

use crate::consts::{FRAME_DT, MAX_FRAME_DELTA};
use crate::session::{FrameOutcome, Session};
use crate::highscores::LeaderboardStore;
use crate::ui::Presenter;

/// Converts frame timestamps into simulation deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Forget the previous timestamp (new session)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Seconds since the previous frame.
    ///
    /// The first frame, and any gap longer than a second (e.g. a backgrounded
    /// tab), count as one nominal frame. Time never runs backwards.
    pub fn delta(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ms {
            None => FRAME_DT,
            Some(prev) => {
                let dt = ((timestamp_ms - prev) / 1000.0) as f32;
                if dt > MAX_FRAME_DELTA {
                    log::debug!("Clamping frame delta of {:.2}s", dt);
                    FRAME_DT
                } else {
                    dt.max(0.0)
                }
            }
        };
        self.last_ms = Some(timestamp_ms);
        dt
    }
}

/// Pull-based source of frame timestamps
pub trait TickSource {
    /// Next frame timestamp in ms, or None when the source is exhausted
    fn next_timestamp(&mut self) -> Option<f64>;
}

/// Fixed-rate timestamps, for headless runs and tests
#[derive(Debug, Clone)]
pub struct FixedRate {
    now_ms: f64,
    step_ms: f64,
    remaining: Option<u64>,
}

impl FixedRate {
    /// Endless source at `hz` frames per second
    pub fn new(hz: f64) -> Self {
        Self {
            now_ms: 0.0,
            step_ms: 1000.0 / hz,
            remaining: None,
        }
    }

    /// Stop after `frames` timestamps
    pub fn limited(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    /// Insert a pause (e.g. a hidden tab) before the next frame
    pub fn stall(&mut self, ms: f64) {
        self.now_ms += ms;
    }
}

impl TickSource for FixedRate {
    fn next_timestamp(&mut self) -> Option<f64> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        self.now_ms += self.step_ms;
        Some(self.now_ms)
    }
}

/// Drive a session until it stops running or the source runs dry.
///
/// `between_frames` runs after every frame, where a host would redraw and
/// feed input. Returns the number of frames driven.
pub fn drive<S, P, F>(session: &mut Session<S, P>, source: &mut dyn TickSource, mut between_frames: F) -> u64
where
    S: LeaderboardStore,
    P: Presenter,
    F: FnMut(&mut Session<S, P>),
{
    let mut frames = 0;
    while let Some(timestamp) = source.next_timestamp() {
        let outcome = session.frame(timestamp);
        frames += 1;
        if outcome == FrameOutcome::Stop {
            break;
        }
        between_frames(session);
    }
    frames
}
