//! Session controller
//!
//! Owns the Idle -> Running -> Ended cycle. A start (or restart) always
//! builds a brand new `SessionState`; the end of a run freezes the state for
//! the final frame and reports the score to the leaderboard.

use crate::consts::FRAME_DT;
use crate::driver::FrameClock;
use crate::highscores::{Leaderboard, LeaderboardStore};
use crate::sim::{GameEvent, SessionState, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::Presenter;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Before the first run; start control visible
    Idle,
    /// Run in progress, frames ticking
    Running,
    /// Run over; final state frozen, restart control visible
    Ended,
}

/// What the frame driver should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule another frame
    Continue,
    /// Stop scheduling until the next start
    Stop,
}

/// Result of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub score: u64,
    /// Leaderboard rank (1-indexed), None if it missed the top 10
    pub rank: Option<usize>,
}

pub struct Session<S: LeaderboardStore, P: Presenter> {
    tuning: Tuning,
    phase: SessionPhase,
    state: Option<SessionState>,
    input: TickInput,
    clock: FrameClock,
    /// Clamped delta of the most recent frame (seconds)
    last_dt: f32,
    leaderboard: Leaderboard,
    store: S,
    presenter: P,
    last_result: Option<RunResult>,
}

impl<S: LeaderboardStore, P: Presenter> Session<S, P> {
    /// Load the leaderboard once and show the start screen
    pub fn new(tuning: Tuning, store: S, mut presenter: P) -> Self {
        let leaderboard = Leaderboard::load(&store);
        presenter.show_leaderboard(leaderboard.scores());
        presenter.set_start_visible(true, false);
        Self {
            tuning,
            phase: SessionPhase::Idle,
            state: None,
            input: TickInput::default(),
            clock: FrameClock::new(),
            last_dt: FRAME_DT,
            leaderboard,
            store,
            presenter,
            last_result: None,
        }
    }

    /// Begin a new run. Ignored while a run is in progress.
    ///
    /// Returns whether a run was started (the host should schedule frames).
    pub fn start(&mut self, seed: u64) -> bool {
        if self.phase == SessionPhase::Running {
            log::debug!("Start ignored, run already in progress");
            return false;
        }
        self.state = Some(SessionState::new(seed, &self.tuning));
        self.input = TickInput::default();
        self.clock.reset();
        self.last_dt = FRAME_DT;
        self.last_result = None;
        self.phase = SessionPhase::Running;

        self.presenter.hide_game_over();
        self.presenter.set_start_visible(false, false);
        self.presenter.show_score(0);
        log::info!("Run started with seed: {}", seed);
        true
    }

    /// Jump button down
    pub fn press_jump(&mut self) {
        if self.phase == SessionPhase::Running {
            self.input.jump_pressed = true;
        }
    }

    /// Jump button up
    pub fn release_jump(&mut self) {
        if self.phase == SessionPhase::Running {
            self.input.jump_released = true;
        }
    }

    pub fn toggle_leaderboard(&mut self) {
        self.presenter.toggle_leaderboard();
    }

    /// Advance one display frame
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameOutcome {
        if self.phase != SessionPhase::Running {
            return FrameOutcome::Stop;
        }
        let Some(state) = self.state.as_mut() else {
            return FrameOutcome::Stop;
        };

        let dt = self.clock.delta(timestamp_ms);
        self.last_dt = dt;
        let input = std::mem::take(&mut self.input);
        let events = tick(state, &input, &self.tuning, dt);

        for event in &events {
            match event {
                GameEvent::Spawned { size } => log::debug!("Obstacle spawned ({:.0}px)", size),
                GameEvent::Jumped { fraction } => log::trace!("Jump at {:.0}% charge", fraction * 100.0),
                GameEvent::Crashed => {}
            }
        }

        let score = state.final_score();
        self.presenter.show_score(score);

        if events.contains(&GameEvent::Crashed) {
            self.end(score);
            return FrameOutcome::Stop;
        }
        FrameOutcome::Continue
    }

    fn end(&mut self, score: u64) {
        self.phase = SessionPhase::Ended;
        let rank = self.leaderboard.add_score(score);
        self.leaderboard.save(&mut self.store);
        self.last_result = Some(RunResult { score, rank });

        self.presenter.show_game_over(score, rank);
        self.presenter.show_leaderboard(self.leaderboard.scores());
        self.presenter.set_start_visible(true, true);
        log::info!("Run ended with score {} (rank {:?})", score, rank);
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Current (or last, frozen) run state
    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    /// Clamped delta of the last simulated frame, for frame-rate aware visuals
    pub fn frame_dt(&self) -> f32 {
        self.last_dt
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn last_result(&self) -> Option<RunResult> {
        self.last_result
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::Obstacle;
    use crate::ui::LogPresenter;
    use glam::Vec2;

    fn session() -> Session<MemoryStore, LogPresenter> {
        Session::new(Tuning::default(), MemoryStore::new(), LogPresenter::default())
    }

    #[test]
    fn test_idle_frames_stop() {
        let mut session = session();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.frame(16.0), FrameOutcome::Stop);
        assert!(session.state().is_none());
    }

    #[test]
    fn test_start_and_run() {
        let mut session = session();
        assert!(session.start(1));
        assert!(!session.start(2));
        assert_eq!(session.frame(16.0), FrameOutcome::Continue);
        let state = session.state().unwrap();
        assert_eq!(state.seed, 1);
        assert_eq!(state.ball.pos.y, 350.5);
    }

    #[test]
    fn test_input_ignored_when_not_running() {
        let mut session = session();
        session.press_jump();
        assert!(!session.input.jump_pressed);
        session.start(1);
        {
            let ball = &mut session.state.as_mut().unwrap().ball;
            ball.pos.y = 380.0;
            ball.grounded = true;
        }
        session.phase = SessionPhase::Ended;
        session.press_jump();
        session.phase = SessionPhase::Running;
        session.frame(16.0);
        assert!(!session.state().unwrap().ball.charging);

        session.press_jump();
        session.frame(32.0);
        assert!(session.state().unwrap().ball.charging);
    }

    #[test]
    fn test_frame_dt_follows_display_rate() {
        let mut session = session();
        session.start(1);
        session.frame(1000.0);
        assert_eq!(session.frame_dt(), FRAME_DT);
        session.frame(1000.0 + 1000.0 / 120.0);
        assert!((session.frame_dt() - 1.0 / 120.0).abs() < 1e-6);
        // Stalled tab falls back to one 60 Hz frame
        session.frame(90_000.0);
        assert_eq!(session.frame_dt(), FRAME_DT);
    }

    #[test]
    fn test_crash_ends_and_records() {
        let mut session = session();
        session.start(1);
        {
            let state = session.state.as_mut().unwrap();
            state.ball.pos.y = 380.0;
            state.score = 42.7;
            state.obstacles.push(Obstacle {
                pos: Vec2::new(110.0, 360.0),
                size: Vec2::splat(40.0),
            });
        }
        assert_eq!(session.frame(16.0), FrameOutcome::Stop);
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert_eq!(session.last_result(), Some(RunResult { score: 42, rank: Some(1) }));
        assert_eq!(session.leaderboard().scores(), &[42]);
        assert_eq!(session.store().raw(), Some("[42]"));
        // Frozen until restart
        assert_eq!(session.frame(32.0), FrameOutcome::Stop);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = session();
        session.start(1);
        for i in 1..200 {
            session.frame(i as f64 * 16.0);
        }
        session.state.as_mut().unwrap().crashed = true;
        session.phase = SessionPhase::Ended;

        assert!(session.start(5));
        let state = session.state().unwrap();
        assert_eq!(state.score, 0.0);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.speed, 4.0);
        assert!(state.obstacles.is_empty());
        assert!(!state.crashed);
        assert_eq!(session.last_result(), None);
    }
}
