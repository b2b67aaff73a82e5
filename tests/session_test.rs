use snowball_run::driver::{FixedRate, drive};
use snowball_run::sim::JumpState;
use snowball_run::ui::Presenter;
use snowball_run::{FrameOutcome, MemoryStore, Session, SessionPhase, Tuning};

/// Presenter that records every call
#[derive(Debug, Default)]
struct RecordingPresenter {
    scores: Vec<u64>,
    game_overs: Vec<(u64, Option<usize>)>,
    leaderboards: Vec<Vec<u64>>,
    start_visible: Option<(bool, bool)>,
    game_over_visible: bool,
    leaderboard_open: bool,
}

impl Presenter for RecordingPresenter {
    fn show_score(&mut self, score: u64) {
        self.scores.push(score);
    }

    fn show_game_over(&mut self, score: u64, rank: Option<usize>) {
        self.game_overs.push((score, rank));
        self.game_over_visible = true;
    }

    fn hide_game_over(&mut self) {
        self.game_over_visible = false;
    }

    fn show_leaderboard(&mut self, scores: &[u64]) {
        self.leaderboards.push(scores.to_vec());
    }

    fn toggle_leaderboard(&mut self) {
        self.leaderboard_open = !self.leaderboard_open;
    }

    fn set_start_visible(&mut self, visible: bool, restart: bool) {
        self.start_visible = Some((visible, restart));
    }
}

fn new_session(store: MemoryStore) -> Session<MemoryStore, RecordingPresenter> {
    Session::new(Tuning::default(), store, RecordingPresenter::default())
}

#[test]
fn test_startup_shows_stored_leaderboard() {
    let session = new_session(MemoryStore::with_json("[5,300,20]"));
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.presenter().leaderboards, vec![vec![300, 20, 5]]);
    assert_eq!(session.presenter().start_visible, Some((true, false)));
}

#[test]
fn test_corrupt_storage_starts_empty() {
    let session = new_session(MemoryStore::with_json("not json at all"));
    assert!(session.leaderboard().is_empty());
}

#[test]
fn test_idle_run_crashes_into_first_obstacle() {
    let mut session = new_session(MemoryStore::new());
    assert!(session.start(2024));
    assert_eq!(session.presenter().start_visible, Some((false, false)));

    let mut source = FixedRate::new(60.0).limited(60 * 60);
    drive(&mut session, &mut source, |_| {});

    assert_eq!(session.phase(), SessionPhase::Ended);
    let result = session.last_result().expect("run should have ended");
    assert!(result.score > 50, "crash before the opening window: {}", result.score);
    assert_eq!(result.rank, Some(1));

    let presenter = session.presenter();
    assert_eq!(presenter.game_overs, vec![(result.score, Some(1))]);
    assert!(presenter.game_over_visible);
    assert_eq!(presenter.leaderboards.last(), Some(&vec![result.score]));
    assert_eq!(presenter.start_visible, Some((true, true)));
    // Live score never went down
    assert!(presenter.scores.windows(2).all(|w| w[0] <= w[1]));

    assert_eq!(session.store().raw(), Some(format!("[{}]", result.score).as_str()));
    assert_eq!(session.frame(1e9), FrameOutcome::Stop);
}

#[test]
fn test_restart_after_game_over() {
    let mut session = new_session(MemoryStore::new());
    session.start(7);
    drive(&mut session, &mut FixedRate::new(60.0).limited(60 * 60), |_| {});
    assert_eq!(session.phase(), SessionPhase::Ended);

    assert!(session.start(8));
    assert_eq!(session.phase(), SessionPhase::Running);
    assert!(!session.presenter().game_over_visible);
    let state = session.state().unwrap();
    assert_eq!(state.score, 0.0);
    assert!(state.obstacles.is_empty());
    assert_eq!(state.ball.pos.y, 350.0);

    drive(&mut session, &mut FixedRate::new(60.0).limited(60 * 60), |_| {});
    assert_eq!(session.leaderboard().len(), 2);
    let scores = session.leaderboard().scores();
    assert!(scores[0] >= scores[1]);
}

#[test]
fn test_same_seed_same_run() {
    let mut a = new_session(MemoryStore::new());
    let mut b = new_session(MemoryStore::new());
    a.start(99);
    b.start(99);
    let frames_a = drive(&mut a, &mut FixedRate::new(60.0).limited(10_000), |_| {});
    let frames_b = drive(&mut b, &mut FixedRate::new(60.0).limited(10_000), |_| {});
    assert_eq!(frames_a, frames_b);
    assert_eq!(a.last_result(), b.last_result());
}

#[test]
fn test_backgrounded_tab_does_not_teleport() {
    let mut session = new_session(MemoryStore::new());
    session.start(1);
    let mut source = FixedRate::new(60.0).limited(40);
    drive(&mut session, &mut source, |_| {});
    let before = session.state().unwrap().elapsed;

    // Tab hidden for a minute
    source.stall(60_000.0);
    let mut source = source.limited(1);
    drive(&mut session, &mut source, |_| {});
    let after = session.state().unwrap().elapsed;
    assert!(after - before < 0.02);
}

#[test]
fn test_charged_jump_through_session() {
    let mut session = new_session(MemoryStore::new());
    session.start(1);
    let mut source = FixedRate::new(60.0);

    // Land first
    for _ in 0..30 {
        let ts = source_next(&mut source);
        session.frame(ts);
    }
    assert_eq!(session.state().unwrap().ball.jump_state(), JumpState::Grounded);

    session.press_jump();
    for _ in 0..40 {
        let ts = source_next(&mut source);
        session.frame(ts);
    }
    let ball = &session.state().unwrap().ball;
    assert_eq!(ball.jump_state(), JumpState::Charging);
    assert_eq!(ball.charge_ms, 500.0);

    session.release_jump();
    session.frame(source_next(&mut source));
    let ball = &session.state().unwrap().ball;
    assert_eq!(ball.jump_state(), JumpState::Airborne);
    // Full charge launch, plus one tick of gravity
    assert_eq!(ball.vel.y, -19.5);
}

#[test]
fn test_leaderboard_toggle() {
    let mut session = new_session(MemoryStore::new());
    session.toggle_leaderboard();
    assert!(session.presenter().leaderboard_open);
    session.toggle_leaderboard();
    assert!(!session.presenter().leaderboard_open);
}

fn source_next(source: &mut FixedRate) -> f64 {
    use snowball_run::driver::TickSource;
    source.next_timestamp().unwrap()
}
