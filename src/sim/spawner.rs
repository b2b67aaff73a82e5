//! Obstacle spawn policy
//!
//! A run opens with a quiet stretch: nothing spawns until the score reaches
//! the opening window, where a single obstacle appears at random. After that,
//! obstacles arrive on a fixed gap and their maximum size grows with time.

use rand::Rng;

use super::state::{Obstacle, SessionState, SpawnPhase};
use crate::tuning::Tuning;

/// Run the spawn policy for one tick. Returns the size of a spawned obstacle.
pub fn spawn_obstacles(state: &mut SessionState, tuning: &Tuning) -> Option<f32> {
    match state.spawn_phase {
        SpawnPhase::Opening => {
            if state.score > tuning.opening_score_max {
                // Window missed; fall through to regular spawns from here on
                log::debug!("Opening window closed without a spawn at score {:.1}", state.score);
                state.spawn_phase = SpawnPhase::Steady {
                    last_spawn: state.elapsed,
                };
                return None;
            }
            if state.score < tuning.opening_score_min {
                return None;
            }
            if state.rng.random::<f32>() >= tuning.opening_spawn_chance {
                return None;
            }
            let ceiling = tuning.opening_max_size.max(tuning.obstacle_min_size);
            let size = state
                .rng
                .random_range(tuning.obstacle_min_size..=ceiling);
            state.obstacles.push(Obstacle::at_right_edge(size, tuning));
            state.spawn_phase = SpawnPhase::Steady {
                last_spawn: state.elapsed,
            };
            Some(size)
        }
        SpawnPhase::Steady { last_spawn } => {
            if state.elapsed - last_spawn < tuning.spawn_gap {
                return None;
            }
            let ceiling = tuning
                .size_ceiling(state.elapsed)
                .max(tuning.obstacle_min_size);
            let size = state
                .rng
                .random_range(tuning.obstacle_min_size..=ceiling);
            state.obstacles.push(Obstacle::at_right_edge(size, tuning));
            state.spawn_phase = SpawnPhase::Steady {
                last_spawn: state.elapsed,
            };
            Some(size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_spawn_before_window() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(3, &tuning);
        state.score = 49.9;
        for _ in 0..1000 {
            assert_eq!(spawn_obstacles(&mut state, &tuning), None);
        }
        assert!(state.obstacles.is_empty());
        assert_eq!(state.spawn_phase, SpawnPhase::Opening);
    }

    #[test]
    fn test_opening_spawn_is_one_shot() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(3, &tuning);
        state.score = 60.0;
        state.elapsed = 10.0;
        let mut spawned = 0;
        for _ in 0..1000 {
            if let Some(size) = spawn_obstacles(&mut state, &tuning) {
                assert!((20.0..=40.0).contains(&size));
                spawned += 1;
            }
        }
        // Elapsed never advances, so the steady gap is never reached
        assert_eq!(spawned, 1);
        assert_eq!(state.spawn_phase, SpawnPhase::Steady { last_spawn: 10.0 });
        let ob = &state.obstacles[0];
        assert_eq!(ob.pos.x, 800.0);
        assert_eq!(ob.bottom(), 400.0);
    }

    #[test]
    fn test_opening_spawn_with_raised_min_size() {
        let tuning = Tuning::from_json(r#"{ "obstacle_min_size": 50 }"#).unwrap();
        let mut state = SessionState::new(3, &tuning);
        state.score = 60.0;
        let size = (0..1000).find_map(|_| spawn_obstacles(&mut state, &tuning));
        assert_eq!(size, Some(50.0));
    }

    #[test]
    fn test_opening_spawn_with_inverted_range() {
        // Built directly, so nothing has normalized it
        let tuning = Tuning {
            obstacle_min_size: 50.0,
            opening_max_size: 30.0,
            opening_spawn_chance: 1.0,
            ..Default::default()
        };
        let mut state = SessionState::new(3, &tuning);
        state.score = 60.0;
        assert_eq!(spawn_obstacles(&mut state, &tuning), Some(50.0));
    }

    #[test]
    fn test_missed_window_switches_to_steady() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(3, &tuning);
        state.score = 80.5;
        state.elapsed = 21.0;
        assert_eq!(spawn_obstacles(&mut state, &tuning), None);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.spawn_phase, SpawnPhase::Steady { last_spawn: 21.0 });
    }

    #[test]
    fn test_steady_gap() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(3, &tuning);
        state.spawn_phase = SpawnPhase::Steady { last_spawn: 10.0 };
        state.elapsed = 11.99;
        assert_eq!(spawn_obstacles(&mut state, &tuning), None);
        state.elapsed = 12.0;
        assert!(spawn_obstacles(&mut state, &tuning).is_some());
        assert_eq!(state.spawn_phase, SpawnPhase::Steady { last_spawn: 12.0 });
        assert_eq!(spawn_obstacles(&mut state, &tuning), None);
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let tuning = Tuning::default();
        let mut a = SessionState::new(42, &tuning);
        let mut b = SessionState::new(42, &tuning);
        a.spawn_phase = SpawnPhase::Steady { last_spawn: 0.0 };
        b.spawn_phase = SpawnPhase::Steady { last_spawn: 0.0 };
        for step in 1..10 {
            a.elapsed = step as f32 * 2.0;
            b.elapsed = step as f32 * 2.0;
            assert_eq!(spawn_obstacles(&mut a, &tuning), spawn_obstacles(&mut b, &tuning));
        }
        assert_eq!(a.obstacles, b.obstacles);
    }

    proptest! {
        #[test]
        fn prop_opening_spawn_only_inside_window(seed in any::<u64>(), score in 0.0f32..200.0) {
            let tuning = Tuning::default();
            let mut state = SessionState::new(seed, &tuning);
            state.score = score;
            for _ in 0..50 {
                if spawn_obstacles(&mut state, &tuning).is_some() {
                    prop_assert!((50.0..=80.0).contains(&score));
                }
            }
            prop_assert!(state.obstacles.len() <= 1);
        }

        #[test]
        fn prop_steady_size_within_ceiling(seed in any::<u64>(), elapsed in 2.0f32..60.0) {
            let tuning = Tuning::default();
            let mut state = SessionState::new(seed, &tuning);
            state.spawn_phase = SpawnPhase::Steady { last_spawn: 0.0 };
            state.elapsed = elapsed;
            let size = spawn_obstacles(&mut state, &tuning).unwrap();
            prop_assert!(size >= 20.0);
            prop_assert!(size <= (40.0 + elapsed * 5.0).min(80.0));
        }
    }
}
