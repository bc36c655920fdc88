//! Spawn scheduling
//!
//! Decides, each tick, whether new hostiles or pickups enter the playfield.
//! Soldiers run on a carried-remainder timer; bombers trigger off a modulo
//! window over the same accumulator; stars follow the score watermark.
//! Placement draws from the state-owned RNG so runs replay from a seed.

use rand::Rng;
use rand_pcg::Pcg32;

use super::aabb::Aabb;
use super::state::{GameState, Hostile, Pickup};
use crate::consts::*;

/// Advance spawn timers by `dt_ms` and emit whatever is due this tick.
/// Callers gate this on the game still running.
pub fn run(state: &mut GameState, dt_ms: f32) {
    state.hostile_timer_ms += dt_ms;

    if state.score - state.star_score_mark >= STAR_SCORE_STEP {
        spawn_star(state);
        state.star_score_mark = state.score;
    }

    let profile = state.difficulty.profile();

    if state.hostile_timer_ms >= profile.hostile_spawn_interval_ms {
        spawn_soldier(state);
        // Subtract one interval, keep the remainder. Cadence holds under
        // frame-rate jitter.
        state.hostile_timer_ms -= profile.hostile_spawn_interval_ms;
    }

    // Modulo window over the shared accumulator: approximately periodic.
    // Drift under variable frame time is accepted.
    if state.hostile_timer_ms % profile.bomber_spawn_interval_ms < dt_ms {
        spawn_bomber(state);
    }
}

/// One standard hostile at the top edge, avoiding other hostiles
pub fn spawn_soldier(state: &mut GameState) {
    let blockers = hostile_boxes(state);
    let x = pick_clear_x(&mut state.rng, state.bounds.x, HOSTILE_SIZE, &blockers);
    let speed = state.difficulty.profile().hostile_speed;
    state.soldiers.push(Hostile::new(x, speed));
}

/// One bomber at the top edge, avoiding other hostiles
pub fn spawn_bomber(state: &mut GameState) {
    let blockers = hostile_boxes(state);
    let x = pick_clear_x(&mut state.rng, state.bounds.x, HOSTILE_SIZE, &blockers);
    let speed = state.difficulty.profile().bomber_speed;
    state.bombers.push(Hostile::new(x, speed));
}

/// One invincibility star at the top edge, avoiding other stars
pub fn spawn_star(state: &mut GameState) {
    let blockers: Vec<Aabb> = state.stars.iter().map(|p| p.aabb).collect();
    let x = pick_clear_x(&mut state.rng, state.bounds.x, STAR_PICKUP_SIZE, &blockers);
    state.stars.push(Pickup::star(x));
}

/// Soldiers and bombers exclude each other's spawn area
fn hostile_boxes(state: &GameState) -> Vec<Aabb> {
    state
        .soldiers
        .iter()
        .chain(state.bombers.iter())
        .map(|h| h.aabb)
        .collect()
}

/// Uniform X in `[0, width - size)`, re-rolled up to `SPAWN_TRIES` times to
/// dodge `blockers`. An exhausted budget accepts the overlap rather than
/// skipping the spawn.
fn pick_clear_x(rng: &mut Pcg32, width: f32, size: f32, blockers: &[Aabb]) -> f32 {
    let span = (width - size).max(0.0);
    let mut x = 0.0;
    for _ in 0..SPAWN_TRIES {
        x = if span > 0.0 {
            rng.random_range(0.0..span)
        } else {
            0.0
        };
        let probe = Aabb::new(x, SPAWN_Y, size, size);
        if !blockers.iter().any(|b| probe.overlaps(b)) {
            break;
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Difficulty;

    fn state() -> GameState {
        GameState::new(800.0, 600.0, Difficulty::Normal, 42)
    }

    #[test]
    fn test_soldier_timer_carries_remainder() {
        let mut s = state();
        // 1000 ms interval on Normal; a 40 ms tick at 990 ms overshoots by 30
        s.hostile_timer_ms = 990.0;
        run(&mut s, 40.0);
        assert_eq!(s.soldiers.len(), 1);
        assert!((s.hostile_timer_ms - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut s = state();
        run(&mut s, 40.0);
        assert!(s.soldiers.is_empty());
        assert!((s.hostile_timer_ms - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_bomber_modulo_window() {
        // The bomber check reads the accumulator after the soldier interval
        // has been subtracted. Land that remainder inside the tick window.
        let mut s = state();
        s.hostile_timer_ms = 985.0;
        run(&mut s, 16.0);
        assert_eq!(s.soldiers.len(), 1);
        assert_eq!(s.bombers.len(), 1);

        // A remainder outside the window spawns no bomber
        let mut s = state();
        s.hostile_timer_ms = 1500.0;
        run(&mut s, 16.0);
        assert!(s.bombers.is_empty());
    }

    #[test]
    fn test_star_spawns_on_score_watermark() {
        let mut s = state();
        s.score = STAR_SCORE_STEP;
        run(&mut s, 16.0);
        assert_eq!(s.stars.len(), 1);
        assert_eq!(s.star_score_mark, STAR_SCORE_STEP);

        // No further star until another full step of score
        run(&mut s, 16.0);
        assert_eq!(s.stars.len(), 1);
    }

    #[test]
    fn test_spawn_positions_inside_playfield() {
        let mut s = state();
        for _ in 0..50 {
            spawn_soldier(&mut s);
        }
        for soldier in &s.soldiers {
            assert!(soldier.aabb.pos.x >= 0.0);
            assert!(soldier.aabb.pos.x + HOSTILE_SIZE <= s.bounds.x);
            assert_eq!(soldier.aabb.pos.y, SPAWN_Y);
        }
    }

    #[test]
    fn test_exhausted_retry_budget_still_spawns() {
        // Playfield barely wider than one hostile: every roll collides
        let mut s = GameState::new(HOSTILE_SIZE + 1.0, 600.0, Difficulty::Normal, 1);
        spawn_soldier(&mut s);
        spawn_bomber(&mut s);
        assert_eq!(s.soldiers.len(), 1);
        assert_eq!(s.bombers.len(), 1);
    }
}
