//! Per-frame simulation step
//!
//! `step(state, input, dt)` advances one frame: movement integration,
//! the fixed-order collision pass, ammo/invincibility bookkeeping, scoring,
//! and the terminal game-over transition. The host owns pausing and frame
//! pacing; this function only ever sees a bounded dt.

use glam::Vec2;
use rand::Rng;

use super::spawn;
use super::state::{Explosion, GameState, Hostile, Pickup, Projectile};
use crate::consts::*;

/// Input intent snapshot for a single tick.
///
/// Directional and fire intents are level-triggered (held); `reload` and
/// `switch_ammo` are edges the host clears after each frame's step.
#[derive(Debug, Clone, Default)]
pub struct StepInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub reload: bool,
    pub switch_ammo: bool,
}

/// Advance the simulation by `dt` seconds (already clamped by the host).
pub fn step(state: &mut GameState, input: &StepInput, dt: f32) {
    // Terminal state: everything freezes except cosmetic effects, which
    // animate until they expire on their own.
    if state.game_over {
        advance_explosions(state, dt);
        return;
    }

    let dt_ms = dt * 1000.0;
    state.play_time += dt as f64;

    // Descending stores move first, exits culled the same tick
    let height = state.bounds.y;
    for bomber in &mut state.bombers {
        bomber.aabb.pos.y += bomber.speed * dt;
    }
    state.bombers.retain(|b| !b.aabb.below_bottom(height));

    for pickup in state.magazines.iter_mut().chain(state.stars.iter_mut()) {
        pickup.aabb.pos.y += pickup.speed * dt;
    }
    state.magazines.retain(|p| !p.aabb.below_bottom(height));
    state.stars.retain(|p| !p.aabb.below_bottom(height));

    advance_explosions(state, dt);
    state.invincibility.advance(dt);

    if input.switch_ammo {
        state.loadout.cycle();
    }
    if input.reload {
        state.loadout.request_reload();
    }
    state.loadout.advance(dt_ms);

    // Pickups vs player
    let player_box = state.player.aabb;
    let loadout = &mut state.loadout;
    state.magazines.retain(|p| {
        if p.aabb.overlaps(&player_box) {
            loadout.add_reserve();
            false
        } else {
            true
        }
    });
    let invincibility = &mut state.invincibility;
    state.stars.retain(|p| {
        if p.aabb.overlaps(&player_box) {
            invincibility.grant();
            false
        } else {
            true
        }
    });

    // Projectiles vs bombers. Non-invincible bomber kills cost score.
    let invincible = state.invincibility.active;
    let bomber_score = |damage: u32| {
        if invincible {
            10 * damage as i64
        } else {
            -20
        }
    };
    let (delta, _) = projectile_pass(
        &mut state.projectiles,
        &mut state.bombers,
        &mut state.explosions,
        bomber_score,
    );
    state.score += delta;

    // Player movement and clamp
    let mut dir = Vec2::ZERO;
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    state.player.aabb.pos += dir * state.player.speed * dt;
    state.player.aabb.clamp_inside(state.bounds);

    // Fire
    if input.fire {
        if let Some(kind) = state.loadout.try_fire(invincible) {
            state.projectiles.push(Projectile::fired_by(&state.player, kind));
        }
    }

    // Projectiles move -y; gone once fully past the top
    for round in &mut state.projectiles {
        round.aabb.pos.y -= round.speed * dt;
    }
    state.projectiles.retain(|r| !r.aabb.above_top());

    // Soldiers descend; exiting the bottom costs nothing
    for soldier in &mut state.soldiers {
        soldier.aabb.pos.y += soldier.speed * dt;
    }
    state.soldiers.retain(|s| !s.aabb.below_bottom(height));

    // Projectiles vs soldiers
    let (delta, kills) = projectile_pass(
        &mut state.projectiles,
        &mut state.soldiers,
        &mut state.explosions,
        |damage| 10 * damage as i64,
    );
    state.score += delta;

    // Killed soldiers may drop a magazine where they died, but only while
    // reserves are low
    for pos in kills {
        if state.loadout.reserves <= MAGAZINE_DROP_RESERVE_CEILING
            && state.rng.random::<f32>() < MAGAZINE_DROP_CHANCE
        {
            state.magazines.push(Pickup::magazine(pos));
        }
    }

    // Hostile contact is lethal unless invincible; bombers spare the player
    // outright on Easy
    let player_box = state.player.aabb;
    if !invincible {
        if state.soldiers.iter().any(|s| s.aabb.overlaps(&player_box)) {
            end_run(state);
        }
        if !state.game_over
            && !state.difficulty.bombers_harmless()
            && state.bombers.iter().any(|b| b.aabb.overlaps(&player_box))
        {
            end_run(state);
        }
    }

    if !state.game_over {
        spawn::run(state, dt_ms);
    }
}

fn advance_explosions(state: &mut GameState, dt: f32) {
    for explosion in &mut state.explosions {
        explosion.advance(dt);
    }
    state.explosions.retain(|e| !e.expired());
}

fn end_run(state: &mut GameState) {
    state.game_over = true;
    log::info!(
        "Run over: score {}, survived {:.1}s",
        state.score,
        state.play_time
    );
}

/// One projectile-vs-hostile collision pass, mark-then-compact.
///
/// Every struck hostile dies exactly once. A non-piercing round stops at its
/// first hit; a piercing round keeps flying until it has struck
/// `MAX_PIERCING_HITS` hostiles. Explosive rounds leave a blast centered on
/// each victim. Returns the score delta and the victims' last positions.
fn projectile_pass(
    projectiles: &mut Vec<Projectile>,
    hostiles: &mut Vec<Hostile>,
    explosions: &mut Vec<Explosion>,
    score_for: impl Fn(u32) -> i64,
) -> (i64, Vec<Vec2>) {
    let mut dead = vec![false; hostiles.len()];
    let mut delta = 0;
    let mut kills = Vec::new();

    projectiles.retain_mut(|round| {
        for (i, hostile) in hostiles.iter().enumerate() {
            if dead[i] || !round.aabb.overlaps(&hostile.aabb) {
                continue;
            }
            dead[i] = true;
            delta += score_for(round.damage);
            kills.push(hostile.aabb.pos);
            if round.explosive {
                explosions.push(Explosion::at(hostile.aabb.center()));
            }
            if round.piercing {
                round.hits += 1;
                if round.hits >= MAX_PIERCING_HITS {
                    return false;
                }
            } else {
                return false;
            }
        }
        true
    });

    let mut i = 0;
    hostiles.retain(|_| {
        let keep = !dead[i];
        i += 1;
        keep
    });

    (delta, kills)
}
