//! Game state and core simulation types
//!
//! One owned `GameState` aggregate holds every entity store, timer, and
//! state machine for a run. Restart replaces the whole aggregate; nothing
//! lives outside it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::ammo::Loadout;
use crate::consts::*;
use crate::tuning::Difficulty;

/// The player's ship. One instance, alive for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub aabb: Aabb,
    /// Movement speed, px/s
    pub speed: f32,
}

impl Player {
    /// Start centered, just above the bottom edge
    pub fn new(bounds: Vec2) -> Self {
        Self {
            aabb: Aabb::new(
                bounds.x / 2.0 - PLAYER_SIZE / 2.0,
                bounds.y - PLAYER_START_OFFSET,
                PLAYER_SIZE,
                PLAYER_SIZE,
            ),
            speed: PLAYER_SPEED,
        }
    }
}

/// A fired round, moving -y until it exits or hits something
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub aabb: Aabb,
    /// px/s, direction implied (-y)
    pub speed: f32,
    pub damage: u32,
    pub piercing: bool,
    pub explosive: bool,
    /// Hostiles struck so far (piercing rounds survive up to
    /// `MAX_PIERCING_HITS`)
    pub hits: u32,
    pub kind: super::ammo::AmmoKind,
}

impl Projectile {
    /// Emit one round of `kind` from the player's muzzle
    pub fn fired_by(player: &Player, kind: super::ammo::AmmoKind) -> Self {
        let spec = kind.spec();
        Self {
            aabb: Aabb::new(
                player.aabb.pos.x + player.aabb.size.x / 2.0 - spec.width / 2.0,
                player.aabb.pos.y,
                spec.width,
                spec.height,
            ),
            speed: spec.speed,
            damage: spec.damage,
            piercing: spec.piercing,
            explosive: spec.explosive,
            hits: 0,
            kind,
        }
    }
}

/// A descending enemy. Soldiers and bombers share this shape and live in
/// separate stores; the store determines the collision/scoring rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub aabb: Aabb,
    /// px/s, direction implied (+y)
    pub speed: f32,
}

impl Hostile {
    pub fn new(x: f32, speed: f32) -> Self {
        Self {
            aabb: Aabb::new(x, SPAWN_Y, HOSTILE_SIZE, HOSTILE_SIZE),
            speed,
        }
    }
}

/// A descending collectible (ammo magazine or invincibility star)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub aabb: Aabb,
    /// px/s, direction implied (+y)
    pub speed: f32,
}

impl Pickup {
    /// Magazine drop at a killed soldier's last position
    pub fn magazine(pos: Vec2) -> Self {
        Self {
            aabb: Aabb::new(
                pos.x,
                pos.y,
                MAGAZINE_PICKUP_SIZE,
                MAGAZINE_PICKUP_SIZE,
            ),
            speed: MAGAZINE_PICKUP_SPEED,
        }
    }

    /// Invincibility star entering from the top
    pub fn star(x: f32) -> Self {
        Self {
            aabb: Aabb::new(x, SPAWN_Y, STAR_PICKUP_SIZE, STAR_PICKUP_SIZE),
            speed: STAR_PICKUP_SPEED,
        }
    }
}

/// Purely cosmetic blast left behind by explosive rounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    /// Center of the blast
    pub pos: Vec2,
    pub radius: f32,
    /// Remaining life, seconds
    pub life: f32,
    pub max_life: f32,
}

impl Explosion {
    pub fn at(center: Vec2) -> Self {
        Self {
            pos: center,
            radius: 0.0,
            life: EXPLOSION_LIFE,
            max_life: EXPLOSION_LIFE,
        }
    }

    /// Deplete life; the radius grows linearly as life runs out
    pub fn advance(&mut self, dt: f32) {
        self.life -= dt;
        self.radius = EXPLOSION_MAX_RADIUS * (1.0 - self.life / self.max_life);
    }

    pub fn expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Invincibility window: flag plus a non-negative countdown
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Invincibility {
    pub active: bool,
    /// Seconds remaining
    pub remaining: f32,
}

impl Invincibility {
    /// Star pickup collected. Re-collection resets the window, it does not
    /// extend it.
    pub fn grant(&mut self) {
        self.active = true;
        self.remaining = INVINCIBLE_TIME;
    }

    pub fn advance(&mut self, dt: f32) {
        if self.active {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                self.active = false;
                self.remaining = 0.0;
            }
        }
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Playfield size in pixels
    pub bounds: Vec2,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn placement and drop rolls draw from here
    pub rng: Pcg32,
    /// Selected before the run, immutable during it
    pub difficulty: Difficulty,

    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub soldiers: Vec<Hostile>,
    pub bombers: Vec<Hostile>,
    pub magazines: Vec<Pickup>,
    pub stars: Vec<Pickup>,
    pub explosions: Vec<Explosion>,

    pub loadout: Loadout,
    pub invincibility: Invincibility,

    pub score: i64,
    /// Elapsed play time, seconds; stops at game over
    pub play_time: f64,
    /// Terminal. Cleared only by replacing the whole state.
    pub game_over: bool,

    /// Soldier spawn accumulator (ms); the bomber trigger reads it too
    pub hostile_timer_ms: f32,
    /// Score at the last star spawn
    pub star_score_mark: i64,
}

impl GameState {
    /// Fresh run on a `width` x `height` playfield
    pub fn new(width: f32, height: f32, difficulty: Difficulty, seed: u64) -> Self {
        let bounds = Vec2::new(width, height);
        Self {
            bounds,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            player: Player::new(bounds),
            projectiles: Vec::new(),
            soldiers: Vec::new(),
            bombers: Vec::new(),
            magazines: Vec::new(),
            stars: Vec::new(),
            explosions: Vec::new(),
            loadout: Loadout::default(),
            invincibility: Invincibility::default(),
            score: 0,
            play_time: 0.0,
            game_over: false,
            hostile_timer_ms: 0.0,
            star_score_mark: 0,
        }
    }

    /// Playfield resized by the host. The player keeps its relative
    /// position and is re-clamped inside the new bounds.
    pub fn resize(&mut self, width: f32, height: f32) {
        let old = self.bounds;
        self.bounds = Vec2::new(width, height);
        if old.x > 0.0 && old.y > 0.0 {
            self.player.aabb.pos.x *= width / old.x;
            self.player.aabb.pos.y *= height / old.y;
        }
        self.player.aabb.clamp_inside(self.bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_initial_values() {
        let state = GameState::new(800.0, 600.0, Difficulty::Normal, 7);
        assert_eq!(state.score, 0);
        assert!(!state.game_over);
        assert_eq!(state.loadout.magazine, MAGAZINE_SIZE);
        assert_eq!(state.loadout.reserves, MAX_MAGAZINES);
        assert!(!state.invincibility.active);
        assert!(state.projectiles.is_empty());
        assert!(state.soldiers.is_empty());
        assert!(state.bombers.is_empty());

        // Player centered near the bottom
        assert_eq!(state.player.aabb.pos.x, 400.0 - PLAYER_SIZE / 2.0);
        assert_eq!(state.player.aabb.pos.y, 600.0 - PLAYER_START_OFFSET);
    }

    #[test]
    fn test_resize_rescales_player() {
        let mut state = GameState::new(800.0, 600.0, Difficulty::Normal, 7);
        state.player.aabb.pos = Vec2::new(400.0, 300.0);
        state.resize(400.0, 300.0);
        assert_eq!(state.player.aabb.pos, Vec2::new(200.0, 150.0));

        // Shrinking far enough re-clamps to the new edge
        state.resize(120.0, 100.0);
        assert!(state.player.aabb.pos.x <= 120.0 - PLAYER_SIZE);
        assert!(state.player.aabb.pos.y <= 100.0 - PLAYER_SIZE);
    }

    #[test]
    fn test_invincibility_grant_resets() {
        let mut inv = Invincibility::default();
        inv.grant();
        inv.advance(3.0);
        assert!(inv.active);
        assert!((inv.remaining - 2.0).abs() < 1e-6);

        // Second star resets to the full window
        inv.grant();
        assert_eq!(inv.remaining, INVINCIBLE_TIME);

        inv.advance(INVINCIBLE_TIME + 0.1);
        assert!(!inv.active);
        assert_eq!(inv.remaining, 0.0);
    }

    #[test]
    fn test_explosion_growth() {
        let mut e = Explosion::at(Vec2::new(50.0, 50.0));
        assert_eq!(e.radius, 0.0);
        e.advance(EXPLOSION_LIFE / 2.0);
        assert!((e.radius - EXPLOSION_MAX_RADIUS / 2.0).abs() < 1e-3);
        assert!(!e.expired());
        e.advance(EXPLOSION_LIFE / 2.0);
        assert!(e.expired());
    }

    #[test]
    fn test_projectile_muzzle_position() {
        let player = Player::new(Vec2::new(800.0, 600.0));
        let round = Projectile::fired_by(&player, super::super::ammo::AmmoKind::Normal);
        // Centered on the ship, leaving from its top edge
        assert_eq!(round.aabb.center().x, player.aabb.center().x);
        assert_eq!(round.aabb.pos.y, player.aabb.pos.y);
    }
}
