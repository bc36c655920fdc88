//! Skyraid - a vertical arcade shooter for the browser canvas
//!
//! Core modules:
//! - `sim`: Simulation core (movement, collisions, spawning, game state)
//! - `render`: Canvas 2D render adapter (read-only over the sim state)
//! - `tuning`: Data-driven difficulty profiles
//! - `settings`: Player preferences (selected difficulty)
//! - `highscores`: Best score / best survival time records

pub mod highscores;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Difficulty;

/// Game configuration constants
pub mod consts {
    /// Per-frame delta-time ceiling (seconds). Slow frames are clamped to
    /// this so entities never tunnel through bounds.
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Frames whose raw delta-time exceeds this (tab suspension, debugger
    /// pauses) are discarded outright instead of simulated.
    pub const STALL_FRAME_DT: f32 = 0.2;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Distance from the bottom edge at which the player starts
    pub const PLAYER_START_OFFSET: f32 = 60.0;

    /// Hostiles (soldiers and bombers share one footprint)
    pub const HOSTILE_SIZE: f32 = 40.0;
    /// Hostiles and pickups enter just above the top edge
    pub const SPAWN_Y: f32 = -40.0;
    /// Placement attempts before overlap is accepted
    pub const SPAWN_TRIES: u32 = 10;

    /// Ammo economy
    pub const MAGAZINE_SIZE: u32 = 20;
    pub const MAX_MAGAZINES: u32 = 5;
    pub const RELOAD_TIME_MS: f32 = 2000.0;
    pub const FIRE_COOLDOWN_MS: f32 = 250.0;
    /// Anti-spam cooldown applied when firing on an empty magazine
    pub const EMPTY_FIRE_COOLDOWN_MS: f32 = 333.0;
    /// Hostile hits a piercing round survives
    pub const MAX_PIERCING_HITS: u32 = 2;

    /// Magazine drops off killed soldiers
    pub const MAGAZINE_DROP_CHANCE: f32 = 0.05;
    /// No drop rolls at all while reserves exceed this
    pub const MAGAZINE_DROP_RESERVE_CEILING: u32 = 3;
    pub const MAGAZINE_PICKUP_SIZE: f32 = 30.0;
    pub const MAGAZINE_PICKUP_SPEED: f32 = 120.0;

    /// Invincibility star
    pub const STAR_PICKUP_SIZE: f32 = 35.0;
    pub const STAR_PICKUP_SPEED: f32 = 150.0;
    pub const INVINCIBLE_TIME: f32 = 5.0;
    /// Score gained between consecutive star spawns
    pub const STAR_SCORE_STEP: i64 = 500;

    /// Explosion effect
    pub const EXPLOSION_MAX_RADIUS: f32 = 40.0;
    pub const EXPLOSION_LIFE: f32 = 0.5;
}
