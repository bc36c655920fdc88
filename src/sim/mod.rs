//! Simulation core
//!
//! All gameplay logic lives here. The module is pure and display-free:
//! - One owned `GameState` aggregate, no ambient state
//! - Variable (bounded) delta-time, linear Euler integration
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod aabb;
pub mod ammo;
pub mod spawn;
pub mod state;
pub mod step;

pub use aabb::Aabb;
pub use ammo::{AmmoKind, Loadout, ReloadState};
pub use state::{Explosion, GameState, Hostile, Pickup, Player, Projectile};
pub use step::{StepInput, step};
