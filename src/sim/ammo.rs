//! Ammo and reload state machine
//!
//! Tracks the loaded magazine, reserve magazines, fire cooldowns, the reload
//! timer, and the selected ammo type. Invalid actions (dry fire, reload with
//! nothing to load) degrade to penalties or no-ops, never errors.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Projectile archetypes, cycled with the switch action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AmmoKind {
    #[default]
    Normal,
    Piercing,
    Explosive,
}

/// Static parameters of one ammo type
#[derive(Debug, Clone, Copy)]
pub struct AmmoSpec {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub damage: u32,
    pub piercing: bool,
    pub explosive: bool,
}

impl AmmoKind {
    pub fn spec(self) -> &'static AmmoSpec {
        match self {
            AmmoKind::Normal => &AmmoSpec {
                width: 20.0,
                height: 16.0,
                speed: 720.0,
                damage: 1,
                piercing: false,
                explosive: false,
            },
            AmmoKind::Piercing => &AmmoSpec {
                width: 15.0,
                height: 20.0,
                speed: 900.0,
                damage: 1,
                piercing: true,
                explosive: false,
            },
            AmmoKind::Explosive => &AmmoSpec {
                width: 25.0,
                height: 20.0,
                speed: 600.0,
                damage: 2,
                piercing: false,
                explosive: true,
            },
        }
    }

    /// Next type in the switch cycle
    pub fn next(self) -> Self {
        match self {
            AmmoKind::Normal => AmmoKind::Piercing,
            AmmoKind::Piercing => AmmoKind::Explosive,
            AmmoKind::Explosive => AmmoKind::Normal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AmmoKind::Normal => "Standard",
            AmmoKind::Piercing => "Piercing",
            AmmoKind::Explosive => "Explosive",
        }
    }
}

/// Reload machine: exactly one of these holds at any time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ReloadState {
    #[default]
    Ready,
    Reloading {
        remaining_ms: f32,
    },
}

/// The player's ammo economy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loadout {
    /// Rounds in the loaded magazine, `0..=MAGAZINE_SIZE`
    pub magazine: u32,
    /// Full reserve magazines, `0..=MAX_MAGAZINES`
    pub reserves: u32,
    pub selected: AmmoKind,
    pub reload: ReloadState,
    /// Time until the next shot is allowed
    pub cooldown_ms: f32,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            magazine: MAGAZINE_SIZE,
            reserves: MAX_MAGAZINES,
            selected: AmmoKind::Normal,
            reload: ReloadState::Ready,
            cooldown_ms: 0.0,
        }
    }
}

impl Loadout {
    pub fn is_reloading(&self) -> bool {
        matches!(self.reload, ReloadState::Reloading { .. })
    }

    /// Manual reload request. Rejected while already reloading, with a full
    /// magazine, or with no reserves left. Returns whether it started.
    pub fn request_reload(&mut self) -> bool {
        if self.is_reloading() || self.magazine >= MAGAZINE_SIZE || self.reserves == 0 {
            return false;
        }
        self.reload = ReloadState::Reloading {
            remaining_ms: RELOAD_TIME_MS,
        };
        true
    }

    /// Switch to the next ammo type
    pub fn cycle(&mut self) {
        self.selected = self.selected.next();
    }

    /// Advance cooldown and reload timers by `dt_ms`
    pub fn advance(&mut self, dt_ms: f32) {
        if self.cooldown_ms > 0.0 {
            self.cooldown_ms -= dt_ms;
        }

        if let ReloadState::Reloading { remaining_ms } = &mut self.reload {
            *remaining_ms -= dt_ms;
            if *remaining_ms <= 0.0 {
                if self.reserves > 0 {
                    self.reserves -= 1;
                    self.magazine = MAGAZINE_SIZE;
                } else {
                    self.magazine = 0;
                }
                self.reload = ReloadState::Ready;
            }
        }
    }

    /// Attempt to fire. Returns the ammo type to emit, or `None` when the
    /// trigger does nothing this tick. A dry trigger pull on an empty
    /// magazine sets the longer anti-spam cooldown. Invincible fire is free.
    pub fn try_fire(&mut self, invincible: bool) -> Option<AmmoKind> {
        if self.cooldown_ms > 0.0 || self.is_reloading() {
            return None;
        }
        if self.magazine == 0 && !invincible {
            self.cooldown_ms = EMPTY_FIRE_COOLDOWN_MS;
            return None;
        }
        if !invincible {
            self.magazine -= 1;
        }
        self.cooldown_ms = FIRE_COOLDOWN_MS;
        Some(self.selected)
    }

    /// Collect a magazine pickup. No effect at the reserve cap.
    pub fn add_reserve(&mut self) {
        if self.reserves < MAX_MAGAZINES {
            self.reserves += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_consumes_one_round() {
        let mut loadout = Loadout::default();
        assert_eq!(loadout.try_fire(false), Some(AmmoKind::Normal));
        assert_eq!(loadout.magazine, MAGAZINE_SIZE - 1);
        assert_eq!(loadout.cooldown_ms, FIRE_COOLDOWN_MS);
    }

    #[test]
    fn test_fire_blocked_by_cooldown() {
        let mut loadout = Loadout::default();
        assert!(loadout.try_fire(false).is_some());
        assert!(loadout.try_fire(false).is_none());
        loadout.advance(FIRE_COOLDOWN_MS);
        assert!(loadout.try_fire(false).is_some());
        assert_eq!(loadout.magazine, MAGAZINE_SIZE - 2);
    }

    #[test]
    fn test_dry_fire_penalty() {
        let mut loadout = Loadout {
            magazine: 0,
            ..Default::default()
        };
        assert!(loadout.try_fire(false).is_none());
        assert_eq!(loadout.cooldown_ms, EMPTY_FIRE_COOLDOWN_MS);
        assert_eq!(loadout.magazine, 0);
    }

    #[test]
    fn test_invincible_fire_is_free() {
        let mut loadout = Loadout {
            magazine: 0,
            ..Default::default()
        };
        assert_eq!(loadout.try_fire(true), Some(AmmoKind::Normal));
        assert_eq!(loadout.magazine, 0);
        assert_eq!(loadout.cooldown_ms, FIRE_COOLDOWN_MS);
    }

    #[test]
    fn test_reload_guards() {
        // Full magazine: rejected
        let mut loadout = Loadout::default();
        assert!(!loadout.request_reload());

        // Partial magazine with reserves: accepted
        loadout.magazine = 5;
        assert!(loadout.request_reload());
        assert!(loadout.is_reloading());

        // Already reloading: rejected
        assert!(!loadout.request_reload());

        // No reserves: rejected
        let mut empty = Loadout {
            magazine: 3,
            reserves: 0,
            ..Default::default()
        };
        assert!(!empty.request_reload());
    }

    #[test]
    fn test_reload_completion() {
        let mut loadout = Loadout {
            magazine: 5,
            reserves: 3,
            ..Default::default()
        };
        assert!(loadout.request_reload());

        // 2000 ms spread over several ticks
        for _ in 0..4 {
            loadout.advance(RELOAD_TIME_MS / 4.0);
        }
        assert!(!loadout.is_reloading());
        assert_eq!(loadout.magazine, MAGAZINE_SIZE);
        assert_eq!(loadout.reserves, 2);
    }

    #[test]
    fn test_fire_blocked_while_reloading() {
        let mut loadout = Loadout {
            magazine: 5,
            ..Default::default()
        };
        loadout.request_reload();
        assert!(loadout.try_fire(false).is_none());
        assert_eq!(loadout.magazine, 5);
    }

    #[test]
    fn test_cycle_order() {
        let mut loadout = Loadout::default();
        assert_eq!(loadout.selected, AmmoKind::Normal);
        loadout.cycle();
        assert_eq!(loadout.selected, AmmoKind::Piercing);
        loadout.cycle();
        assert_eq!(loadout.selected, AmmoKind::Explosive);
        loadout.cycle();
        assert_eq!(loadout.selected, AmmoKind::Normal);
    }

    #[test]
    fn test_reserve_cap() {
        let mut loadout = Loadout::default();
        assert_eq!(loadout.reserves, MAX_MAGAZINES);
        loadout.add_reserve();
        assert_eq!(loadout.reserves, MAX_MAGAZINES);

        loadout.reserves = 2;
        loadout.add_reserve();
        assert_eq!(loadout.reserves, 3);
    }
}
