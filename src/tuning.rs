//! Data-driven game balance
//!
//! Each difficulty tier is a fixed profile of spawn/speed parameters,
//! selected before a run and immutable while it lasts.

use serde::{Deserialize, Serialize};

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Spawn/speed parameters of one tier
#[derive(Debug, Clone, Copy)]
pub struct DifficultyProfile {
    /// Standard hostile fall speed, px/s
    pub hostile_speed: f32,
    /// Time between standard hostile spawns
    pub hostile_spawn_interval_ms: f32,
    /// Bomber fall speed, px/s
    pub bomber_speed: f32,
    /// Bomber trigger period
    pub bomber_spawn_interval_ms: f32,
}

impl Difficulty {
    pub fn profile(self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &DifficultyProfile {
                hostile_speed: 180.0,
                hostile_spawn_interval_ms: 1000.0,
                bomber_speed: 140.0,
                bomber_spawn_interval_ms: 2000.0,
            },
            Difficulty::Normal => &DifficultyProfile {
                hostile_speed: 240.0,
                hostile_spawn_interval_ms: 1000.0,
                bomber_speed: 180.0,
                bomber_spawn_interval_ms: 2000.0,
            },
            Difficulty::Hard => &DifficultyProfile {
                hostile_speed: 320.0,
                hostile_spawn_interval_ms: 700.0,
                bomber_speed: 240.0,
                bomber_spawn_interval_ms: 1500.0,
            },
        }
    }

    /// On the easiest tier, bomber contact never ends the run
    pub fn bombers_harmless(self) -> bool {
        self == Difficulty::Easy
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_escalate() {
        let easy = Difficulty::Easy.profile();
        let normal = Difficulty::Normal.profile();
        let hard = Difficulty::Hard.profile();

        assert!(easy.hostile_speed < normal.hostile_speed);
        assert!(normal.hostile_speed < hard.hostile_speed);
        assert!(hard.hostile_spawn_interval_ms < normal.hostile_spawn_interval_ms);
        assert!(hard.bomber_spawn_interval_ms < normal.bomber_spawn_interval_ms);
    }

    #[test]
    fn test_bomber_exception_only_on_easy() {
        assert!(Difficulty::Easy.bombers_harmless());
        assert!(!Difficulty::Normal.bombers_harmless());
        assert!(!Difficulty::Hard.bombers_harmless());
    }

    #[test]
    fn test_from_str_round_trip() {
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }
}
