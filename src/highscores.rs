//! Score records
//!
//! Two high-water marks persisted to LocalStorage: best score and best
//! survival time. Read once at startup, written when a finished run beats
//! either mark.

use serde::{Deserialize, Serialize};

/// Best score / best survival time for this browser
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HighScores {
    /// Highest final score (bomber penalties can drive run scores negative,
    /// so this stays signed)
    pub best_score: i64,
    /// Longest survival, seconds
    pub best_time_secs: f64,
}

impl HighScores {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "skyraid_highscores";

    /// Fold a finished run into the records. Returns true when either mark
    /// was beaten.
    pub fn record_run(&mut self, score: i64, time_secs: f64) -> bool {
        let mut improved = false;
        if score > self.best_score {
            self.best_score = score;
            improved = true;
        }
        if time_secs > self.best_time_secs {
            self.best_time_secs = time_secs;
            improved = true;
        }
        improved
    }

    /// Load records from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!(
                        "Loaded records: score {}, time {:.1}s",
                        scores.best_score,
                        scores.best_time_secs
                    );
                    return scores;
                }
            }
        }

        log::info!("No records found, starting fresh");
        Self::default()
    }

    /// Save records to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Records saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Format elapsed seconds as `m:ss` for the HUD and game-over screen
pub fn format_time(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_run_updates_marks() {
        let mut records = HighScores::default();

        assert!(records.record_run(120, 35.0));
        assert_eq!(records.best_score, 120);
        assert_eq!(records.best_time_secs, 35.0);

        // Worse run changes nothing
        assert!(!records.record_run(80, 20.0));
        assert_eq!(records.best_score, 120);

        // One mark can improve without the other
        assert!(records.record_run(50, 61.5));
        assert_eq!(records.best_score, 120);
        assert_eq!(records.best_time_secs, 61.5);
    }

    #[test]
    fn test_zero_score_run_does_not_beat_fresh_records() {
        let mut records = HighScores::default();
        assert!(!records.record_run(0, 0.0));
    }

    #[test]
    fn test_negative_score_kept_signed() {
        let mut records = HighScores::default();
        // A run that ends below zero never beats the fresh mark of 0
        assert!(!records.record_run(-60, 0.0));
        assert_eq!(records.best_score, 0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
    }
}
