//! Daily training load classification
//!
//! Buckets a day's logged exercise into rest / light / moderate / high, which
//! drives carbohydrate periodization and micronutrient adjustments.
//!
//! - Rest: nothing logged, zero total duration, or only recovery activities
//! - High: more than 90 minutes in total, or more than 60 minutes of HIIT
//! - Moderate: 45 to 90 minutes
//! - Light: under 45 minutes

use crate::models::{ExerciseEntry, LoadLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Activities that do not count as training
pub const RECOVERY_SPORTS: [&str; 3] = ["yoga", "stretching_mild", "walking_slow"];

/// High-intensity interval style activities
pub const HIIT_SPORTS: [&str; 3] = ["weight_training_hiit", "hiit_cardio", "crossfit"];

const HIGH_TOTAL_MINUTES: Decimal = dec!(90);
const HIGH_HIIT_MINUTES: Decimal = dec!(60);
const MODERATE_TOTAL_MINUTES: Decimal = dec!(45);

pub struct LoadClassifier;

impl LoadClassifier {
    pub fn classify(exercises: &[ExerciseEntry]) -> LoadLevel {
        let total: Decimal = exercises.iter().map(Self::minutes).sum();
        if exercises.is_empty() || total <= Decimal::ZERO {
            return LoadLevel::Rest;
        }

        if exercises.iter().all(|e| Self::is_recovery_sport(&e.sport)) {
            return LoadLevel::Rest;
        }

        let hiit: Decimal = exercises
            .iter()
            .filter(|e| Self::is_hiit_sport(&e.sport))
            .map(Self::minutes)
            .sum();

        let level = if total > HIGH_TOTAL_MINUTES || hiit > HIGH_HIIT_MINUTES {
            LoadLevel::High
        } else if total >= MODERATE_TOTAL_MINUTES {
            LoadLevel::Moderate
        } else {
            LoadLevel::Light
        };

        tracing::debug!(%total, %hiit, %level, "Daily load classified");
        level
    }

    /// Logged minutes, never negative
    fn minutes(entry: &ExerciseEntry) -> Decimal {
        entry.duration_minutes.max(Decimal::ZERO)
    }

    pub fn is_recovery_sport(key: &str) -> bool {
        RECOVERY_SPORTS.contains(&key)
    }

    pub fn is_hiit_sport(key: &str) -> bool {
        HIIT_SPORTS.contains(&key)
    }
}
