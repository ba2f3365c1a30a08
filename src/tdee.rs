//! Total daily energy expenditure

use crate::models::{round_whole, ActivityLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

impl ActivityLevel {
    /// BMR multiplier for this activity level
    pub fn multiplier(&self) -> Decimal {
        match self {
            ActivityLevel::Sedentary => dec!(1.2),
            ActivityLevel::Light => dec!(1.375),
            ActivityLevel::Moderate => dec!(1.55),
            ActivityLevel::Active => dec!(1.725),
            ActivityLevel::VeryActive => dec!(1.9),
        }
    }

    /// Parse an activity key, falling back to sedentary for unknown keys
    pub fn from_key_or_default(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            tracing::warn!(key, "Unknown activity level, using sedentary");
            ActivityLevel::Sedentary
        })
    }
}

pub struct TdeeCalculator;

impl TdeeCalculator {
    /// TDEE = round(BMR × multiplier) + logged exercise burn
    ///
    /// Logged exercise replaces the general activity estimate: once any burn is
    /// logged the multiplier drops to sedentary so activity is not counted twice.
    pub fn compute_tdee(bmr: i64, activity_level: ActivityLevel, exercise_burn: i64) -> i64 {
        let level = if exercise_burn > 0 {
            ActivityLevel::Sedentary
        } else {
            activity_level
        };

        let base = round_whole(Decimal::from(bmr) * level.multiplier());
        let tdee = base + exercise_burn.max(0);

        tracing::debug!(bmr, %level, exercise_burn, tdee, "TDEE calculated");
        tdee
    }
}
