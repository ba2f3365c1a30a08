//! Goal calorie resolution
//!
//! Turns TDEE plus a body-composition goal into a daily calorie target.
//! Cuts are sized from the fat mass that has to go and the time allowed;
//! bulks from the weight to gain. Both use 7700 kcal per kg of body mass.
//! When the targets are missing or inconsistent a conservative default
//! (500 kcal deficit, 300 kcal surplus) is used instead.
//!
//! Safety warnings are advisory. They are collected in evaluation order and
//! never change the numbers; the last one is the headline warning.

use crate::error::ValidationError;
use crate::models::{round_places, round_whole, BiometricInput, BulkTarget, Goal, GoalParameters};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// TDEE assumed when none (or a non-positive one) is supplied
pub const TDEE_FALLBACK_KCAL: i64 = 2000;

/// Energy content of one kg of body mass change
pub const KCAL_PER_KG: Decimal = dec!(7700);

/// Deficit used when cut targets cannot produce one
pub const DEFAULT_DEFICIT_KCAL: Decimal = dec!(500);

/// Surplus used when bulk targets cannot produce one
pub const DEFAULT_SURPLUS_KCAL: Decimal = dec!(300);

/// Deficits above this are flagged as an unsafe loss rate
pub const HIGH_DEFICIT_KCAL: Decimal = dec!(1200);

/// Calorie targets below this are flagged
pub const MIN_SAFE_CALORIES: Decimal = dec!(1200);

/// Surpluses above this mostly add fat
pub const HIGH_SURPLUS_KCAL: Decimal = dec!(500);

/// Advisory warning attached to a goal calorie target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalWarning {
    /// Required deficit exceeds 1200 kcal/day
    HighDeficit,
    /// Resulting target is below 1200 kcal/day
    VeryLowCalorie,
    /// Required surplus exceeds 500 kcal/day
    HighSurplus,
}

impl GoalWarning {
    pub fn key(&self) -> &'static str {
        match self {
            GoalWarning::HighDeficit => "high_deficit",
            GoalWarning::VeryLowCalorie => "very_low_calorie",
            GoalWarning::HighSurplus => "high_surplus",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            GoalWarning::HighDeficit => {
                "Losing weight this fast requires a deficit above 1200 kcal/day. Consider a longer timeframe."
            }
            GoalWarning::VeryLowCalorie => {
                "Target is below 1200 kcal/day, which is generally unsafe without medical supervision."
            }
            GoalWarning::HighSurplus => {
                "Surplus above 500 kcal/day will likely add more fat than muscle. Consider a longer timeframe."
            }
        }
    }
}

/// Daily calorie target for a goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalOutcome {
    /// Target calories per day
    pub calories: i64,

    /// calories − normalized TDEE (negative for a deficit)
    pub daily_diff: i64,

    /// TDEE after fallback substitution
    pub normalized_tdee: i64,

    /// Planned deficit or surplus before clamping, in whole kcal
    pub daily_adjustment: i64,

    /// True when the default deficit/surplus replaced a computed one
    pub used_fallback: bool,

    /// Warnings in the order the checks fired
    pub warnings: Vec<GoalWarning>,
}

impl GoalOutcome {
    /// Headline warning: the last check that fired wins
    pub fn warning(&self) -> Option<GoalWarning> {
        self.warnings.last().copied()
    }
}

pub struct GoalResolver;

impl GoalResolver {
    /// Resolve the calorie target for a goal
    pub fn resolve(tdee: Option<i64>, goal: Goal, params: &GoalParameters) -> GoalOutcome {
        let normalized_tdee = match tdee {
            Some(value) if value > 0 => value,
            _ => {
                tracing::warn!(?tdee, fallback = TDEE_FALLBACK_KCAL, "Invalid TDEE, using fallback");
                TDEE_FALLBACK_KCAL
            }
        };
        let base = Decimal::from(normalized_tdee);

        let mut warnings = Vec::new();
        let mut used_fallback = false;

        let (target, adjustment) = match goal {
            Goal::Maintain => (base, Decimal::ZERO),
            Goal::Cut => {
                let deficit = match Self::planned_deficit(params) {
                    Some(deficit) => deficit,
                    None => {
                        used_fallback = true;
                        DEFAULT_DEFICIT_KCAL
                    }
                };

                if deficit > HIGH_DEFICIT_KCAL {
                    warnings.push(GoalWarning::HighDeficit);
                }

                let target = base - deficit;
                if target < MIN_SAFE_CALORIES {
                    warnings.push(GoalWarning::VeryLowCalorie);
                }

                (target, deficit)
            }
            Goal::Bulk => {
                let surplus = match Self::planned_surplus(params) {
                    Some(surplus) => surplus,
                    None => {
                        used_fallback = true;
                        DEFAULT_SURPLUS_KCAL
                    }
                };

                if surplus > HIGH_SURPLUS_KCAL {
                    warnings.push(GoalWarning::HighSurplus);
                }

                (base + surplus, surplus)
            }
        };

        // The diff is always derived from the final rounded target
        let calories = round_whole(target).max(0);
        let daily_diff = calories - normalized_tdee;

        if used_fallback {
            tracing::warn!(%goal, "Goal targets incomplete, using default adjustment");
        }
        for warning in &warnings {
            tracing::warn!(warning = warning.key(), calories, "Goal safety warning");
        }
        tracing::debug!(%goal, normalized_tdee, calories, daily_diff, "Goal resolved");

        GoalOutcome {
            calories,
            daily_diff,
            normalized_tdee,
            daily_adjustment: round_whole(adjustment),
            used_fallback,
            warnings,
        }
    }

    /// Daily deficit needed to reach the target body fat in time
    ///
    /// Lean mass is held constant: target weight = lean mass / (1 − target BF).
    pub fn planned_deficit(params: &GoalParameters) -> Option<Decimal> {
        let weight = positive(params.current_weight_kg)?;
        let current_bf = percentage(params.current_body_fat_percent)?;
        let target_bf = percentage(params.target_body_fat_percent)?;
        let weeks = positive(params.time_weeks)?;

        let lean_mass = weight * (Decimal::ONE - current_bf / dec!(100));
        let target_weight = lean_mass.checked_div(Decimal::ONE - target_bf / dec!(100))?;
        let weight_loss = weight - target_weight;
        if weight_loss <= Decimal::ZERO {
            return None;
        }

        (weight_loss * KCAL_PER_KG)
            .checked_div(weeks * dec!(7))
            .filter(|deficit| *deficit > Decimal::ZERO)
    }

    /// Daily surplus needed to gain the target weight in time
    pub fn planned_surplus(params: &GoalParameters) -> Option<Decimal> {
        let gain = positive(params.target_gain_kg)?;
        let weeks = positive(params.time_weeks)?;

        (gain * KCAL_PER_KG)
            .checked_div(weeks * dec!(7))
            .filter(|surplus| *surplus > Decimal::ZERO)
    }

    /// Weight to gain for a bulk target
    ///
    /// FFMI targets are converted through lean mass, so they need a body fat
    /// reading. Without one the calculation is refused rather than guessed.
    pub fn resolve_bulk_gain(
        target: BulkTarget,
        input: &BiometricInput,
    ) -> Result<Decimal, ValidationError> {
        match target {
            BulkTarget::GainKg(kg) => Ok(kg.max(Decimal::ZERO)),
            BulkTarget::Ffmi(target_ffmi) => {
                let lean_mass = input
                    .lean_mass_kg()
                    .ok_or(ValidationError::BodyFatRequiredForFfmi)?;
                let height_m = input.height_cm / dec!(100);
                let required_lean_mass = target_ffmi * height_m * height_m;

                Ok((required_lean_mass - lean_mass).max(Decimal::ZERO))
            }
        }
    }

    /// Current fat-free mass index (lean kg / m²), one decimal place
    pub fn fat_free_mass_index(input: &BiometricInput) -> Option<Decimal> {
        let lean_mass = input.lean_mass_kg()?;
        let height_m = input.height_cm / dec!(100);

        lean_mass
            .checked_div(height_m * height_m)
            .map(|ffmi| round_places(ffmi, 1))
    }
}

fn positive(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

fn percentage(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO && *v < dec!(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use proptest::prelude::*;

    fn cut_params(weight: Decimal, bf: Decimal, target_bf: Decimal, weeks: Decimal) -> GoalParameters {
        GoalParameters {
            current_weight_kg: Some(weight),
            current_body_fat_percent: Some(bf),
            target_body_fat_percent: Some(target_bf),
            time_weeks: Some(weeks),
            target_gain_kg: None,
        }
    }

    #[test]
    fn test_maintain() {
        let outcome = GoalResolver::resolve(Some(2500), Goal::Maintain, &GoalParameters::default());
        assert_eq!(outcome.calories, 2500);
        assert_eq!(outcome.daily_diff, 0);
        assert!(outcome.warning().is_none());
    }

    #[test]
    fn test_cut_from_body_composition() {
        // 80 kg at 20% → lean 64 kg → 15% target = 75.294 kg → 4.706 kg to lose
        // 4.706 × 7700 / 84 days ≈ 431.4 kcal/day
        let params = cut_params(dec!(80), dec!(20), dec!(15), dec!(12));
        let outcome = GoalResolver::resolve(Some(2600), Goal::Cut, &params);

        assert_eq!(outcome.calories, 2169);
        assert_eq!(outcome.daily_diff, -431);
        assert_eq!(outcome.daily_adjustment, 431);
        assert!(!outcome.used_fallback);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_cut_falls_back_to_default_deficit() {
        // Target body fat above current: nothing to lose
        let params = cut_params(dec!(80), dec!(12), dec!(15), dec!(12));
        let outcome = GoalResolver::resolve(Some(2600), Goal::Cut, &params);
        assert_eq!(outcome.calories, 2100);
        assert!(outcome.used_fallback);

        let outcome = GoalResolver::resolve(Some(2600), Goal::Cut, &GoalParameters::default());
        assert_eq!(outcome.daily_diff, -500);
    }

    #[test]
    fn test_cut_with_full_target_body_fat_falls_back() {
        let params = cut_params(dec!(80), dec!(20), dec!(100), dec!(12));
        let outcome = GoalResolver::resolve(Some(2600), Goal::Cut, &params);
        assert_eq!(outcome.daily_diff, -500);
        assert!(outcome.used_fallback);
    }

    #[test]
    fn test_aggressive_cut_collects_both_warnings() {
        // 100 kg at 30% → 10%: 22.2 kg in 4 weeks is a ~6100 kcal/day deficit
        let params = cut_params(dec!(100), dec!(30), dec!(10), dec!(4));
        let outcome = GoalResolver::resolve(Some(2800), Goal::Cut, &params);

        assert_eq!(
            outcome.warnings,
            vec![GoalWarning::HighDeficit, GoalWarning::VeryLowCalorie]
        );
        assert_eq!(outcome.warning(), Some(GoalWarning::VeryLowCalorie));
        assert_eq!(outcome.calories, 0);
        assert_eq!(outcome.daily_diff, -2800);
    }

    #[test]
    fn test_high_deficit_without_low_calorie() {
        // 100 kg at 30% → 20%: 12.5 kg in 10 weeks = 1375 kcal/day
        let params = cut_params(dec!(100), dec!(30), dec!(20), dec!(10));
        let outcome = GoalResolver::resolve(Some(3500), Goal::Cut, &params);
        assert_eq!(outcome.warning(), Some(GoalWarning::HighDeficit));
        assert_eq!(outcome.calories, 2125);
    }

    #[test]
    fn test_bulk_surplus() {
        let params = GoalParameters {
            target_gain_kg: Some(dec!(2)),
            time_weeks: Some(dec!(12)),
            ..Default::default()
        };
        // 2 × 7700 / 84 = 183.33
        let outcome = GoalResolver::resolve(Some(2500), Goal::Bulk, &params);
        assert_eq!(outcome.calories, 2683);
        assert_eq!(outcome.daily_diff, 183);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_bulk_high_surplus_and_fallback() {
        let fast = GoalParameters {
            target_gain_kg: Some(dec!(5)),
            time_weeks: Some(dec!(4)),
            ..Default::default()
        };
        let outcome = GoalResolver::resolve(Some(2500), Goal::Bulk, &fast);
        assert_eq!(outcome.warning(), Some(GoalWarning::HighSurplus));

        let outcome = GoalResolver::resolve(Some(2500), Goal::Bulk, &GoalParameters::default());
        assert_eq!(outcome.daily_diff, 300);
        assert!(outcome.used_fallback);
    }

    #[test]
    fn test_missing_tdee_falls_back() {
        let outcome = GoalResolver::resolve(None, Goal::Cut, &GoalParameters::default());
        assert_eq!(outcome.normalized_tdee, TDEE_FALLBACK_KCAL);
        assert_eq!(outcome.calories, 1500);
        assert!(outcome.calories > 0);

        let outcome = GoalResolver::resolve(Some(-40), Goal::Maintain, &GoalParameters::default());
        assert_eq!(outcome.calories, TDEE_FALLBACK_KCAL);
    }

    #[test]
    fn test_ffmi_bulk_requires_body_fat() {
        let input = BiometricInput::new(Gender::Male, dec!(25), dec!(70), dec!(175));
        assert_eq!(
            GoalResolver::resolve_bulk_gain(BulkTarget::Ffmi(dec!(22)), &input),
            Err(ValidationError::BodyFatRequiredForFfmi)
        );

        // Direct kg targets never need body fat
        assert_eq!(
            GoalResolver::resolve_bulk_gain(BulkTarget::GainKg(dec!(2)), &input),
            Ok(dec!(2))
        );
    }

    #[test]
    fn test_ffmi_bulk_gain() {
        // lean 70 × 0.85 = 59.5 kg; 22 × 1.75² = 67.375 kg → 7.875 kg to gain
        let input = BiometricInput::new(Gender::Male, dec!(25), dec!(70), dec!(175))
            .with_body_fat(dec!(15));
        let gain = GoalResolver::resolve_bulk_gain(BulkTarget::Ffmi(dec!(22)), &input).unwrap();
        assert_eq!(gain, dec!(7.875));

        // Already above the target FFMI
        let gain = GoalResolver::resolve_bulk_gain(BulkTarget::Ffmi(dec!(15)), &input).unwrap();
        assert_eq!(gain, Decimal::ZERO);

        assert_eq!(GoalResolver::fat_free_mass_index(&input), Some(dec!(19.4)));
    }

    #[test]
    fn test_ffmi_midpoint_rounds_up() {
        // lean 81 kg over 2.0² = 20.25
        let input = BiometricInput::new(Gender::Male, dec!(30), dec!(90), dec!(200))
            .with_body_fat(dec!(10));
        assert_eq!(GoalResolver::fat_free_mass_index(&input), Some(dec!(20.3)));
    }

    proptest! {
        #[test]
        fn test_diff_matches_calories(
            tdee in proptest::option::of(-500i64..6000i64),
            goal_index in 0usize..3,
            weight in proptest::option::of(40u32..160u32),
            bf in proptest::option::of(0u32..60u32),
            target_bf in proptest::option::of(0u32..60u32),
            weeks in proptest::option::of(0u32..52u32),
            gain in proptest::option::of(0u32..15u32),
        ) {
            let goal = [Goal::Maintain, Goal::Cut, Goal::Bulk][goal_index];
            let params = GoalParameters {
                current_weight_kg: weight.map(Decimal::from),
                current_body_fat_percent: bf.map(Decimal::from),
                target_body_fat_percent: target_bf.map(Decimal::from),
                time_weeks: weeks.map(Decimal::from),
                target_gain_kg: gain.map(Decimal::from),
            };

            let outcome = GoalResolver::resolve(tdee, goal, &params);

            prop_assert!(outcome.normalized_tdee > 0);
            prop_assert!(outcome.calories >= 0);
            prop_assert_eq!(outcome.daily_diff, outcome.calories - outcome.normalized_tdee);

            match goal {
                Goal::Maintain => prop_assert_eq!(outcome.daily_diff, 0),
                Goal::Cut => prop_assert!(outcome.daily_diff < 0),
                Goal::Bulk => prop_assert!(outcome.daily_diff > 0),
            }
        }
    }
}
