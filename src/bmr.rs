//! Basal metabolic rate estimation
//!
//! Two validated predictive equations are supported:
//! - Mifflin-St Jeor (1990), from weight, height, age and sex
//! - Katch-McArdle, from lean body mass, preferred whenever body fat is known

use crate::models::{lean_mass, round_whole, BiometricInput, Gender};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Equation used for a BMR estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmrMethod {
    MifflinStJeor,
    KatchMcArdle,
}

impl std::fmt::Display for BmrMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BmrMethod::MifflinStJeor => write!(f, "Mifflin-St Jeor"),
            BmrMethod::KatchMcArdle => write!(f, "Katch-McArdle"),
        }
    }
}

/// BMR estimate with the equation that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmrEstimate {
    /// Basal metabolic rate in kcal/day
    pub bmr: i64,
    pub method: BmrMethod,
}

pub struct BmrCalculator;

impl BmrCalculator {
    /// Estimate BMR for a set of body metrics
    pub fn estimate(input: &BiometricInput) -> BmrEstimate {
        let (raw, method) = match input.usable_body_fat() {
            Some(body_fat) => (
                Self::katch_mcardle(input.weight_kg, body_fat),
                BmrMethod::KatchMcArdle,
            ),
            None => (
                Self::mifflin_st_jeor(input.gender, input.weight_kg, input.height_cm, input.age_years),
                BmrMethod::MifflinStJeor,
            ),
        };

        let bmr = round_whole(raw);
        tracing::debug!(bmr, ?method, "BMR estimated");

        BmrEstimate { bmr, method }
    }

    /// BMR in whole kcal/day
    pub fn compute_bmr(
        gender: Gender,
        weight_kg: Decimal,
        height_cm: Decimal,
        age_years: Decimal,
        body_fat_percent: Option<Decimal>,
    ) -> i64 {
        let input = BiometricInput {
            gender,
            age_years,
            weight_kg,
            height_cm,
            body_fat_percent,
        };
        Self::estimate(&input).bmr
    }

    /// Mifflin-St Jeor equation
    ///
    /// BMR = 10 × weight + 6.25 × height − 5 × age, then +5 for men and −161 for women.
    pub fn mifflin_st_jeor(
        gender: Gender,
        weight_kg: Decimal,
        height_cm: Decimal,
        age_years: Decimal,
    ) -> Decimal {
        let base = dec!(10) * weight_kg + dec!(6.25) * height_cm - dec!(5) * age_years;
        match gender {
            Gender::Male => base + dec!(5),
            Gender::Female => base - dec!(161),
        }
    }

    /// Katch-McArdle equation: BMR = 370 + 21.6 × lean mass
    pub fn katch_mcardle(weight_kg: Decimal, body_fat_percent: Decimal) -> Decimal {
        dec!(370) + dec!(21.6) * lean_mass(weight_kg, body_fat_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mifflin_male() {
        // 10×70 + 6.25×175 − 5×25 + 5 = 1673.75
        let bmr = BmrCalculator::compute_bmr(Gender::Male, dec!(70), dec!(175), dec!(25), None);
        assert_eq!(bmr, 1674);
    }

    #[test]
    fn test_mifflin_female() {
        // 10×60 + 6.25×165 − 5×30 − 161 = 1320.25
        let bmr = BmrCalculator::compute_bmr(Gender::Female, dec!(60), dec!(165), dec!(30), None);
        assert_eq!(bmr, 1320);
    }

    #[test]
    fn test_katch_mcardle_when_body_fat_known() {
        let input = BiometricInput::new(Gender::Male, dec!(30), dec!(80), dec!(180))
            .with_body_fat(dec!(20));

        // lean mass 64 kg → 370 + 21.6×64 = 1752.4
        let estimate = BmrCalculator::estimate(&input);
        assert_eq!(estimate.bmr, 1752);
        assert_eq!(estimate.method, BmrMethod::KatchMcArdle);
    }

    #[test]
    fn test_zero_body_fat_uses_mifflin() {
        let bmr_zero = BmrCalculator::compute_bmr(Gender::Male, dec!(70), dec!(175), dec!(25), Some(dec!(0)));
        let bmr_none = BmrCalculator::compute_bmr(Gender::Male, dec!(70), dec!(175), dec!(25), None);
        assert_eq!(bmr_zero, bmr_none);
    }

    #[test]
    fn test_out_of_range_body_fat_uses_mifflin() {
        for body_fat in [dec!(100), dec!(150)] {
            let input = BiometricInput::new(Gender::Male, dec!(30), dec!(80), dec!(180))
                .with_body_fat(body_fat);

            let estimate = BmrCalculator::estimate(&input);
            assert_eq!(estimate.method, BmrMethod::MifflinStJeor);
            // 800 + 1125 − 150 + 5
            assert_eq!(estimate.bmr, 1780);
        }
    }

    #[test]
    fn test_katch_mcardle_ignores_sex_and_age() {
        let male = BmrCalculator::compute_bmr(Gender::Male, dec!(70), dec!(175), dec!(25), Some(dec!(15)));
        let female = BmrCalculator::compute_bmr(Gender::Female, dec!(70), dec!(160), dec!(60), Some(dec!(15)));
        assert_eq!(male, female);
    }
}
