//! Micronutrient targets
//!
//! Baselines are NIH recommended dietary allowances for adults by sex. Two
//! adjustments apply to training days:
//! - magnesium +10% on moderate/high load days (sweat losses)
//! - a higher vitamin D range on high load days
//! Vitamin B6 scales with protein intake (it is a cofactor in amino acid
//! metabolism) but never drops below the 1.3 mg RDA.

use crate::models::{round_places, Gender, LoadLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

const VITAMIN_B6_FLOOR_MG: Decimal = dec!(1.3);
const VITAMIN_B6_MG_PER_G_PROTEIN: Decimal = dec!(0.02);

/// Amount or range for a nutrient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NutrientValue {
    Amount(Decimal),
    Range { min: Decimal, max: Decimal },
}

impl fmt::Display for NutrientValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrientValue::Amount(amount) => write!(f, "{}", amount.normalize()),
            NutrientValue::Range { min, max } => {
                write!(f, "{} - {}", min.normalize(), max.normalize())
            }
        }
    }
}

/// Daily target for one nutrient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientTarget {
    pub val: NutrientValue,
    pub unit: String,
}

impl NutrientTarget {
    fn amount(value: Decimal, unit: &str) -> Self {
        Self {
            val: NutrientValue::Amount(value),
            unit: unit.to_string(),
        }
    }

    fn range(min: Decimal, max: Decimal, unit: &str) -> Self {
        Self {
            val: NutrientValue::Range { min, max },
            unit: unit.to_string(),
        }
    }
}

impl fmt::Display for NutrientTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.val, self.unit)
    }
}

/// Daily micronutrient targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroTargets {
    pub magnesium: NutrientTarget,
    pub zinc: NutrientTarget,
    pub iron: NutrientTarget,
    pub vitamin_d: NutrientTarget,
    pub calcium: NutrientTarget,
    pub vitamin_b6: NutrientTarget,
}

impl MicroTargets {
    /// (name, target) pairs in display order
    pub fn entries(&self) -> [(&'static str, &NutrientTarget); 6] {
        [
            ("Magnesium", &self.magnesium),
            ("Zinc", &self.zinc),
            ("Iron", &self.iron),
            ("Vitamin D", &self.vitamin_d),
            ("Calcium", &self.calcium),
            ("Vitamin B6", &self.vitamin_b6),
        ]
    }
}

pub struct MicroCalculator;

impl MicroCalculator {
    /// Micronutrient targets for sex, training load and protein intake
    pub fn compute_micros(
        gender: Gender,
        daily_load: LoadLevel,
        protein_grams: Option<i64>,
    ) -> MicroTargets {
        let is_male = gender == Gender::Male;
        let training_day = matches!(daily_load, LoadLevel::Moderate | LoadLevel::High);

        let magnesium_base = if is_male { dec!(420) } else { dec!(320) };
        let magnesium = if training_day {
            magnesium_base * dec!(1.1)
        } else {
            magnesium_base
        };

        let vitamin_d = if daily_load == LoadLevel::High {
            NutrientTarget::range(dec!(1000), dec!(4000), "IU")
        } else {
            NutrientTarget::range(dec!(600), dec!(2000), "IU")
        };

        let vitamin_b6 = protein_grams
            .filter(|grams| *grams > 0)
            .map(|grams| Decimal::from(grams) * VITAMIN_B6_MG_PER_G_PROTEIN)
            .unwrap_or(VITAMIN_B6_FLOOR_MG)
            .max(VITAMIN_B6_FLOOR_MG);

        MicroTargets {
            magnesium: NutrientTarget::amount(round_places(magnesium, 0), "mg"),
            zinc: NutrientTarget::amount(if is_male { dec!(11) } else { dec!(8) }, "mg"),
            iron: NutrientTarget::amount(if is_male { dec!(8) } else { dec!(18) }, "mg"),
            vitamin_d,
            calcium: NutrientTarget::amount(dec!(1000), "mg"),
            vitamin_b6: NutrientTarget::amount(round_places(vitamin_b6, 1), "mg"),
        }
    }
}
