//! Macronutrient allocation
//!
//! Protein and carbohydrate are prescribed in grams per kg of body weight from
//! a policy matrix keyed by athlete profile, goal and daily load (ISSN / ACSM
//! position stands). Fat takes whatever energy is left, but never drops below
//! 0.6 g/kg: when the remainder is too small, fat is raised to the floor and
//! carbohydrate gives way. Protein is never reduced.

use crate::load::LoadClassifier;
use crate::models::{round_whole, AthleteProfile, ExerciseEntry, Goal, LoadLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Calories assumed when none is supplied
pub const DEFAULT_CALORIES: i64 = 2000;

/// Body weight assumed when none (or a non-positive value) is supplied
pub const DEFAULT_WEIGHT_KG: Decimal = dec!(70);

/// Minimum fat intake for hormonal health, g per kg body weight
pub const MIN_FAT_G_PER_KG: Decimal = dec!(0.6);

pub const KCAL_PER_G_PROTEIN: i64 = 4;
pub const KCAL_PER_G_CARB: i64 = 4;
pub const KCAL_PER_G_FAT: i64 = 9;

/// Protein and carbohydrate prescription in g/kg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GramsPerKg {
    #[serde(rename = "p")]
    pub protein: Decimal,
    #[serde(rename = "c")]
    pub carbs: Decimal,
}

/// Share of calories per macro, in whole percent
///
/// Each share is rounded independently, so the sum may be 99 or 101.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroRatios {
    #[serde(rename = "p")]
    pub protein: i64,
    #[serde(rename = "f")]
    pub fat: i64,
    #[serde(rename = "c")]
    pub carbs: i64,
}

impl MacroRatios {
    pub fn total(&self) -> i64 {
        self.protein + self.fat + self.carbs
    }
}

/// Daily macronutrient targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPlan {
    /// Calories the plan was built for (after fallback)
    pub calories: i64,
    pub protein_grams: i64,
    pub fat_grams: i64,
    pub carb_grams: i64,
    pub ratios: MacroRatios,
    pub daily_load: LoadLevel,
    pub grams_per_kg: GramsPerKg,
    /// True when fat was raised to the 0.6 g/kg floor
    pub fat_floor_applied: bool,
}

/// Inputs to the allocator; every field may be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroRequest {
    pub calories: Option<i64>,
    pub goal: Option<Goal>,
    pub profile: Option<AthleteProfile>,
    pub weight_kg: Option<Decimal>,
    pub exercises: Vec<ExerciseEntry>,
}

impl AthleteProfile {
    /// Protein and carbohydrate prescription for a goal and daily load
    pub fn grams_per_kg(&self, goal: Goal, load: LoadLevel) -> GramsPerKg {
        let (protein, carbs) = match self {
            AthleteProfile::Enthusiast => (dec!(1.5), dec!(3.5)),
            AthleteProfile::StrengthPower => {
                let protein = match goal {
                    Goal::Cut => dec!(2.4),
                    Goal::Maintain | Goal::Bulk => dec!(2.0),
                };
                let carbs = match load {
                    LoadLevel::Rest => dec!(3.0),
                    LoadLevel::Light | LoadLevel::Moderate => dec!(4.5),
                    LoadLevel::High => dec!(5.5),
                };
                (protein, carbs)
            }
            AthleteProfile::MixedTeam => {
                let carbs = match load {
                    LoadLevel::Rest => dec!(2.5),
                    LoadLevel::Light => dec!(4.0),
                    LoadLevel::Moderate => dec!(6.0),
                    LoadLevel::High => dec!(8.0),
                };
                (dec!(1.7), carbs)
            }
            AthleteProfile::Endurance => {
                let carbs = match load {
                    LoadLevel::Rest => dec!(5.0),
                    LoadLevel::Light => dec!(6.0),
                    LoadLevel::Moderate => dec!(7.0),
                    LoadLevel::High => dec!(10.0),
                };
                (dec!(1.4), carbs)
            }
            AthleteProfile::Physique => {
                let carbs = match load {
                    LoadLevel::Rest => dec!(2.0),
                    LoadLevel::Light | LoadLevel::Moderate | LoadLevel::High => dec!(4.0),
                };
                (dec!(2.3), carbs)
            }
        };

        GramsPerKg { protein, carbs }
    }
}

pub struct MacroAllocator;

impl MacroAllocator {
    /// Allocate macros for explicit inputs
    pub fn allocate_macros(
        calories: i64,
        goal: Goal,
        profile: AthleteProfile,
        weight_kg: Decimal,
        exercises: &[ExerciseEntry],
    ) -> MacroPlan {
        Self::allocate(&MacroRequest {
            calories: Some(calories),
            goal: Some(goal),
            profile: Some(profile),
            weight_kg: Some(weight_kg),
            exercises: exercises.to_vec(),
        })
    }

    /// Allocate macros, substituting defaults for missing inputs
    pub fn allocate(request: &MacroRequest) -> MacroPlan {
        let calories = match request.calories {
            Some(value) if value < 0 => {
                tracing::warn!(calories = value, "Negative calories, clamping to zero");
                0
            }
            Some(value) => value,
            None => {
                tracing::warn!(default = DEFAULT_CALORIES, "Missing calories, using default");
                DEFAULT_CALORIES
            }
        };
        let weight = match request.weight_kg {
            Some(value) if value > Decimal::ZERO => value,
            _ => {
                tracing::warn!(weight = ?request.weight_kg, "Invalid weight, using default");
                DEFAULT_WEIGHT_KG
            }
        };
        let goal = request.goal.unwrap_or_default();
        let profile = request.profile.unwrap_or_default();

        let daily_load = LoadClassifier::classify(&request.exercises);
        let grams_per_kg = profile.grams_per_kg(goal, daily_load);

        let protein_grams = round_whole(grams_per_kg.protein * weight);
        let protein_kcal = protein_grams * KCAL_PER_G_PROTEIN;

        let mut carb_grams = round_whole(grams_per_kg.carbs * weight);
        let mut carb_kcal = carb_grams * KCAL_PER_G_CARB;

        // Fat balances whatever is left
        let mut fat_kcal = calories - protein_kcal - carb_kcal;
        let mut fat_grams = round_whole(Decimal::from(fat_kcal) / Decimal::from(KCAL_PER_G_FAT)).max(0);

        let min_fat_grams = round_whole(MIN_FAT_G_PER_KG * weight);
        let fat_floor_applied = fat_grams < min_fat_grams;
        if fat_floor_applied {
            fat_grams = min_fat_grams;
            fat_kcal = fat_grams * KCAL_PER_G_FAT;

            let remaining = calories - protein_kcal - fat_kcal;
            carb_grams = round_whole(Decimal::from(remaining) / Decimal::from(KCAL_PER_G_CARB)).max(0);
            carb_kcal = carb_grams * KCAL_PER_G_CARB;

            tracing::warn!(
                calories,
                fat_grams,
                carb_grams,
                "Fat raised to hormonal floor, carbohydrate reduced"
            );
        }

        let ratios = MacroRatios {
            protein: percent_of(protein_kcal, calories),
            fat: percent_of(fat_kcal.max(0), calories),
            carbs: percent_of(carb_kcal, calories),
        };

        tracing::debug!(
            %profile,
            %goal,
            %daily_load,
            protein_grams,
            fat_grams,
            carb_grams,
            "Macros allocated"
        );

        MacroPlan {
            calories,
            protein_grams,
            fat_grams,
            carb_grams,
            ratios,
            daily_load,
            grams_per_kg,
            fat_floor_applied,
        }
    }
}

fn percent_of(kcal: i64, calories: i64) -> i64 {
    if calories <= 0 {
        return 0;
    }
    round_whole(Decimal::from(kcal) * dec!(100) / Decimal::from(calories))
}
