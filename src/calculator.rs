//! End-to-end nutrition planning pipeline
//!
//! Runs the five stages in order: BMR, exercise burn, TDEE, goal calories,
//! then macro and micronutrient allocation. Each stage only consumes typed
//! outputs of the stages before it.

use crate::bmr::{BmrCalculator, BmrMethod};
use crate::catalog::SportCatalog;
use crate::error::{FuelRsError, ValidationError};
use crate::exercise::{ExerciseBurnCalculator, ExerciseBurnItem};
use crate::goal::{GoalResolver, GoalWarning};
use crate::macronutrients::{MacroAllocator, MacroPlan};
use crate::micronutrients::{MicroCalculator, MicroTargets};
use crate::models::{
    round_whole, ActivityLevel, AthleteProfile, BiometricInput, BulkTarget, ExerciseEntry, Goal,
    GoalParameters,
};
use crate::tdee::TdeeCalculator;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Everything needed for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub biometrics: BiometricInput,
    pub activity_level: ActivityLevel,
    pub exercises: Vec<ExerciseEntry>,
    pub goal: Goal,
    pub athlete_profile: AthleteProfile,
    /// Cut target
    pub target_body_fat_percent: Option<Decimal>,
    /// Time frame for cut and bulk
    pub time_weeks: Option<Decimal>,
    pub bulk_target: BulkTarget,
}

impl CalculationRequest {
    pub fn new(biometrics: BiometricInput) -> Self {
        Self {
            biometrics,
            activity_level: ActivityLevel::default(),
            exercises: Vec::new(),
            goal: Goal::default(),
            athlete_profile: AthleteProfile::default(),
            target_body_fat_percent: None,
            time_weeks: None,
            bulk_target: BulkTarget::GainKg(Decimal::ZERO),
        }
    }

    pub fn with_activity(mut self, activity_level: ActivityLevel) -> Self {
        self.activity_level = activity_level;
        self
    }

    pub fn with_exercise(mut self, entry: ExerciseEntry) -> Self {
        self.exercises.push(entry);
        self
    }

    pub fn with_goal(mut self, goal: Goal) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_profile(mut self, athlete_profile: AthleteProfile) -> Self {
        self.athlete_profile = athlete_profile;
        self
    }

    pub fn with_cut_target(mut self, target_body_fat_percent: Decimal, time_weeks: Decimal) -> Self {
        self.target_body_fat_percent = Some(target_body_fat_percent);
        self.time_weeks = Some(time_weeks);
        self
    }

    pub fn with_bulk_target(mut self, bulk_target: BulkTarget, time_weeks: Decimal) -> Self {
        self.bulk_target = bulk_target;
        self.time_weeks = Some(time_weeks);
        self
    }
}

/// Suggested daily calorie window around the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieRange {
    pub min: i64,
    pub max: i64,
}

impl CalorieRange {
    pub fn around(calories: i64) -> Self {
        let calories = Decimal::from(calories);
        Self {
            min: round_whole(calories * dec!(0.95)),
            max: round_whole(calories * dec!(1.05)),
        }
    }
}

/// Full plan for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub bmr: i64,
    pub bmr_method: BmrMethod,
    pub tdee: i64,
    pub exercise_burn: i64,
    pub exercise_details: Vec<ExerciseBurnItem>,
    pub goal: Goal,
    pub athlete_profile: AthleteProfile,
    pub goal_calories: i64,
    pub daily_diff: i64,
    pub calorie_range: CalorieRange,
    /// Most relevant goal warning (the last one raised)
    pub warning: Option<GoalWarning>,
    pub warnings: Vec<GoalWarning>,
    pub macros: MacroPlan,
    pub micros: MicroTargets,
    /// Current fat-free mass index, when body fat is known
    pub ffmi: Option<Decimal>,
}

/// Runs the calculation stages against a sport catalog
pub struct NutritionPlanner<'a> {
    catalog: &'a dyn SportCatalog,
}

impl<'a> NutritionPlanner<'a> {
    pub fn new(catalog: &'a dyn SportCatalog) -> Self {
        Self { catalog }
    }

    /// Produce a plan, or a validation error for an unusable bulk target
    pub fn plan(&self, request: &CalculationRequest) -> Result<CalculationResult, FuelRsError> {
        let biometrics = &request.biometrics;

        // Must fail before any stage runs
        let target_gain_kg = Self::bulk_gain(request)?;

        let bmr = BmrCalculator::estimate(biometrics);
        let burn = ExerciseBurnCalculator::aggregate(
            biometrics.weight_kg,
            &request.exercises,
            self.catalog,
        );
        let tdee = TdeeCalculator::compute_tdee(bmr.bmr, request.activity_level, burn.total_kcal);

        let params = GoalParameters {
            current_weight_kg: Some(biometrics.weight_kg),
            current_body_fat_percent: biometrics.usable_body_fat(),
            target_body_fat_percent: request.target_body_fat_percent,
            time_weeks: request.time_weeks,
            target_gain_kg,
        };
        let outcome = GoalResolver::resolve(Some(tdee), request.goal, &params);

        let macros = MacroAllocator::allocate_macros(
            outcome.calories,
            request.goal,
            request.athlete_profile,
            biometrics.weight_kg,
            &request.exercises,
        );
        let micros = MicroCalculator::compute_micros(
            biometrics.gender,
            macros.daily_load,
            Some(macros.protein_grams),
        );

        tracing::info!(
            bmr = bmr.bmr,
            tdee,
            goal = %request.goal,
            calories = outcome.calories,
            daily_load = %macros.daily_load,
            "Nutrition plan calculated"
        );

        Ok(CalculationResult {
            bmr: bmr.bmr,
            bmr_method: bmr.method,
            tdee,
            exercise_burn: burn.total_kcal,
            exercise_details: burn.items,
            goal: request.goal,
            athlete_profile: request.athlete_profile,
            goal_calories: outcome.calories,
            daily_diff: outcome.daily_diff,
            calorie_range: CalorieRange::around(outcome.calories),
            warning: outcome.warning(),
            warnings: outcome.warnings,
            macros,
            micros,
            ffmi: GoalResolver::fat_free_mass_index(biometrics),
        })
    }

    fn bulk_gain(request: &CalculationRequest) -> Result<Option<Decimal>, ValidationError> {
        if request.goal != Goal::Bulk {
            return Ok(None);
        }

        GoalResolver::resolve_bulk_gain(request.bulk_target, &request.biometrics)
            .map(Some)
            .inspect_err(|_| {
                tracing::warn!("FFMI bulk target requested without body fat, calculation refused");
            })
    }
}
