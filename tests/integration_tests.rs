use fuelrs::{
    ActivityLevel, AthleteProfile, BiometricInput, BmrMethod, BuiltinCatalog, BulkTarget,
    CalculationRequest, ExerciseEntry, FuelRsError, Gender, Goal, GoalParameters, GoalResolver,
    GoalWarning, InputDefaults, LoadLevel, MacroAllocator, MacroRequest, NutritionPlanner,
    RawCalculationInput, ValidationError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Integration tests that run the complete calculation pipeline

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn session(sport: &str, minutes: i64) -> ExerciseEntry {
        ExerciseEntry::new(sport, Decimal::from(minutes))
    }

    /// Team sport game day: over 90 minutes is a high load day
    #[test]
    fn test_team_sport_game_day() {
        let plan = MacroAllocator::allocate_macros(
            3000,
            Goal::Maintain,
            AthleteProfile::MixedTeam,
            dec!(80),
            &[session("basketball_5v5", 95)],
        );

        assert_eq!(plan.daily_load, LoadLevel::High);
        assert_eq!(plan.grams_per_kg.carbs, dec!(8.0));
        assert_eq!(plan.grams_per_kg.protein, dec!(1.7));
    }

    #[test]
    fn test_strength_cut_protein() {
        let plan = MacroAllocator::allocate_macros(
            2500,
            Goal::Cut,
            AthleteProfile::StrengthPower,
            dec!(90),
            &[session("weight_training_traditional", 60)],
        );

        assert_eq!(plan.grams_per_kg.protein, dec!(2.4));
    }

    #[test]
    fn test_endurance_long_run_carbs() {
        let plan = MacroAllocator::allocate_macros(
            2000,
            Goal::Maintain,
            AthleteProfile::Endurance,
            dec!(60),
            &[session("jogging", 125)],
        );

        assert_eq!(plan.daily_load, LoadLevel::High);
        assert_eq!(plan.grams_per_kg.carbs, dec!(10.0));
        assert!(plan.fat_grams >= 36);
    }

    #[test]
    fn test_cut_without_tdee_uses_fallbacks() {
        let outcome = GoalResolver::resolve(None, Goal::Cut, &GoalParameters::default());

        assert!(outcome.calories > 0);
        assert_eq!(outcome.calories, 1500);
        assert_eq!(outcome.daily_diff, outcome.calories - outcome.normalized_tdee);
        assert!(outcome.used_fallback);
    }

    #[test]
    fn test_low_calorie_cut_keeps_fat_floor() {
        let plan = MacroAllocator::allocate_macros(
            1500,
            Goal::Cut,
            AthleteProfile::Enthusiast,
            dec!(80),
            &[],
        );

        assert!(plan.fat_grams >= 48);
        assert!(plan.carb_grams >= 0);
    }

    #[test]
    fn test_allocator_with_nothing_known() {
        let plan = MacroAllocator::allocate(&MacroRequest::default());

        assert_eq!(plan.calories, 2000);
        assert_eq!(plan.daily_load, LoadLevel::Rest);
        assert!(plan.protein_grams > 0);
        assert!(plan.fat_grams >= 42);
    }

    /// Lean-mass cut: Katch-McArdle BMR, deficit from the body fat target
    #[test]
    fn test_planned_cut_pipeline() {
        let catalog = BuiltinCatalog::default();
        let request = CalculationRequest::new(
            BiometricInput::new(Gender::Male, dec!(35), dec!(90), dec!(182)).with_body_fat(dec!(20)),
        )
        .with_activity(ActivityLevel::Moderate)
        .with_goal(Goal::Cut)
        .with_profile(AthleteProfile::StrengthPower)
        .with_cut_target(dec!(15), dec!(12));

        let result = NutritionPlanner::new(&catalog).plan(&request).unwrap();

        // 370 + 21.6 × 72
        assert_eq!(result.bmr, 1925);
        assert_eq!(result.bmr_method, BmrMethod::KatchMcArdle);
        assert_eq!(result.tdee, 2984);
        // 5.294 kg over 84 days at 7700 kcal/kg
        assert_eq!(result.goal_calories, 2499);
        assert_eq!(result.daily_diff, -485);
        assert_eq!(result.daily_diff, result.goal_calories - result.tdee);
        assert!(result.warnings.is_empty());
        assert_eq!(result.macros.daily_load, LoadLevel::Rest);
        assert_eq!(result.macros.protein_grams, 216);
    }

    #[test]
    fn test_aggressive_cut_warnings() {
        let catalog = BuiltinCatalog::default();
        let request = CalculationRequest::new(
            BiometricInput::new(Gender::Male, dec!(35), dec!(90), dec!(182)).with_body_fat(dec!(25)),
        )
        .with_goal(Goal::Cut)
        .with_cut_target(dec!(10), dec!(4));

        let result = NutritionPlanner::new(&catalog).plan(&request).unwrap();

        assert_eq!(
            result.warnings,
            vec![GoalWarning::HighDeficit, GoalWarning::VeryLowCalorie]
        );
        assert_eq!(result.warning, Some(GoalWarning::VeryLowCalorie));
        assert!(result.goal_calories >= 0);
        assert_eq!(result.daily_diff, result.goal_calories - result.tdee);
    }

    #[test]
    fn test_fast_bulk_warning() {
        let catalog = BuiltinCatalog::default();
        let request = CalculationRequest::new(BiometricInput::new(
            Gender::Male,
            dec!(22),
            dec!(70),
            dec!(178),
        ))
        .with_goal(Goal::Bulk)
        .with_bulk_target(BulkTarget::GainKg(dec!(6)), dec!(8));

        let result = NutritionPlanner::new(&catalog).plan(&request).unwrap();

        // 6 × 7700 / 56
        assert_eq!(result.daily_diff, 825);
        assert_eq!(result.warning, Some(GoalWarning::HighSurplus));
    }

    #[test]
    fn test_ffmi_bulk_without_body_fat_is_refused() {
        let raw: RawCalculationInput = serde_json::from_str(
            r#"{"goal": "bulk", "bulk_target_type": "ffmi", "target_ffmi": 23}"#,
        )
        .unwrap();
        let request = raw.into_request(&InputDefaults::default());

        let catalog = BuiltinCatalog::default();
        let err = NutritionPlanner::new(&catalog).plan(&request).unwrap_err();

        assert!(matches!(
            err,
            FuelRsError::Validation(ValidationError::BodyFatRequiredForFfmi)
        ));
        assert!(err.user_message().contains("body fat"));
    }

    /// A cut too large for the TDEE clamps to zero and the macros follow it
    #[test]
    fn test_oversized_cut_allocates_against_zero() {
        let catalog = BuiltinCatalog::default();
        let request = CalculationRequest::new(
            BiometricInput::new(Gender::Female, dec!(40), dec!(100), dec!(170)).with_body_fat(dec!(40)),
        )
        .with_goal(Goal::Cut)
        .with_cut_target(dec!(10), dec!(2));

        let result = NutritionPlanner::new(&catalog).plan(&request).unwrap();

        assert_eq!(result.goal_calories, 0);
        assert_eq!(result.macros.calories, result.goal_calories);
        assert_eq!(result.macros.carb_grams, 0);
        assert_eq!(result.macros.fat_grams, 60);
        assert_eq!(result.macros.ratios.total(), 0);
        assert_eq!(result.daily_diff, -result.tdee);
    }

    /// Body fat of 100% or more is treated as not entered
    #[test]
    fn test_out_of_range_body_fat_pipeline() {
        let catalog = BuiltinCatalog::default();
        let planner = NutritionPlanner::new(&catalog);

        for body_fat in ["150", "100"] {
            let json = format!(
                r#"{{"weight": 80, "height": 180, "age": 30, "body_fat": {body_fat}}}"#
            );
            let raw: RawCalculationInput = serde_json::from_str(&json).unwrap();
            let request = raw.into_request(&InputDefaults::default());
            let result = planner.plan(&request).unwrap();

            assert_eq!(result.bmr_method, BmrMethod::MifflinStJeor);
            assert_eq!(result.bmr, 1780);
            assert_eq!(result.tdee, 2136);
            assert_eq!(result.goal_calories, result.tdee);
            assert_eq!(result.daily_diff, result.goal_calories - result.tdee);
            assert!(result.ffmi.is_none());
        }
    }

    /// Form snapshot with gaps and junk still yields a complete plan
    #[test]
    fn test_form_snapshot_pipeline() {
        let raw: RawCalculationInput = serde_json::from_str(
            r#"{
                "gender": "female",
                "age": "28",
                "weight": "55",
                "height": "162",
                "body_fat": "",
                "activity": "light",
                "exercises": [
                    {"type": "yoga", "duration": "30"},
                    {"type": "not_a_sport", "duration": "30"}
                ],
                "goal": "sideways",
                "athlete_profile": "physique"
            }"#,
        )
        .unwrap();
        let request = raw.into_request(&InputDefaults::default());
        assert_eq!(request.goal, Goal::Maintain);

        let catalog = BuiltinCatalog::default();
        let result = NutritionPlanner::new(&catalog).plan(&request).unwrap();

        // 550 + 1012.5 − 140 − 161 = 1261.5
        assert_eq!(result.bmr, 1262);
        assert_eq!(result.exercise_details.len(), 1);
        assert!(result.exercise_burn > 0);
        // Logged burn forces the sedentary multiplier
        assert_eq!(result.tdee, 1514 + result.exercise_burn);
        assert_eq!(result.daily_diff, 0);
        // Unknown sports still count toward the load, so the day is not a rest day
        assert_eq!(result.macros.daily_load, LoadLevel::Moderate);
        assert_eq!(result.macros.grams_per_kg.carbs, dec!(4.0));
    }

    #[test]
    fn test_json_round_trip_of_result() {
        let catalog = BuiltinCatalog::default();
        let request = CalculationRequest::new(BiometricInput::new(
            Gender::Male,
            dec!(30),
            dec!(75),
            dec!(180),
        ))
        .with_exercise(session("jogging", 40));

        let result = NutritionPlanner::new(&catalog).plan(&request).unwrap();
        let json = fuelrs::report::render_json(&result).unwrap();
        let back: fuelrs::CalculationResult = serde_json::from_str(&json).unwrap();

        assert_eq!(back, result);
    }
}
