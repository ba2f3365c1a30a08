//! Exercise energy expenditure
//!
//! Uses the standard MET energy equation:
//! kcal = MET × 3.5 × weight_kg / 200 × minutes

use crate::catalog::SportCatalog;
use crate::models::{round_whole, ExerciseEntry, SportDefinition};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Burn for one logged exercise, for itemized display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseBurnItem {
    pub entry_id: String,
    pub sport: String,
    pub label: String,
    pub kcal: i64,
}

/// Total and itemized exercise burn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseBurnSummary {
    pub total_kcal: i64,
    pub items: Vec<ExerciseBurnItem>,
}

pub struct ExerciseBurnCalculator;

impl ExerciseBurnCalculator {
    /// Energy burned by one exercise, in whole kcal
    pub fn compute_burn(
        weight_kg: Decimal,
        sport: &SportDefinition,
        duration_minutes: Decimal,
        intensity: u8,
    ) -> i64 {
        let met = sport.effective_met(intensity);
        round_whole(met * dec!(3.5) * weight_kg / dec!(200) * duration_minutes)
    }

    /// Sum the burn of every resolvable exercise
    ///
    /// Entries whose sport is not in the catalog, or whose duration is not
    /// positive, contribute nothing and are left out of the itemized list.
    pub fn aggregate(
        weight_kg: Decimal,
        exercises: &[ExerciseEntry],
        catalog: &dyn SportCatalog,
    ) -> ExerciseBurnSummary {
        let mut summary = ExerciseBurnSummary::default();

        for entry in exercises {
            if entry.duration_minutes <= Decimal::ZERO {
                tracing::debug!(sport = %entry.sport, "Skipping exercise without duration");
                continue;
            }

            let Some(sport) = catalog.resolve(&entry.sport) else {
                tracing::warn!(sport = %entry.sport, "Unknown sport, exercise ignored");
                continue;
            };

            let kcal = Self::compute_burn(weight_kg, sport, entry.duration_minutes, entry.intensity);
            summary.total_kcal += kcal;
            summary.items.push(ExerciseBurnItem {
                entry_id: entry.id.clone(),
                sport: sport.key.clone(),
                label: sport.label.clone(),
                kcal,
            });
        }

        tracing::debug!(
            total_kcal = summary.total_kcal,
            items = summary.items.len(),
            "Exercise burn aggregated"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuiltinCatalog;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_met_burn() {
        let hiking = SportDefinition::fixed("hiking", "Hiking", "outdoor", dec!(6.5));
        // 6.5 × 3.5 × 70 / 200 × 60 = 477.75
        let kcal = ExerciseBurnCalculator::compute_burn(dec!(70), &hiking, dec!(60), 5);
        assert_eq!(kcal, 478);
    }

    #[test]
    fn test_ranged_met_burn_scales_with_intensity() {
        let jogging = SportDefinition::ranged("jogging", "Jogging", "outdoor", dec!(6.5), dec!(11.0));

        let easy = ExerciseBurnCalculator::compute_burn(dec!(70), &jogging, dec!(30), 1);
        let hard = ExerciseBurnCalculator::compute_burn(dec!(70), &jogging, dec!(30), 10);

        // 6.5 × 3.5 × 70 / 200 × 30 = 238.875, 11 × 3.5 × 70 / 200 × 30 = 404.25
        assert_eq!(easy, 239);
        assert_eq!(hard, 404);
    }

    #[test]
    fn test_aggregate_skips_unknown_and_empty() {
        let catalog = BuiltinCatalog::default();
        let exercises = vec![
            ExerciseEntry::new("hiking", dec!(60)),
            ExerciseEntry::new("quidditch", dec!(60)),
            ExerciseEntry::new("yoga", dec!(0)),
            ExerciseEntry::new("yoga", dec!(30)),
        ];

        let summary = ExerciseBurnCalculator::aggregate(dec!(70), &exercises, &catalog);

        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.items[0].sport, "hiking");
        assert_eq!(summary.items[1].sport, "yoga");
        assert_eq!(
            summary.total_kcal,
            summary.items.iter().map(|item| item.kcal).sum::<i64>()
        );
    }

    #[test]
    fn test_empty_exercise_list() {
        let catalog = BuiltinCatalog::default();
        let summary = ExerciseBurnCalculator::aggregate(dec!(70), &[], &catalog);
        assert_eq!(summary, ExerciseBurnSummary::default());
    }

    proptest! {
        #[test]
        fn test_total_is_sum_of_items(
            weight in 40u32..150,
            sessions in proptest::collection::vec((0usize..4, 0u32..180, 1u8..=10), 0..8),
        ) {
            let catalog = BuiltinCatalog::default();
            let sports = ["jogging", "crossfit", "yoga", "quidditch"];
            let exercises: Vec<ExerciseEntry> = sessions
                .iter()
                .map(|(sport, minutes, intensity)| {
                    ExerciseEntry::new(sports[*sport], Decimal::from(*minutes)).with_intensity(*intensity)
                })
                .collect();

            let summary = ExerciseBurnCalculator::aggregate(Decimal::from(weight), &exercises, &catalog);

            prop_assert_eq!(summary.total_kcal, summary.items.iter().map(|item| item.kcal).sum::<i64>());
            prop_assert!(summary.total_kcal >= 0);
            prop_assert!(summary.items.iter().all(|item| item.sport != "quidditch"));
        }
    }
}
