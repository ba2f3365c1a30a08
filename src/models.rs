use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest intensity on the 1-10 exertion scale
pub const MIN_INTENSITY: u8 = 1;

/// Highest intensity on the 1-10 exertion scale
pub const MAX_INTENSITY: u8 = 10;

/// Intensity assumed when the user does not pick one
pub const DEFAULT_INTENSITY: u8 = 5;

/// Biological sex used by the BMR and micronutrient tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// Body-composition goal driving the calorie target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    Maintain,
    Cut,
    Bulk,
}

/// Athlete training profile selecting the protein/carb policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AthleteProfile {
    /// General sports enthusiast training for health
    #[default]
    Enthusiast,
    /// Strength and power athletes (lifting, throwing, sprinting)
    StrengthPower,
    /// Stop-and-go team sports
    MixedTeam,
    /// Endurance athletes (running, cycling, triathlon)
    Endurance,
    /// Physique and aesthetic sports
    Physique,
}

/// General activity level outside of logged exercise
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    /// Office job, little exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Heavy exercise 6-7 days/week
    Active,
    /// Physical job or training twice a day
    VeryActive,
}

/// Coarse classification of a day's training volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadLevel {
    Rest,
    Light,
    Moderate,
    High,
}

/// Body metrics for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricInput {
    pub gender: Gender,

    /// Age in years
    pub age_years: Decimal,

    /// Body weight in kilograms
    pub weight_kg: Decimal,

    /// Height in centimeters
    pub height_cm: Decimal,

    /// Body fat percentage (0-100), when known
    pub body_fat_percent: Option<Decimal>,
}

impl BiometricInput {
    pub fn new(gender: Gender, age_years: Decimal, weight_kg: Decimal, height_cm: Decimal) -> Self {
        Self {
            gender,
            age_years,
            weight_kg,
            height_cm,
            body_fat_percent: None,
        }
    }

    pub fn with_body_fat(mut self, body_fat_percent: Decimal) -> Self {
        self.body_fat_percent = Some(body_fat_percent);
        self
    }

    /// Body fat percentage if it is usable for lean-mass formulas
    pub fn usable_body_fat(&self) -> Option<Decimal> {
        self.body_fat_percent
            .filter(|bf| *bf > Decimal::ZERO && *bf < dec!(100))
    }

    /// Lean (fat-free) mass in kg, when body fat is known
    pub fn lean_mass_kg(&self) -> Option<Decimal> {
        self.usable_body_fat()
            .map(|bf| lean_mass(self.weight_kg, bf))
    }
}

/// Lean mass for a weight and body fat percentage
pub fn lean_mass(weight_kg: Decimal, body_fat_percent: Decimal) -> Decimal {
    weight_kg * (Decimal::ONE - body_fat_percent / dec!(100))
}

/// One logged exercise session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    /// Entry identifier (stable within a session)
    pub id: String,

    /// Sport key resolved through the sport catalog
    pub sport: String,

    /// Duration in minutes (never negative)
    pub duration_minutes: Decimal,

    /// Perceived intensity 1-10, used by ranged sports only
    pub intensity: u8,
}

impl ExerciseEntry {
    pub fn new(sport: impl Into<String>, duration_minutes: Decimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sport: sport.into(),
            duration_minutes: duration_minutes.max(Decimal::ZERO),
            intensity: DEFAULT_INTENSITY,
        }
    }

    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = clamp_intensity(intensity);
        self
    }
}

/// Clamp an intensity onto the 1-10 scale
pub fn clamp_intensity(intensity: u8) -> u8 {
    intensity.clamp(MIN_INTENSITY, MAX_INTENSITY)
}

/// Metabolic equivalent of a sport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetValue {
    /// Single MET regardless of effort
    Fixed { met: Decimal },
    /// MET range scaled linearly by intensity 1-10
    Ranged { min_met: Decimal, max_met: Decimal },
}

/// A catalog activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportDefinition {
    pub key: String,
    pub label: String,
    pub category: String,
    pub met: MetValue,
}

impl SportDefinition {
    pub fn fixed(key: &str, label: &str, category: &str, met: Decimal) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            category: category.to_string(),
            met: MetValue::Fixed { met },
        }
    }

    pub fn ranged(key: &str, label: &str, category: &str, min_met: Decimal, max_met: Decimal) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            category: category.to_string(),
            met: MetValue::Ranged { min_met, max_met },
        }
    }

    pub fn has_intensity(&self) -> bool {
        matches!(self.met, MetValue::Ranged { .. })
    }

    /// Effective MET for an intensity
    ///
    /// Ranged sports interpolate linearly: intensity 1 maps to `min_met`,
    /// intensity 10 to `max_met`. Intensity is clamped to 1-10 first.
    pub fn effective_met(&self, intensity: u8) -> Decimal {
        match self.met {
            MetValue::Fixed { met } => met,
            MetValue::Ranged { min_met, max_met } => {
                let step = Decimal::from(clamp_intensity(intensity) - MIN_INTENSITY);
                let progress = step / Decimal::from(MAX_INTENSITY - MIN_INTENSITY);
                min_met + progress * (max_met - min_met)
            }
        }
    }
}

/// Goal-specific targets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalParameters {
    pub current_weight_kg: Option<Decimal>,
    pub current_body_fat_percent: Option<Decimal>,
    pub target_body_fat_percent: Option<Decimal>,
    pub time_weeks: Option<Decimal>,
    pub target_gain_kg: Option<Decimal>,
}

/// How a bulk target is expressed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum BulkTarget {
    /// Direct weight gain in kg
    GainKg(Decimal),
    /// Target fat-free mass index
    Ffmi(Decimal),
}

/// Round to `dp` decimal places, halves away from zero
pub fn round_places(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to a whole number, halves away from zero
pub fn round_whole(value: Decimal) -> i64 {
    round_places(value, 0).to_i64().unwrap_or(0)
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Maintain => write!(f, "maintain"),
            Goal::Cut => write!(f, "cut"),
            Goal::Bulk => write!(f, "bulk"),
        }
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "maintain" | "maintenance" => Ok(Goal::Maintain),
            "cut" => Ok(Goal::Cut),
            "bulk" => Ok(Goal::Bulk),
            _ => Err(format!("Invalid goal: {}", s)),
        }
    }
}

impl fmt::Display for AthleteProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AthleteProfile::Enthusiast => "enthusiast",
            AthleteProfile::StrengthPower => "strength_power",
            AthleteProfile::MixedTeam => "mixed_team",
            AthleteProfile::Endurance => "endurance",
            AthleteProfile::Physique => "physique",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for AthleteProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "enthusiast" => Ok(AthleteProfile::Enthusiast),
            "strength_power" | "strength" => Ok(AthleteProfile::StrengthPower),
            "mixed_team" | "team" => Ok(AthleteProfile::MixedTeam),
            "endurance" => Ok(AthleteProfile::Endurance),
            "physique" => Ok(AthleteProfile::Physique),
            _ => Err(format!("Invalid athlete profile: {}", s)),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "veryActive",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "veryactive" => Ok(ActivityLevel::VeryActive),
            _ => Err(format!("Invalid activity level: {}", s)),
        }
    }
}

impl fmt::Display for LoadLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadLevel::Rest => "rest",
            LoadLevel::Light => "light",
            LoadLevel::Moderate => "moderate",
            LoadLevel::High => "high",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("cut".parse::<Goal>().unwrap(), Goal::Cut);
        assert_eq!("mixed-team".parse::<AthleteProfile>().unwrap(), AthleteProfile::MixedTeam);
        assert_eq!("veryActive".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("very_active".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert!("couch".parse::<ActivityLevel>().is_err());
    }

    #[test]
    fn test_enum_serialization_keys() {
        assert_eq!(serde_json::to_string(&AthleteProfile::StrengthPower).unwrap(), "\"strength_power\"");
        assert_eq!(serde_json::to_string(&ActivityLevel::VeryActive).unwrap(), "\"veryActive\"");
        assert_eq!(serde_json::to_string(&LoadLevel::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_ranged_met_interpolation() {
        let jogging = SportDefinition::ranged("jogging", "Jogging", "running", dec!(6.5), dec!(11.0));

        assert_eq!(jogging.effective_met(1), dec!(6.5));
        assert_eq!(jogging.effective_met(10), dec!(11.0));
        // Out-of-scale intensities clamp to the ends of the range
        assert_eq!(jogging.effective_met(0), dec!(6.5));
        assert_eq!(jogging.effective_met(42), dec!(11.0));

        let mid = jogging.effective_met(5);
        assert!(mid > dec!(8.49) && mid < dec!(8.51));
    }

    #[test]
    fn test_fixed_met_ignores_intensity() {
        let yoga = SportDefinition::fixed("yoga", "Yoga", "light", dec!(2.5));
        assert!(!yoga.has_intensity());
        assert_eq!(yoga.effective_met(1), dec!(2.5));
        assert_eq!(yoga.effective_met(10), dec!(2.5));
    }

    #[test]
    fn test_lean_mass() {
        let input = BiometricInput::new(Gender::Male, dec!(30), dec!(80), dec!(180))
            .with_body_fat(dec!(20));
        assert_eq!(input.lean_mass_kg(), Some(dec!(64)));

        let unknown = BiometricInput::new(Gender::Male, dec!(30), dec!(80), dec!(180));
        assert_eq!(unknown.lean_mass_kg(), None);
    }

    #[test]
    fn test_exercise_entry_clamps() {
        let entry = ExerciseEntry::new("soccer", dec!(-10)).with_intensity(15);
        assert_eq!(entry.duration_minutes, Decimal::ZERO);
        assert_eq!(entry.intensity, MAX_INTENSITY);
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_round_whole_midpoint() {
        assert_eq!(round_whole(dec!(2.5)), 3);
        assert_eq!(round_whole(dec!(-2.5)), -3);
        assert_eq!(round_whole(dec!(47.4)), 47);
    }

    #[test]
    fn test_round_places_midpoint() {
        assert_eq!(round_places(dec!(20.25), 1), dec!(20.3));
        assert_eq!(round_places(dec!(20.35), 1), dec!(20.4));
        assert_eq!(round_places(dec!(-1.25), 1), dec!(-1.3));
        assert_eq!(round_places(dec!(352.5), 0), dec!(353));
    }
}
