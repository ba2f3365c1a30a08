//! Input boundary: parse-or-default adapters
//!
//! Everything that reaches the calculation engine is a typed, finite
//! [`Decimal`]. Form values arrive as loosely typed numbers or text; this
//! module turns them into typed values, replacing anything missing, non-finite
//! or out of range with a documented default. Nothing past this boundary has to
//! think about NaN.

use crate::calculator::CalculationRequest;
use crate::error::ValidationError;
use crate::models::{
    clamp_intensity, ActivityLevel, AthleteProfile, BiometricInput, BulkTarget, ExerciseEntry,
    Gender, Goal, DEFAULT_INTENSITY,
};
use anyhow::Context;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Largest magnitude accepted from the outside world
pub const MAX_INPUT_MAGNITUDE: f64 = 1e9;

/// Convert a float to a Decimal if it is finite and in range
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() || value.abs() > MAX_INPUT_MAGNITUDE {
        return None;
    }
    Decimal::from_f64(value)
}

/// Positive value, or `None`
pub fn sanitize_positive(value: Option<f64>) -> Option<Decimal> {
    value
        .and_then(to_decimal)
        .filter(|v| *v > Decimal::ZERO)
}

/// Percentage strictly between 0 and 100, or `None`
pub fn sanitize_percentage(value: Option<f64>) -> Option<Decimal> {
    sanitize_positive(value).filter(|v| *v < Decimal::ONE_HUNDRED)
}

/// Non-negative value, or zero
pub fn sanitize_non_negative(value: Option<f64>) -> Decimal {
    value
        .and_then(to_decimal)
        .filter(|v| *v >= Decimal::ZERO)
        .unwrap_or(Decimal::ZERO)
}

/// Positive value, or the default
pub fn decimal_or(value: Option<f64>, default: Decimal) -> Decimal {
    sanitize_positive(value).unwrap_or(default)
}

/// Parse number text as typed into a form
///
/// Accepts surrounding whitespace and a comma decimal separator. Empty text is
/// treated as missing.
pub fn parse_number(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a key into an enum, keeping the default for missing or unknown keys
pub fn parse_or_default<T>(raw: Option<&str>, default: T, field: &str) -> T
where
    T: FromStr + Display + Copy,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => default,
        Some(key) => key.parse().unwrap_or_else(|_| {
            tracing::warn!(field, key, %default, "Unknown value, using default");
            default
        }),
    }
}

/// Parse a CLI exercise spec: `sport:minutes` or `sport:minutes:intensity`
pub fn parse_exercise_spec(spec: &str) -> Result<ExerciseEntry, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidExerciseSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
    let (sport, minutes, intensity) = match parts.as_slice() {
        [sport, minutes] => (*sport, *minutes, None),
        [sport, minutes, intensity] => (*sport, *minutes, Some(*intensity)),
        _ => return Err(invalid("expected sport:minutes[:intensity]")),
    };

    if sport.is_empty() {
        return Err(invalid("missing sport"));
    }

    let minutes = parse_number(minutes)
        .and_then(to_decimal)
        .filter(|m| *m >= Decimal::ZERO)
        .ok_or_else(|| invalid("duration must be a non-negative number of minutes"))?;

    let intensity = match intensity {
        None => DEFAULT_INTENSITY,
        Some(raw) => parse_number(raw)
            .map(intensity_from_f64)
            .ok_or_else(|| invalid("intensity must be a number from 1 to 10"))?,
    };

    Ok(ExerciseEntry::new(sport, minutes).with_intensity(intensity))
}

fn intensity_from_f64(value: f64) -> u8 {
    clamp_intensity(value.round().clamp(0.0, f64::from(u8::MAX)) as u8)
}

/// How the bulk target is entered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkTargetMode {
    /// Direct kg gain
    #[default]
    Weight,
    /// Target fat-free mass index
    Ffmi,
}

impl std::fmt::Display for BulkTargetMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BulkTargetMode::Weight => write!(f, "weight"),
            BulkTargetMode::Ffmi => write!(f, "ffmi"),
        }
    }
}

impl FromStr for BulkTargetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weight" | "kg" => Ok(BulkTargetMode::Weight),
            "ffmi" => Ok(BulkTargetMode::Ffmi),
            _ => Err(format!("Invalid bulk target type: {}", s)),
        }
    }
}

/// Values used when the form leaves a field empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefaults {
    pub gender: Gender,
    pub age_years: f64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity: ActivityLevel,
    pub goal: Goal,
    pub athlete_profile: AthleteProfile,
    pub target_body_fat_percent: f64,
    pub time_weeks: f64,
    pub target_gain_kg: f64,
    pub bulk_target: BulkTargetMode,
    pub target_ffmi: f64,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            age_years: 25.0,
            weight_kg: 70.0,
            height_cm: 175.0,
            activity: ActivityLevel::Sedentary,
            goal: Goal::Maintain,
            athlete_profile: AthleteProfile::Enthusiast,
            target_body_fat_percent: 12.0,
            time_weeks: 12.0,
            target_gain_kg: 2.0,
            bulk_target: BulkTargetMode::Weight,
            target_ffmi: 22.0,
        }
    }
}

/// One exercise row as entered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawExercise {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub sport: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub intensity: Option<f64>,
}

/// Form snapshot with every field optional
///
/// Numbers may be given either as numbers or as text (`"70"`, `"72,5"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCalculationInput {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub age: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub body_fat: Option<f64>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub exercises: Vec<RawExercise>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default, alias = "profile")]
    pub athlete_profile: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub target_body_fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub target_time_weeks: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub target_gain_kg: Option<f64>,
    #[serde(default)]
    pub bulk_target_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub target_ffmi: Option<f64>,
}

impl From<ExerciseEntry> for RawExercise {
    fn from(entry: ExerciseEntry) -> Self {
        Self {
            id: Some(entry.id),
            sport: Some(entry.sport),
            duration: entry.duration_minutes.to_f64(),
            intensity: Some(f64::from(entry.intensity)),
        }
    }
}

impl RawCalculationInput {
    /// Read a snapshot from a `.json` file, or TOML for any other extension
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content).with_context(|| "Failed to parse JSON input")
        } else {
            toml::from_str(&content).with_context(|| "Failed to parse TOML input")
        }
    }

    /// Overlay another snapshot: any field set in `other` wins
    pub fn merge(mut self, other: RawCalculationInput) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            gender, age, weight, height, body_fat, activity, goal, athlete_profile,
            target_body_fat, target_time_weeks, target_gain_kg, bulk_target_type, target_ffmi
        );
        if !other.exercises.is_empty() {
            self.exercises = other.exercises;
        }
        self
    }

    /// Typed request, with defaults for anything missing or invalid
    pub fn into_request(self, defaults: &InputDefaults) -> CalculationRequest {
        let gender = parse_or_default(self.gender.as_deref(), defaults.gender, "gender");
        let activity_level = parse_or_default(self.activity.as_deref(), defaults.activity, "activity");
        let goal = parse_or_default(self.goal.as_deref(), defaults.goal, "goal");
        let athlete_profile = parse_or_default(
            self.athlete_profile.as_deref(),
            defaults.athlete_profile,
            "athlete_profile",
        );
        let bulk_mode = parse_or_default(
            self.bulk_target_type.as_deref(),
            defaults.bulk_target,
            "bulk_target_type",
        );

        let fallback = |value: f64| to_decimal(value).unwrap_or(Decimal::ZERO);
        let biometrics = BiometricInput {
            gender,
            age_years: decimal_or(self.age, fallback(defaults.age_years)),
            weight_kg: decimal_or(self.weight, fallback(defaults.weight_kg)),
            height_cm: decimal_or(self.height, fallback(defaults.height_cm)),
            body_fat_percent: sanitize_percentage(self.body_fat),
        };

        let exercises = self
            .exercises
            .into_iter()
            .filter_map(|raw| {
                let sport = raw.sport.filter(|s| !s.trim().is_empty())?;
                let mut entry = ExerciseEntry::new(sport.trim(), sanitize_non_negative(raw.duration))
                    .with_intensity(raw.intensity.map(intensity_from_f64).unwrap_or(DEFAULT_INTENSITY));
                if let Some(id) = raw.id {
                    entry.id = id;
                }
                Some(entry)
            })
            .collect();

        let bulk_target = match bulk_mode {
            BulkTargetMode::Weight => BulkTarget::GainKg(decimal_or(
                self.target_gain_kg,
                fallback(defaults.target_gain_kg),
            )),
            BulkTargetMode::Ffmi => {
                BulkTarget::Ffmi(decimal_or(self.target_ffmi, fallback(defaults.target_ffmi)))
            }
        };

        CalculationRequest {
            biometrics,
            activity_level,
            exercises,
            goal,
            athlete_profile,
            target_body_fat_percent: Some(
                sanitize_percentage(self.target_body_fat)
                    .unwrap_or_else(|| fallback(defaults.target_body_fat_percent)),
            ),
            time_weeks: Some(decimal_or(self.target_time_weeks, fallback(defaults.time_weeks))),
            bulk_target,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(n)) if n.is_finite() => Some(n),
        Some(NumberOrText::Text(text)) => parse_number(&text),
        _ => None,
    })
}
