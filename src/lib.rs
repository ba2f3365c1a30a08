// Library interface for FuelRS modules
// This allows the CLI, integration tests and benches to share the engine

pub mod bmr;
pub mod calculator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod exercise;
pub mod goal;
pub mod inputs;
pub mod load;
pub mod logging;
pub mod macronutrients;
pub mod micronutrients;
pub mod models;
pub mod report;
pub mod tdee;

// Re-export commonly used types for convenience
pub use models::*;
pub use bmr::{BmrCalculator, BmrEstimate, BmrMethod};
pub use calculator::{CalculationRequest, CalculationResult, CalorieRange, NutritionPlanner};
pub use catalog::{BuiltinCatalog, SportCatalog};
pub use exercise::{ExerciseBurnCalculator, ExerciseBurnSummary};
pub use goal::{GoalOutcome, GoalResolver, GoalWarning};
pub use inputs::{InputDefaults, RawCalculationInput};
pub use load::LoadClassifier;
pub use macronutrients::{MacroAllocator, MacroPlan, MacroRequest};
pub use micronutrients::{MicroCalculator, MicroTargets};
pub use tdee::TdeeCalculator;
pub use error::{FuelRsError, Result, ValidationError};
pub use logging::{LogConfig, LogLevel, LogFormat};
