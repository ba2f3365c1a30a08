//! Terminal and JSON rendering of calculation results

use crate::calculator::CalculationResult;
use crate::models::{MetValue, SportDefinition};
use colored::{Color, Colorize};
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct MacroRow {
    #[tabled(rename = "Macro")]
    name: String,
    #[tabled(rename = "Grams")]
    grams: String,
    #[tabled(rename = "g/kg")]
    per_kg: String,
    #[tabled(rename = "% kcal")]
    percent: String,
}

#[derive(Tabled)]
struct ExerciseRow {
    #[tabled(rename = "Exercise")]
    label: String,
    #[tabled(rename = "kcal")]
    kcal: i64,
}

#[derive(Tabled)]
struct MicroRow {
    #[tabled(rename = "Nutrient")]
    name: String,
    #[tabled(rename = "Daily target")]
    target: String,
}

#[derive(Tabled)]
struct SportRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Sport")]
    label: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "MET")]
    met: String,
}

struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Human-readable report
pub fn render_text(result: &CalculationResult, color: bool) -> String {
    let painter = Painter { color };
    let mut out = String::new();

    let _ = writeln!(out, "{}", painter.heading("Daily energy"));
    let _ = writeln!(out, "  BMR            {:>6} kcal  ({})", result.bmr, result.bmr_method);
    if result.exercise_burn > 0 {
        let _ = writeln!(out, "  Exercise burn  {:>6} kcal", result.exercise_burn);
    }
    let _ = writeln!(out, "  TDEE           {:>6} kcal", result.tdee);
    let _ = writeln!(
        out,
        "  Target         {} kcal  ({}, range {} - {})",
        painter.paint(&format!("{:>6}", result.goal_calories), Color::Green),
        result.goal,
        result.calorie_range.min,
        result.calorie_range.max
    );
    let _ = writeln!(out, "  {}", daily_diff_line(result.daily_diff));
    if let Some(ffmi) = result.ffmi {
        let _ = writeln!(out, "  FFMI           {:>6}", ffmi);
    }

    if !result.warnings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", painter.heading("Warnings"));
        for warning in &result.warnings {
            let _ = writeln!(out, "  {}", painter.paint(&format!("! {}", warning.message()), Color::Red));
        }
    }

    let macros = &result.macros;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        painter.heading(&format!(
            "Macronutrients ({} day, {} profile)",
            macros.daily_load, result.athlete_profile
        ))
    );
    let rows = vec![
        MacroRow {
            name: "Protein".to_string(),
            grams: format!("{} g", macros.protein_grams),
            per_kg: macros.grams_per_kg.protein.normalize().to_string(),
            percent: format!("{}%", macros.ratios.protein),
        },
        MacroRow {
            name: "Carbohydrate".to_string(),
            grams: format!("{} g", macros.carb_grams),
            per_kg: macros.grams_per_kg.carbs.normalize().to_string(),
            percent: format!("{}%", macros.ratios.carbs),
        },
        MacroRow {
            name: "Fat".to_string(),
            grams: format!("{} g", macros.fat_grams),
            per_kg: "-".to_string(),
            percent: format!("{}%", macros.ratios.fat),
        },
    ];
    let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));
    if macros.fat_floor_applied {
        let _ = writeln!(
            out,
            "  {}",
            painter.paint("Fat raised to its minimum, carbohydrate reduced to fit.", Color::Yellow)
        );
    }

    if !result.exercise_details.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", painter.heading("Exercise"));
        let rows = result.exercise_details.iter().map(|item| ExerciseRow {
            label: item.label.clone(),
            kcal: item.kcal,
        });
        let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", painter.heading("Micronutrients"));
    let rows = result.micros.entries().into_iter().map(|(name, target)| MicroRow {
        name: name.to_string(),
        target: target.to_string(),
    });
    let _ = write!(out, "{}", Table::new(rows).with(Style::rounded()));

    out
}

/// Pretty JSON report
pub fn render_json(result: &CalculationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Sport catalog listing
pub fn render_sports(sports: &[&SportDefinition]) -> String {
    let rows = sports.iter().map(|sport| SportRow {
        key: sport.key.clone(),
        label: sport.label.clone(),
        category: sport.category.clone(),
        met: met_label(&sport.met),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

fn met_label(met: &MetValue) -> String {
    match met {
        MetValue::Fixed { met } => met.normalize().to_string(),
        MetValue::Ranged { min_met, max_met } => {
            format!("{} - {}", min_met.normalize(), max_met.normalize())
        }
    }
}

fn daily_diff_line(daily_diff: i64) -> String {
    match daily_diff {
        d if d > 0 => format!("Daily surplus  {:>+6} kcal", d),
        d if d < 0 => format!("Daily deficit  {:>+6} kcal", d),
        _ => format!("Daily balance  {:>6} kcal", 0),
    }
}
