use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fuelrs::catalog::SportCatalog;
use fuelrs::config::{AppConfig, OutputFormat};
use fuelrs::inputs::{parse_exercise_spec, RawCalculationInput, RawExercise};
use fuelrs::logging::init_logging;
use fuelrs::report::{render_json, render_sports, render_text};
use fuelrs::{FuelRsError, NutritionPlanner};

/// FuelRS - Calorie and Macro Planning CLI
///
/// Estimates daily energy needs from body metrics and logged exercise, sets a
/// calorie target for maintaining, cutting or bulking, and splits it into
/// macro and micronutrient targets.
#[derive(Parser)]
#[command(name = "fuelrs")]
#[command(author = "FuelRS Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Calorie and Macro Planning CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate calories, macros and micronutrients for a day
    Calculate(CalculateArgs),

    /// List the sports known to the calculator
    Sports {
        /// Filter by key, name or category
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show or create the configuration file
    Config {
        /// Print the active configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default configuration file
        #[arg(short, long)]
        init: bool,
    },
}

#[derive(clap::Args)]
struct CalculateArgs {
    /// Read inputs from a TOML or JSON file (flags override file values)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// male or female
    #[arg(long)]
    gender: Option<String>,

    /// Age in years
    #[arg(long)]
    age: Option<String>,

    /// Body weight in kg
    #[arg(short, long)]
    weight: Option<String>,

    /// Height in cm
    #[arg(long)]
    height: Option<String>,

    /// Body fat percentage
    #[arg(long)]
    body_fat: Option<String>,

    /// sedentary, light, moderate, active or veryActive
    #[arg(short, long)]
    activity: Option<String>,

    /// Logged exercise as sport:minutes[:intensity], repeatable
    #[arg(short, long = "exercise", value_name = "SPORT:MIN[:INTENSITY]")]
    exercises: Vec<String>,

    /// maintain, cut or bulk
    #[arg(short, long)]
    goal: Option<String>,

    /// enthusiast, strength_power, mixed_team, endurance or physique
    #[arg(short, long)]
    profile: Option<String>,

    /// Cut: target body fat percentage
    #[arg(long)]
    target_body_fat: Option<String>,

    /// Cut or bulk: time frame in weeks
    #[arg(long)]
    weeks: Option<String>,

    /// Bulk: weight to gain in kg
    #[arg(long, conflicts_with = "target_ffmi")]
    gain_kg: Option<String>,

    /// Bulk: target fat-free mass index (needs --body-fat)
    #[arg(long)]
    target_ffmi: Option<String>,

    /// Output format: table or json
    #[arg(short = 'f', long)]
    format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl CalculateArgs {
    /// Flag values as a form snapshot
    fn to_raw(&self) -> Result<RawCalculationInput> {
        let number = |value: &Option<String>| value.as_deref().and_then(fuelrs::inputs::parse_number);

        let exercises = self
            .exercises
            .iter()
            .map(|spec| parse_exercise_spec(spec).map(RawExercise::from))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(FuelRsError::from)?;

        let (gain, ffmi) = (number(&self.gain_kg), number(&self.target_ffmi));
        let bulk_target_type = if ffmi.is_some() {
            Some("ffmi".to_string())
        } else if gain.is_some() {
            Some("weight".to_string())
        } else {
            None
        };

        Ok(RawCalculationInput {
            gender: self.gender.clone(),
            age: number(&self.age),
            weight: number(&self.weight),
            height: number(&self.height),
            body_fat: number(&self.body_fat),
            activity: self.activity.clone(),
            exercises,
            goal: self.goal.clone(),
            athlete_profile: self.profile.clone(),
            target_body_fat: number(&self.target_body_fat),
            target_time_weeks: number(&self.weeks),
            target_gain_kg: gain,
            bulk_target_type,
            target_ffmi: ffmi,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<FuelRsError>() {
                Some(fuel_err) => {
                    tracing::error!(error = %fuel_err, severity = ?fuel_err.severity(), "Command failed");
                    eprintln!("{} {}", "Error:".red().bold(), fuel_err.user_message());
                }
                None => eprintln!("{} {:#}", "Error:".red().bold(), err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref());
    init_logging(&config.logging.clone().with_verbosity(cli.verbose))?;

    match cli.command {
        Commands::Calculate(args) => calculate(&config, &args),
        Commands::Sports { search } => {
            let catalog = config.catalog.load()?;
            let sports = match search.as_deref() {
                Some(query) => catalog.search(query),
                None => catalog.sports(),
            };

            if sports.is_empty() {
                println!("{}", "No matching sports".yellow());
            } else {
                println!("{}", render_sports(&sports));
            }
            Ok(())
        }
        Commands::Config { show, init } => {
            let path = cli.config.unwrap_or_else(AppConfig::default_config_path);
            if init {
                init_config(&path)?;
            }
            if show || !init {
                let content = toml::to_string_pretty(&config)
                    .with_context(|| "Failed to serialize configuration to TOML")?;
                println!("{}", format!("# {}", path.display()).dimmed());
                println!("{}", content);
            }
            Ok(())
        }
    }
}

fn calculate(config: &AppConfig, args: &CalculateArgs) -> Result<()> {
    let file_input = match &args.input {
        Some(path) => RawCalculationInput::load_from_file(path)?,
        None => RawCalculationInput::default(),
    };
    let raw = file_input.merge(args.to_raw()?);
    let request = raw.into_request(&config.defaults);

    let catalog = config.catalog.load()?;
    let result = NutritionPlanner::new(&catalog).plan(&request)?;

    match args.format.unwrap_or(config.output.format) {
        OutputFormat::Json => println!("{}", render_json(&result)?),
        OutputFormat::Table => {
            let color = config.output.color && !args.no_color;
            println!("{}", render_text(&result, color));
        }
    }

    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("{}", format!("Config already exists: {}", path.display()).yellow());
        return Ok(());
    }

    AppConfig::default().save_to_file(path)?;
    println!("{}", format!("✓ Config written to {}", path.display()).green());
    Ok(())
}
