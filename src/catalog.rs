//! Sport catalog: resolves sport keys to MET definitions
//!
//! The engine only ever sees a resolved [`SportDefinition`]. Where definitions
//! come from is up to the [`SportCatalog`] implementation; the built-in catalog
//! carries a table of common sports (with intensity ranges where effort varies a
//! lot) backed by fixed-MET entries from the 2024 Adult Compendium of Physical
//! Activities.

use crate::error::CatalogError;
use crate::models::SportDefinition;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Source of sport definitions
pub trait SportCatalog {
    /// Look up a sport by key
    fn resolve(&self, key: &str) -> Option<&SportDefinition>;

    /// All sports, in catalog order
    fn sports(&self) -> Vec<&SportDefinition>;
}

/// In-memory catalog with key lookup
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    sports: Vec<SportDefinition>,
    index: HashMap<String, usize>,
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        for sport in sport_table() {
            catalog.insert(sport);
        }
        for sport in compendium_table() {
            if catalog.resolve(&sport.key).is_none() {
                catalog.insert(sport);
            }
        }
        catalog
    }
}

impl BuiltinCatalog {
    pub fn empty() -> Self {
        Self {
            sports: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add or replace a sport definition
    pub fn insert(&mut self, sport: SportDefinition) {
        match self.index.get(&sport.key) {
            Some(&position) => self.sports[position] = sport,
            None => {
                self.index.insert(sport.key.clone(), self.sports.len());
                self.sports.push(sport);
            }
        }
    }

    /// Merge another catalog in, replacing sports with the same key
    pub fn extend(&mut self, other: BuiltinCatalog) {
        for sport in other.sports {
            self.insert(sport);
        }
    }

    pub fn len(&self) -> usize {
        self.sports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sports.is_empty()
    }

    /// Case-insensitive substring search over key, label and category
    pub fn search(&self, query: &str) -> Vec<&SportDefinition> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.sports.iter().collect();
        }

        self.sports
            .iter()
            .filter(|sport| {
                sport.key.to_lowercase().contains(&needle)
                    || sport.label.to_lowercase().contains(&needle)
                    || sport.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Load a catalog from CSV
    ///
    /// Expected columns: `key,label,category,met,min_met,max_met`. A row needs
    /// either `met` or both `min_met` and `max_met`.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(file)
    }

    /// Load a catalog from any CSV source
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut catalog = Self::empty();
        for record in reader.deserialize::<CatalogRow>() {
            let row = record?;
            catalog.insert(row.into_definition()?);
        }

        tracing::info!(sports = catalog.len(), "Loaded sport catalog from CSV");
        Ok(catalog)
    }
}

impl SportCatalog for BuiltinCatalog {
    fn resolve(&self, key: &str) -> Option<&SportDefinition> {
        self.index.get(key).map(|&position| &self.sports[position])
    }

    fn sports(&self) -> Vec<&SportDefinition> {
        self.sports.iter().collect()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    key: String,
    label: Option<String>,
    category: Option<String>,
    met: Option<String>,
    min_met: Option<String>,
    max_met: Option<String>,
}

impl CatalogRow {
    fn into_definition(self) -> Result<SportDefinition, CatalogError> {
        if self.key.is_empty() {
            return Err(CatalogError::InvalidEntry {
                key: String::new(),
                reason: "empty key".to_string(),
            });
        }

        let met = parse_met(&self.key, "met", self.met.as_deref())?;
        let min_met = parse_met(&self.key, "min_met", self.min_met.as_deref())?;
        let max_met = parse_met(&self.key, "max_met", self.max_met.as_deref())?;

        let label = self.label.filter(|l| !l.is_empty()).unwrap_or_else(|| self.key.clone());
        let category = self.category.unwrap_or_default();

        match (met, min_met, max_met) {
            (_, Some(min), Some(max)) => {
                if min > max {
                    return Err(CatalogError::InvalidEntry {
                        key: self.key,
                        reason: format!("min_met {} exceeds max_met {}", min, max),
                    });
                }
                Ok(SportDefinition::ranged(&self.key, &label, &category, min, max))
            }
            (Some(met), None, None) => Ok(SportDefinition::fixed(&self.key, &label, &category, met)),
            _ => Err(CatalogError::InvalidEntry {
                key: self.key,
                reason: "needs either met or both min_met and max_met".to_string(),
            }),
        }
    }
}

fn parse_met(key: &str, column: &str, raw: Option<&str>) -> Result<Option<Decimal>, CatalogError> {
    let Some(raw) = raw.filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    match Decimal::from_str(raw) {
        Ok(value) if value > Decimal::ZERO => Ok(Some(value)),
        _ => Err(CatalogError::InvalidEntry {
            key: key.to_string(),
            reason: format!("{} must be a positive number, got '{}'", column, raw),
        }),
    }
}

/// Common sports, several with intensity-dependent MET ranges
fn sport_table() -> Vec<SportDefinition> {
    use SportDefinition as S;

    vec![
        // Yoga & light
        S::fixed("yoga", "Yoga", "light", dec!(2.5)),
        S::fixed("stretching_mild", "Stretching (mild)", "light", dec!(2.3)),
        S::fixed("walking_slow", "Walking (slow)", "light", dec!(3.0)),
        S::fixed("walking_brisk", "Walking (brisk)", "light", dec!(4.3)),
        // Commute
        S::fixed("youbike_mod", "City bike (moderate)", "commute", dec!(4.0)),
        S::fixed("youbike_fast", "City bike (fast)", "commute", dec!(6.8)),
        // Gym
        S::ranged("weight_training_traditional", "Weight training", "gym", dec!(3.5), dec!(6.0)),
        S::ranged("weight_training_hiit", "Weight training (HIIT)", "gym", dec!(7.0), dec!(12.0)),
        S::ranged("crossfit", "CrossFit / functional", "gym", dec!(6.0), dec!(13.0)),
        S::fixed("pilates", "Pilates", "gym", dec!(3.0)),
        // Basketball
        S::ranged("basketball_3v3", "Basketball (3 on 3)", "basketball", dec!(6.0), dec!(10.5)),
        S::ranged("basketball_5v5", "Basketball (full court)", "basketball", dec!(5.5), dec!(9.0)),
        S::fixed("basketball_shoot", "Basketball (shooting)", "basketball", dec!(4.5)),
        // Baseball
        S::ranged("baseball_game", "Baseball (game)", "baseball", dec!(4.0), dec!(6.0)),
        S::ranged("baseball_pitch", "Baseball (pitching)", "baseball", dec!(4.5), dec!(7.5)),
        S::ranged("baseball_field", "Baseball (fielding)", "baseball", dec!(3.5), dec!(6.5)),
        S::fixed("baseball_bat", "Baseball (batting practice)", "baseball", dec!(5.0)),
        // Racket
        S::ranged("badminton_fun", "Badminton (social)", "racket", dec!(4.0), dec!(6.0)),
        S::ranged("badminton_comp", "Badminton (competitive)", "racket", dec!(6.0), dec!(9.0)),
        S::ranged("tennis_general", "Tennis", "racket", dec!(5.0), dec!(8.5)),
        S::fixed("table_tennis", "Table tennis", "racket", dec!(4.0)),
        // Outdoor & cardio
        S::fixed("hiking", "Hiking", "outdoor", dec!(6.5)),
        S::ranged("jogging", "Jogging", "outdoor", dec!(6.5), dec!(11.0)),
        S::ranged("cycling_indoor", "Indoor cycling", "outdoor", dec!(5.0), dec!(10.0)),
        S::ranged("swimming", "Swimming", "outdoor", dec!(6.0), dec!(11.0)),
        S::fixed("golf_walking", "Golf (walking)", "outdoor", dec!(4.8)),
        S::ranged("volleyball", "Volleyball", "outdoor", dec!(3.5), dec!(8.0)),
        S::ranged("soccer", "Soccer", "outdoor", dec!(6.0), dec!(11.5)),
    ]
}

/// Fixed-MET activities from the 2024 Adult Compendium
fn compendium_table() -> Vec<SportDefinition> {
    use SportDefinition as S;

    vec![
        S::fixed("bicycling_leisure", "Bicycling (leisure)", "bicycling", dec!(6.8)),
        S::fixed("bicycling_stationary", "Stationary bike", "bicycling", dec!(6.8)),
        S::fixed("bicycling_mountain", "Mountain biking", "bicycling", dec!(8.5)),
        S::fixed("weight_lifting", "Weight lifting (vigorous)", "conditioning", dec!(6.0)),
        S::fixed("weight_lifting_light", "Weight lifting (light)", "conditioning", dec!(3.5)),
        S::fixed("calisthenics", "Calisthenics", "conditioning", dec!(8.0)),
        S::fixed("circuit_training", "Circuit training", "conditioning", dec!(8.0)),
        S::fixed("dancing_general", "Dancing", "dancing", dec!(4.8)),
        S::fixed("zumba", "Zumba", "dancing", dec!(7.3)),
        S::fixed("cleaning_house", "House cleaning", "home", dec!(3.5)),
        S::fixed("cooking", "Cooking", "home", dec!(2.5)),
        S::fixed("playing_kids", "Playing with children", "home", dec!(3.5)),
        S::fixed("gardening", "Gardening", "lawn_garden", dec!(3.8)),
        S::fixed("mowing_lawn", "Mowing the lawn", "lawn_garden", dec!(5.0)),
        S::fixed("sleeping", "Sleeping", "inactivity", dec!(0.95)),
        S::fixed("sitting_quietly", "Sitting quietly", "inactivity", dec!(1.3)),
        S::fixed("desk_work", "Desk work", "inactivity", dec!(1.3)),
        S::fixed("construction_work", "Construction work", "occupation", dec!(5.3)),
        S::fixed("running_10kmh", "Running 10 km/h", "running", dec!(9.8)),
        S::fixed("running_13kmh", "Running 13 km/h", "running", dec!(11.5)),
        S::fixed("basketball_game", "Basketball (game)", "sports", dec!(8.0)),
        S::fixed("tennis_singles", "Tennis (singles)", "sports", dec!(8.0)),
        S::fixed("badminton", "Badminton", "sports", dec!(7.0)),
        S::fixed("walking_commuting", "Walking (commuting)", "walking", dec!(3.5)),
        S::fixed("walking_dog", "Walking the dog", "walking", dec!(3.0)),
        S::fixed("walking_stroll", "Strolling", "walking", dec!(2.0)),
        S::fixed("swimming_laps", "Swimming laps", "water", dec!(8.3)),
        S::fixed("kayaking", "Kayaking", "water", dec!(5.0)),
        S::fixed("skiing_downhill", "Downhill skiing", "winter", dec!(5.3)),
        S::fixed("skating_ice", "Ice skating", "winter", dec!(5.5)),
        S::fixed("gaming_active", "Active video games", "video_games", dec!(3.8)),
    ]
}
