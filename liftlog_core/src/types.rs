//! Core domain types for the LiftLog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Plans, days and exercise targets (reusable workout templates)
//! - Sessions, session items and set entries (recorded workouts)
//! - Diets, meals and food items
//! - The single application state document that holds everything

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Plan Types
// ============================================================================

/// Set/rep/rest prescription for one exercise.
///
/// `rest` is kept as free text ("90", "1:30") and parsed on demand.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RepScheme {
    pub sets: u32,
    pub rep_min: u32,
    pub rep_max: u32,
    pub rest: String,
}

/// One exercise slot within a plan day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseTarget {
    pub name: String,
    pub scheme: RepScheme,
}

/// One training day within a plan
///
/// `weekday` uses calendar numbering: 0=Sunday .. 6=Saturday.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanDay {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub weekday: Option<u8>,
    #[serde(default)]
    pub exercises: Vec<ExerciseTarget>,
}

/// A reusable multi-day workout template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub days: Vec<PlanDay>,
}

// ============================================================================
// Session Types
// ============================================================================

/// One set's recorded load/reps, kept as raw user text.
///
/// Partially-filled entries are valid and persisted as-is; parsing
/// happens at every consumption point, never at entry time.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SetEntry {
    #[serde(default)]
    pub kg: String,
    #[serde(default)]
    pub reps: String,
}

/// One exercise within a session, with the target copied from the plan
/// at session-creation time so later plan edits never alter past data.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionItem {
    pub exercise: String,
    pub target: RepScheme,
    pub sets: Vec<SetEntry>,
}

/// One concrete, dated instance of performing a plan day.
///
/// `ts` (epoch milliseconds) is assigned once at creation and is the
/// canonical ordering key; `date` may repeat across sessions. `closed`
/// is an advisory toggle, a closed session remains fully editable.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: Uuid,
    #[serde(default)]
    pub ts: i64,
    pub date: String,
    #[serde(default)]
    pub plan_id: Option<Uuid>,
    #[serde(default)]
    pub day_id: Option<Uuid>,
    #[serde(default)]
    pub plan_name: String,
    pub day_name: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub items: Vec<SessionItem>,
}

// ============================================================================
// Diet Types
// ============================================================================

/// One food line within a meal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub food: String,
    pub qty: f64,
    pub unit: String,
}

/// One day of meals (Monday-first, fixed number of meals)
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DietDay {
    #[serde(default)]
    pub meals: Vec<Vec<FoodItem>>,
}

/// A named week-long diet: 7 days of meals
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Diet {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub week: Vec<DietDay>,
}

/// Meals per diet day
pub const MEALS_PER_DAY: usize = 5;

impl Diet {
    /// Create an empty diet with a full 7x5 meal grid
    pub fn empty(name: impl Into<String>) -> Self {
        Diet {
            id: Uuid::new_v4(),
            name: name.into(),
            week: (0..7)
                .map(|_| DietDay {
                    meals: vec![Vec::new(); MEALS_PER_DAY],
                })
                .collect(),
        }
    }
}

// ============================================================================
// Settings and Chart Preferences
// ============================================================================

/// User-level settings (bodyweight and daily macro targets)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub weight_kg: f64,
    pub meals_per_day: u32,
    pub kcal: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            weight_kg: 68.0,
            meals_per_day: 5,
            kcal: 2900,
            protein_g: 140,
            carbs_g: 380,
            fat_g: 80,
        }
    }
}

/// Which per-session statistic the progress chart plots
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMode {
    #[default]
    Best,
    Avg,
    Volume,
}

impl SeriesMode {
    /// Uppercase label used in tooltip strings
    pub fn label(&self) -> &'static str {
        match self {
            SeriesMode::Best => "BEST",
            SeriesMode::Avg => "AVG",
            SeriesMode::Volume => "VOLUME",
        }
    }
}

impl std::str::FromStr for SeriesMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "best" => Ok(SeriesMode::Best),
            "avg" => Ok(SeriesMode::Avg),
            "volume" => Ok(SeriesMode::Volume),
            other => Err(crate::Error::Validation(format!(
                "Unknown chart mode: {}",
                other
            ))),
        }
    }
}

/// Persisted chart selection (survives reloads like the rest of the state)
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartPrefs {
    #[serde(default)]
    pub exercise: String,
    #[serde(default)]
    pub mode: SeriesMode,
}

// ============================================================================
// Application State
// ============================================================================

/// The full application state: a single owned document passed by
/// reference into every core operation and persisted wholesale after
/// each mutation. There is only ever one logical writer at a time.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub active_plan_id: Option<Uuid>,

    #[serde(default)]
    pub diets: Vec<Diet>,
    #[serde(default)]
    pub active_diet_id: Option<Uuid>,

    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub active_session_id: Option<Uuid>,
    /// Session cursor: current exercise index (persisted so a live
    /// session survives a reload mid-entry)
    #[serde(default)]
    pub active_exercise: usize,
    /// Session cursor: current set index
    #[serde(default)]
    pub active_set: usize,

    #[serde(default)]
    pub chart: ChartPrefs,
}

impl AppState {
    pub fn plan(&self, id: Uuid) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn plan_mut(&mut self, id: Uuid) -> Option<&mut Plan> {
        self.plans.iter_mut().find(|p| p.id == id)
    }

    pub fn active_plan(&self) -> Option<&Plan> {
        self.active_plan_id.and_then(|id| self.plan(id))
    }

    pub fn diet(&self, id: Uuid) -> Option<&Diet> {
        self.diets.iter().find(|d| d.id == id)
    }

    pub fn diet_mut(&mut self, id: Uuid) -> Option<&mut Diet> {
        self.diets.iter_mut().find(|d| d.id == id)
    }

    pub fn active_diet(&self) -> Option<&Diet> {
        self.active_diet_id.and_then(|id| self.diet(id))
    }

    pub fn session(&self, id: Uuid) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn session_mut(&mut self, id: Uuid) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }
}
