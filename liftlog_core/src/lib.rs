#![forbid(unsafe_code)]

//! Core domain model and business logic for the LiftLog tracker.
//!
//! This crate provides:
//! - Domain types (plans, sessions, diets, settings)
//! - Lenient numeric parsing for logged sets
//! - Exercise history lookup and personal records
//! - Load progression suggestions
//! - Per-exercise time series and chart scaffolding
//! - Session state machine with rest timer
//! - Persistence (locked, atomic JSON state)

pub mod types;
pub mod error;
pub mod parse;
pub mod config;
pub mod logging;
pub mod state;
pub mod history;
pub mod progression;
pub mod series;
pub mod timer;
pub mod session;
pub mod plan;
pub mod diet;
pub mod starter;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use parse::{fmt_mmss, fmt_num, parse_load, parse_reps, parse_rest_seconds};
pub use history::{lookup_last_best, ExerciseHistory, LastLift};
pub use progression::{suggest_next, Suggestion};
pub use series::{build_series, nice_ticks, SeriesRow};
pub use timer::RestTimer;
pub use session::{start_session, SessionProgress};
pub use starter::load_starter_plan;
