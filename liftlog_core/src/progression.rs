//! Progression advisor: proposes the next target load for an exercise
//! from its last recorded lift and the plan's rep range.
//!
//! The step is 2.5% of the load rounded to the nearest half unit,
//! floored at 1 unit so microloading stays meaningful for light lifts.

use crate::history::{lookup_last_best, LastLift};
use crate::parse::fmt_num;
use crate::types::{RepScheme, Session};
use uuid::Uuid;

/// A proposed next load with a human rationale
#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion {
    pub kg: f64,
    pub message: String,
}

/// Load increment/decrement for a given load
fn load_step(kg: f64) -> f64 {
    if kg < 20.0 {
        1.0
    } else {
        ((kg * 0.025 * 2.0).round() / 2.0).max(1.0)
    }
}

/// Suggest the next load given the last recorded lift and the target
/// rep range. Returns `None` when there is no usable last lift.
pub fn suggest_next(last: Option<&LastLift>, scheme: &RepScheme) -> Option<Suggestion> {
    let last = last?;
    let rep_min = scheme.rep_min as f64;
    let rep_max = scheme.rep_max as f64;

    if let Some(reps) = last.reps {
        if scheme.rep_max > 0 && reps >= rep_max {
            let inc = load_step(last.kg);
            let kg = last.kg + inc;
            return Some(Suggestion {
                kg,
                message: format!(
                    "Top of range reached ({}kg x {}). Try {}kg (≈ +{}).",
                    fmt_num(last.kg),
                    fmt_num(reps),
                    fmt_num(kg),
                    fmt_num(inc)
                ),
            });
        }

        if scheme.rep_min > 0 && reps < rep_min {
            let dec = load_step(last.kg);
            let kg = (last.kg - dec).max(0.0);
            return Some(Suggestion {
                kg,
                message: format!(
                    "Below range ({}kg x {}). Try {}kg (≈ -{}).",
                    fmt_num(last.kg),
                    fmt_num(reps),
                    fmt_num(kg),
                    fmt_num(dec)
                ),
            });
        }
    }

    Some(Suggestion {
        kg: last.kg,
        message: format!(
            "Hold {}kg and aim for one more rep (if form allows).",
            fmt_num(last.kg)
        ),
    })
}

/// History lookup + suggestion in one step, excluding the session
/// currently being edited.
pub fn suggest_for_exercise(
    sessions: &[Session],
    exclude: Option<Uuid>,
    exercise: &str,
    scheme: &RepScheme,
) -> Option<Suggestion> {
    let history = lookup_last_best(sessions, exclude, exercise);
    suggest_next(history.last.as_ref(), scheme)
}
