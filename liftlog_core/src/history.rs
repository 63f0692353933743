//! Historical aggregation across recorded sessions.
//!
//! Computes, per exercise name, the most recent recorded lift and the
//! all-time best load, plus the personal-record board and the exercise
//! name index. Exercise identity is case-insensitive trimmed string
//! equality throughout.

use crate::parse::{fmt_num, norm_name, parse_load, parse_reps};
use crate::types::{AppState, Session};
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// The most recent recorded lift for an exercise
#[derive(Clone, Debug, PartialEq)]
pub struct LastLift {
    pub date: String,
    pub kg: f64,
    /// `None` when the reps field of that set does not parse.
    /// A blank field parses as zero, not `None`.
    pub reps: Option<f64>,
    pub ts: i64,
}

/// Result of a last/best history lookup
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExerciseHistory {
    pub last: Option<LastLift>,
    pub best: Option<f64>,
}

/// Newest-first session ordering.
///
/// `ts` is the canonical key; a session with a usable `ts` always sorts
/// before one without, and the date string (descending) is the final
/// fallback. Date strings alone are never trusted for recency because
/// several sessions may share a calendar day.
pub fn recency_cmp(a: &Session, b: &Session) -> Ordering {
    match (a.ts > 0, b.ts > 0) {
        (true, true) => b.ts.cmp(&a.ts).then_with(|| b.date.cmp(&a.date)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => b.date.cmp(&a.date),
    }
}

/// All sessions sorted newest first
pub fn sessions_by_recency(sessions: &[Session]) -> Vec<&Session> {
    let mut sorted: Vec<&Session> = sessions.iter().collect();
    sorted.sort_by(|a, b| recency_cmp(a, b));
    sorted
}

/// Look up the last and best recorded lift for an exercise.
///
/// The session identified by `exclude` never contributes to the result,
/// so a session being edited cannot feed its own suggestions. `last` is
/// the first parseable set (item order, then set order) of the most
/// recent qualifying session, not the best set within it.
pub fn lookup_last_best(
    sessions: &[Session],
    exclude: Option<Uuid>,
    exercise: &str,
) -> ExerciseHistory {
    let name = norm_name(exercise);

    let others: Vec<&Session> = sessions
        .iter()
        .filter(|s| Some(s.id) != exclude)
        .collect();

    // Best: maximum parsed load across every matching set, all sessions
    let mut best: Option<f64> = None;
    for session in &others {
        for item in &session.items {
            if norm_name(&item.exercise) != name {
                continue;
            }
            for set in &item.sets {
                if let Some(kg) = parse_load(&set.kg) {
                    best = Some(best.map_or(kg, |b: f64| b.max(kg)));
                }
            }
        }
    }

    // Last: first parseable set of the most recent qualifying session
    let mut sorted = others;
    sorted.sort_by(|a, b| recency_cmp(a, b));

    let mut last: Option<LastLift> = None;
    'sessions: for session in sorted {
        for item in &session.items {
            if norm_name(&item.exercise) != name {
                continue;
            }
            for set in &item.sets {
                if let Some(kg) = parse_load(&set.kg) {
                    last = Some(LastLift {
                        date: session.date.clone(),
                        kg,
                        reps: parse_reps(&set.reps),
                        ts: session.ts,
                    });
                    break 'sessions;
                }
            }
        }
    }

    ExerciseHistory { last, best }
}

/// Render a combined human line, e.g.
/// `"Last: 100kg x 8 • 2026-02-10  |  Best: 110kg"`.
/// Either half is omitted when absent.
pub fn format_history_line(history: &ExerciseHistory) -> String {
    let last_txt = history.last.as_ref().map(|l| {
        let reps = match l.reps {
            Some(r) if r > 0.0 => format!(" x {}", fmt_num(r)),
            _ => String::new(),
        };
        format!("Last: {}kg{} • {}", fmt_num(l.kg), reps, l.date)
    });
    let best_txt = history.best.map(|b| format!("Best: {}kg", fmt_num(b)));

    match (last_txt, best_txt) {
        (Some(l), Some(b)) => format!("{}  |  {}", l, b),
        (Some(l), None) => l,
        (None, Some(b)) => b,
        (None, None) => String::new(),
    }
}

/// One row of the personal-record board
#[derive(Clone, Debug, PartialEq)]
pub struct PersonalRecord {
    pub exercise: String,
    pub kg: f64,
}

/// All-time max load per exercise across every session, heaviest first.
/// The display name is the first trimmed spelling encountered.
pub fn personal_records(sessions: &[Session]) -> Vec<PersonalRecord> {
    let mut by_name: HashMap<String, PersonalRecord> = HashMap::new();

    for session in sessions {
        for item in &session.items {
            for set in &item.sets {
                let Some(kg) = parse_load(&set.kg) else {
                    continue;
                };
                let key = norm_name(&item.exercise);
                by_name
                    .entry(key)
                    .and_modify(|pr| pr.kg = pr.kg.max(kg))
                    .or_insert_with(|| PersonalRecord {
                        exercise: item.exercise.trim().to_string(),
                        kg,
                    });
            }
        }
    }

    let mut records: Vec<PersonalRecord> = by_name.into_values().collect();
    records.sort_by(|a, b| {
        b.kg.partial_cmp(&a.kg)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.exercise.cmp(&b.exercise))
    });
    records
}

/// Every distinct exercise name seen in sessions or plans, sorted.
/// Feeds the chart selector.
pub fn exercise_names(state: &AppState) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashMap<String, ()> = HashMap::new();

    let mut add = |raw: &str| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        if seen.insert(norm_name(trimmed), ()).is_none() {
            names.push(trimmed.to_string());
        }
    };

    for session in &state.sessions {
        for item in &session.items {
            add(&item.exercise);
        }
    }
    for plan in &state.plans {
        for day in &plan.days {
            for ex in &day.exercises {
                add(&ex.name);
            }
        }
    }

    names.sort();
    names
}
