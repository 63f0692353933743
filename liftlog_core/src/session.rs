//! Live session state machine.
//!
//! Owns the lifecycle of an in-progress or completed workout session:
//! starting a session from a plan day, per-set data entry, the cursor
//! (exercise index, set index) persisted inside [`AppState`], the
//! closed/reopened toggle, and the rest-timer handoffs. All operations
//! mutate the shared state synchronously; the caller persists the whole
//! state afterwards.

use crate::parse::{fmt_num, parse_rest_seconds};
use crate::progression::suggest_for_exercise;
use crate::timer::RestTimer;
use crate::types::{AppState, Session, SessionItem, SetEntry};
use crate::{Error, Result};
use chrono::Utc;
use uuid::Uuid;

/// Result of a set-cursor advance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetStep {
    /// Cursor moved to this set index
    Advanced(usize),
    /// Already at the last set; the caller should offer the next
    /// exercise instead. Deliberately not auto-advancing.
    NoMoreSets,
}

/// Result of an exercise-cursor move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseStep {
    /// Cursor moved; the rest timer was reseeded with this duration
    Moved { rest_seconds: u32 },
    /// Already at the first/last exercise; cursor unchanged
    AtBoundary,
}

/// Completed-vs-total set counts for a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionProgress {
    pub done: usize,
    pub total: usize,
}

impl SessionProgress {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((self.done as f64 / self.total as f64) * 100.0).round() as u32
        }
    }
}

/// Start a new session from a day of the active plan.
///
/// Materializes the full item/set skeleton (targets copied by value, so
/// later plan edits never rewrite history), makes it the active session
/// and puts the cursor at (0,0). The timer is stopped and loaded with
/// the first exercise's rest duration, not started.
pub fn start_session(state: &mut AppState, timer: &mut RestTimer, day_id: Uuid) -> Result<Uuid> {
    let now = Utc::now();
    start_session_at(
        state,
        timer,
        day_id,
        now.timestamp_millis(),
        &now.format("%Y-%m-%d").to_string(),
    )
}

/// [`start_session`] with an explicit creation instant, for callers and
/// tests that control the clock. `ts` is assigned once here and never
/// changes afterwards.
pub fn start_session_at(
    state: &mut AppState,
    timer: &mut RestTimer,
    day_id: Uuid,
    ts: i64,
    date: &str,
) -> Result<Uuid> {
    let (plan_id, plan_name, day) = {
        let plan = state
            .active_plan()
            .ok_or_else(|| Error::NotFound("No active plan".into()))?;
        let day = plan
            .days
            .iter()
            .find(|d| d.id == day_id)
            .ok_or_else(|| Error::NotFound(format!("Day {} not in the active plan", day_id)))?;
        (plan.id, plan.name.clone(), day.clone())
    };

    let session = Session {
        id: Uuid::new_v4(),
        ts,
        date: date.to_string(),
        plan_id: Some(plan_id),
        day_id: Some(day.id),
        plan_name,
        day_name: day.name.clone(),
        closed: false,
        items: day
            .exercises
            .iter()
            .map(|ex| SessionItem {
                exercise: ex.name.clone(),
                target: ex.scheme.clone(),
                sets: vec![SetEntry::default(); ex.scheme.sets as usize],
            })
            .collect(),
    };

    let id = session.id;
    timer.stop();
    if let Some(first) = session.items.first() {
        timer.set(parse_rest_seconds(&first.target.rest));
    }

    state.sessions.push(session);
    state.active_session_id = Some(id);
    state.active_exercise = 0;
    state.active_set = 0;

    tracing::info!("Started session {} ({})", id, date);
    Ok(id)
}

/// The currently active session, if any
pub fn active_session(state: &AppState) -> Option<&Session> {
    state.active_session_id.and_then(|id| state.session(id))
}

fn active_session_mut(state: &mut AppState) -> Option<&mut Session> {
    let id = state.active_session_id?;
    state.session_mut(id)
}

/// The item under the cursor
pub fn current_item(state: &AppState) -> Option<&SessionItem> {
    active_session(state)?.items.get(state.active_exercise)
}

/// The set entry under the cursor
pub fn current_set(state: &AppState) -> Option<&SetEntry> {
    current_item(state)?.sets.get(state.active_set)
}

/// Rest duration configured for the exercise under the cursor
pub fn current_rest_seconds(state: &AppState) -> Option<u32> {
    current_item(state).map(|it| parse_rest_seconds(&it.target.rest))
}

fn current_set_mut(state: &mut AppState) -> Result<&mut SetEntry> {
    let (ex, set) = (state.active_exercise, state.active_set);
    active_session_mut(state)
        .ok_or_else(|| Error::State("No active session".into()))?
        .items
        .get_mut(ex)
        .and_then(|item| item.sets.get_mut(set))
        .ok_or_else(|| Error::State("Session cursor out of bounds".into()))
}

/// Write the raw kg/reps text into the set under the cursor.
/// No validation happens here; partial entries are kept as typed.
pub fn record_set(state: &mut AppState, kg: &str, reps: &str) -> Result<()> {
    let entry = current_set_mut(state)?;
    entry.kg = kg.to_string();
    entry.reps = reps.to_string();
    Ok(())
}

/// Explicit "save this set" action: rejects a blank reps field, and on
/// success restarts the rest timer with the exercise's configured rest.
pub fn save_set(state: &mut AppState, timer: &mut RestTimer) -> Result<u32> {
    let entry = current_set(state).ok_or_else(|| Error::State("No active session".into()))?;
    if entry.reps.trim().is_empty() {
        return Err(Error::Validation("Enter reps before saving the set".into()));
    }

    // Cursor is valid, so the item must exist
    let rest = current_rest_seconds(state)
        .ok_or_else(|| Error::State("Session cursor out of bounds".into()))?;
    timer.reseed(rest);
    tracing::debug!("Saved set {} (rest {}s)", state.active_set + 1, rest);
    Ok(rest)
}

/// Move to the next set of the current exercise. At the last set the
/// cursor stays put and the caller is told there are no more sets.
pub fn advance_set(state: &mut AppState) -> Result<SetStep> {
    let item_sets = current_item(state)
        .ok_or_else(|| Error::State("No active session".into()))?
        .sets
        .len();

    if state.active_set + 1 < item_sets {
        state.active_set += 1;
        Ok(SetStep::Advanced(state.active_set))
    } else {
        Ok(SetStep::NoMoreSets)
    }
}

/// Move to the next exercise (clamped, no wraparound). Resets the set
/// cursor and reseeds the stopped timer from the new exercise's rest.
pub fn advance_exercise(state: &mut AppState, timer: &mut RestTimer) -> Result<ExerciseStep> {
    let items = active_session(state)
        .ok_or_else(|| Error::State("No active session".into()))?
        .items
        .len();

    if state.active_exercise + 1 >= items {
        return Ok(ExerciseStep::AtBoundary);
    }
    state.active_exercise += 1;
    state.active_set = 0;

    let rest_seconds = current_rest_seconds(state).unwrap_or(0);
    timer.stop();
    timer.set(rest_seconds);
    Ok(ExerciseStep::Moved { rest_seconds })
}

/// Move to the previous exercise; mirror of [`advance_exercise`].
pub fn retreat_exercise(state: &mut AppState, timer: &mut RestTimer) -> Result<ExerciseStep> {
    active_session(state).ok_or_else(|| Error::State("No active session".into()))?;

    if state.active_exercise == 0 {
        return Ok(ExerciseStep::AtBoundary);
    }
    state.active_exercise -= 1;
    state.active_set = 0;

    let rest_seconds = current_rest_seconds(state).unwrap_or(0);
    timer.stop();
    timer.set(rest_seconds);
    Ok(ExerciseStep::Moved { rest_seconds })
}

/// Flip the advisory closed flag; returns the new value.
/// A closed session stays fully editable.
pub fn toggle_closed(state: &mut AppState) -> Result<bool> {
    let session =
        active_session_mut(state).ok_or_else(|| Error::State("No active session".into()))?;
    session.closed = !session.closed;
    Ok(session.closed)
}

/// Leave the live session view. The session itself is untouched and
/// stays in the list; only the active pointer and cursor are cleared.
pub fn exit_session(state: &mut AppState, timer: &mut RestTimer) {
    state.active_session_id = None;
    state.active_exercise = 0;
    state.active_set = 0;
    timer.stop();
}

/// Delete a session by id. If it is the active one, exits it first so
/// no dangling active-session reference survives.
pub fn delete_session(state: &mut AppState, timer: &mut RestTimer, id: Uuid) -> Result<()> {
    let idx = state
        .sessions
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| Error::NotFound(format!("Session {} not found", id)))?;

    if state.active_session_id == Some(id) {
        exit_session(state, timer);
    }
    state.sessions.remove(idx);
    tracing::info!("Deleted session {}", id);
    Ok(())
}

/// Make an existing session (open or closed) the active one. Review
/// always restarts at the first exercise and set; a previously saved
/// cursor position is not restored.
pub fn resume_session(state: &mut AppState, id: Uuid) -> Result<()> {
    state
        .session(id)
        .ok_or_else(|| Error::NotFound(format!("Session {} not found", id)))?;
    state.active_session_id = Some(id);
    state.active_exercise = 0;
    state.active_set = 0;
    Ok(())
}

/// If the kg field under the cursor is still blank, fill it with the
/// advisor's suggested load (one decimal, trailing `.0` trimmed) and
/// return the written text. Existing user input is never overwritten.
pub fn autofill_kg(state: &mut AppState) -> Option<String> {
    let entry = current_set(state)?;
    if !entry.kg.trim().is_empty() {
        return None;
    }

    let item = current_item(state)?;
    let suggestion = suggest_for_exercise(
        &state.sessions,
        state.active_session_id,
        &item.exercise,
        &item.target,
    )?;

    let text = fmt_num(suggestion.kg);
    if let Ok(entry) = current_set_mut(state) {
        entry.kg = text.clone();
        return Some(text);
    }
    None
}

/// Completed sets (non-blank reps) vs. total target sets
pub fn session_progress(session: &Session) -> SessionProgress {
    let mut done = 0;
    let mut total = 0;
    for item in &session.items {
        total += if item.target.sets > 0 {
            item.target.sets as usize
        } else {
            item.sets.len()
        };
        done += item
            .sets
            .iter()
            .filter(|s| !s.reps.trim().is_empty())
            .count();
    }
    SessionProgress { done, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExerciseTarget, Plan, PlanDay, RepScheme};

    fn target(name: &str, sets: u32, rest: &str) -> ExerciseTarget {
        ExerciseTarget {
            name: name.into(),
            scheme: RepScheme {
                sets,
                rep_min: 8,
                rep_max: 10,
                rest: rest.into(),
            },
        }
    }

    fn state_with_plan() -> (AppState, Uuid) {
        let day = PlanDay {
            id: Uuid::new_v4(),
            name: "Push".into(),
            weekday: Some(1),
            exercises: vec![target("Bench Press", 3, "2:00"), target("Dips", 2, "60")],
        };
        let day_id = day.id;
        let plan = Plan {
            id: Uuid::new_v4(),
            name: "PPL".into(),
            days: vec![day],
        };
        let mut state = AppState::default();
        state.active_plan_id = Some(plan.id);
        state.plans.push(plan);
        (state, day_id)
    }

    fn started() -> (AppState, RestTimer, Uuid) {
        let (mut state, day_id) = state_with_plan();
        let mut timer = RestTimer::new();
        let id =
            start_session_at(&mut state, &mut timer, day_id, 1_700_000_000_000, "2026-02-10")
                .unwrap();
        (state, timer, id)
    }

    #[test]
    fn test_start_materializes_full_skeleton() {
        let (state, timer, id) = started();
        let session = state.session(id).unwrap();

        assert_eq!(session.items.len(), 2);
        assert_eq!(session.items[0].sets.len(), 3);
        assert_eq!(session.items[1].sets.len(), 2);
        assert_eq!(session.ts, 1_700_000_000_000);
        assert!(!session.closed);
        assert_eq!(state.active_session_id, Some(id));
        assert_eq!((state.active_exercise, state.active_set), (0, 0));
        // Timer loaded with the first exercise's rest, not started
        assert_eq!(timer.remaining(), 120);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_start_without_plan_is_refused() {
        let mut state = AppState::default();
        let mut timer = RestTimer::new();
        let err = start_session(&mut state, &mut timer, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_plan_edits_do_not_touch_past_sessions() {
        let (mut state, _timer, id) = started();
        state.plans[0].days[0].exercises[0].scheme.rep_max = 20;
        state.plans[0].days[0].exercises[0].name = "Incline Press".into();

        let session = state.session(id).unwrap();
        assert_eq!(session.items[0].exercise, "Bench Press");
        assert_eq!(session.items[0].target.rep_max, 10);
    }

    #[test]
    fn test_record_then_save_restarts_timer() {
        let (mut state, mut timer, _) = started();
        record_set(&mut state, "80", "8").unwrap();

        let rest = save_set(&mut state, &mut timer).unwrap();
        assert_eq!(rest, 120);
        assert!(timer.is_running());
        assert_eq!(timer.remaining(), 120);
    }

    #[test]
    fn test_save_rejects_blank_reps() {
        let (mut state, mut timer, _) = started();
        record_set(&mut state, "80", "   ").unwrap();

        let err = save_set(&mut state, &mut timer).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!timer.is_running());
    }

    #[test]
    fn test_advance_set_stops_at_last() {
        let (mut state, _timer, _) = started();
        assert_eq!(advance_set(&mut state).unwrap(), SetStep::Advanced(1));
        assert_eq!(advance_set(&mut state).unwrap(), SetStep::Advanced(2));
        assert_eq!(advance_set(&mut state).unwrap(), SetStep::NoMoreSets);
        assert_eq!(state.active_set, 2);
    }

    #[test]
    fn test_advance_exercise_clamps_and_reseeds() {
        let (mut state, mut timer, _) = started();
        state.active_set = 2;

        let step = advance_exercise(&mut state, &mut timer).unwrap();
        assert_eq!(step, ExerciseStep::Moved { rest_seconds: 60 });
        assert_eq!((state.active_exercise, state.active_set), (1, 0));
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), 60);

        // Last exercise: no wraparound
        let step = advance_exercise(&mut state, &mut timer).unwrap();
        assert_eq!(step, ExerciseStep::AtBoundary);
        assert_eq!(state.active_exercise, 1);
    }

    #[test]
    fn test_retreat_exercise_at_first_is_noop() {
        let (mut state, mut timer, _) = started();
        let step = retreat_exercise(&mut state, &mut timer).unwrap();
        assert_eq!(step, ExerciseStep::AtBoundary);
        assert_eq!(state.active_exercise, 0);
    }

    #[test]
    fn test_toggle_closed_is_involutive() {
        let (mut state, _timer, id) = started();
        record_set(&mut state, "80", "8").unwrap();
        let before = state.session(id).unwrap().clone();

        assert!(toggle_closed(&mut state).unwrap());
        assert!(!toggle_closed(&mut state).unwrap());

        assert_eq!(state.session(id).unwrap(), &before);
    }

    #[test]
    fn test_exit_keeps_session_in_list() {
        let (mut state, mut timer, id) = started();
        exit_session(&mut state, &mut timer);

        assert_eq!(state.active_session_id, None);
        assert_eq!((state.active_exercise, state.active_set), (0, 0));
        assert!(state.session(id).is_some());
    }

    #[test]
    fn test_delete_active_session_exits_first() {
        let (mut state, mut timer, id) = started();
        delete_session(&mut state, &mut timer, id).unwrap();

        assert_eq!(state.active_session_id, None);
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_delete_unknown_session_is_not_found() {
        let (mut state, mut timer, _) = started();
        let err = delete_session(&mut state, &mut timer, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(state.sessions.len(), 1);
    }

    #[test]
    fn test_resume_restores_cursor_to_origin() {
        let (mut state, mut timer, id) = started();
        state.active_exercise = 1;
        state.active_set = 1;
        exit_session(&mut state, &mut timer);

        resume_session(&mut state, id).unwrap();
        assert_eq!(state.active_session_id, Some(id));
        assert_eq!((state.active_exercise, state.active_set), (0, 0));
    }

    #[test]
    fn test_autofill_fills_only_blank_kg() {
        // A prior session provides history for Bench Press
        let (mut state, mut timer, first_id) = started();
        record_set(&mut state, "100", "12").unwrap();
        exit_session(&mut state, &mut timer);

        let day_id = state.plans[0].days[0].id;
        start_session_at(&mut state, &mut timer, day_id, 1_700_000_100_000, "2026-02-12")
            .unwrap();

        // Top of range at 100kg -> suggests 102.5
        assert_eq!(autofill_kg(&mut state), Some("102.5".into()));
        assert_eq!(current_set(&state).unwrap().kg, "102.5");

        // Second call: field no longer blank, nothing happens
        record_set(&mut state, "105", "").unwrap();
        assert_eq!(autofill_kg(&mut state), None);
        assert_eq!(current_set(&state).unwrap().kg, "105");

        // The prior session still has its own data untouched
        assert_eq!(state.session(first_id).unwrap().items[0].sets[0].kg, "100");
    }

    #[test]
    fn test_session_progress_counts_non_blank_reps() {
        let (mut state, _timer, id) = started();
        record_set(&mut state, "80", "8").unwrap();
        advance_set(&mut state).unwrap();
        record_set(&mut state, "80", "7").unwrap();

        let progress = session_progress(state.session(id).unwrap());
        assert_eq!(progress.done, 2);
        assert_eq!(progress.total, 5);
        assert_eq!(progress.percent(), 40);
    }
}
