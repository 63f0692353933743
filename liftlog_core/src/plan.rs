//! Plan/day/exercise management.
//!
//! Editor plumbing for the workout templates: create, duplicate,
//! delete, reorder, plus weekday resolution for "what do I train
//! today". Sessions copy targets by value at start time, so nothing
//! here can retroactively alter recorded history.

use crate::types::{AppState, ExerciseTarget, Plan, PlanDay};
use crate::{Error, Result};
use chrono::{Datelike, Local};
use uuid::Uuid;

/// Calendar-day labels, indexed 0=Sunday .. 6=Saturday
const WEEKDAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn weekday_label(weekday: u8) -> Option<&'static str> {
    WEEKDAY_LABELS.get(weekday as usize).copied()
}

/// Display label for a day: "Monday — Push" or just the name
pub fn day_label(day: &PlanDay) -> String {
    match day.weekday.and_then(weekday_label) {
        Some(label) => format!("{} — {}", label, day.name),
        None => day.name.clone(),
    }
}

/// Reorder helper; returns false when either index is out of bounds
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// The plan day assigned to a calendar weekday, if any
pub fn day_for_weekday(plan: &Plan, weekday: u8) -> Option<&PlanDay> {
    plan.days.iter().find(|d| d.weekday == Some(weekday))
}

/// The day to train today: today's weekday match, else the first day
pub fn resolve_today(plan: &Plan) -> Option<&PlanDay> {
    let weekday = Local::now().weekday().num_days_from_sunday() as u8;
    day_for_weekday(plan, weekday).or_else(|| plan.days.first())
}

fn plan_mut(state: &mut AppState, id: Uuid) -> Result<&mut Plan> {
    state
        .plan_mut(id)
        .ok_or_else(|| Error::NotFound(format!("Plan {} not found", id)))
}

fn day_mut(plan: &mut Plan, day_id: Uuid) -> Result<&mut PlanDay> {
    plan.days
        .iter_mut()
        .find(|d| d.id == day_id)
        .ok_or_else(|| Error::NotFound(format!("Day {} not found", day_id)))
}

/// Create an empty plan and make it active
pub fn create_plan(state: &mut AppState, name: &str) -> Result<Uuid> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Plan name must not be empty".into()));
    }
    let plan = Plan {
        id: Uuid::new_v4(),
        name: name.to_string(),
        days: Vec::new(),
    };
    let id = plan.id;
    state.plans.push(plan);
    state.active_plan_id = Some(id);
    Ok(id)
}

pub fn rename_plan(state: &mut AppState, id: Uuid, name: &str) -> Result<()> {
    let plan = plan_mut(state, id)?;
    let trimmed = name.trim();
    plan.name = if trimmed.is_empty() {
        "Plan".to_string()
    } else {
        trimmed.to_string()
    };
    Ok(())
}

/// Deep-copy a plan under a "(copy)" name; days and exercises get
/// fresh ids so the copies are independently editable.
pub fn duplicate_plan(state: &mut AppState, id: Uuid) -> Result<Uuid> {
    let source = state
        .plan(id)
        .ok_or_else(|| Error::NotFound(format!("Plan {} not found", id)))?;

    let mut copy = source.clone();
    copy.id = Uuid::new_v4();
    copy.name = format!("{} (copy)", source.name);
    for day in &mut copy.days {
        day.id = Uuid::new_v4();
    }

    let new_id = copy.id;
    state.plans.push(copy);
    Ok(new_id)
}

/// Remove a plan; the active-plan pointer falls back to the first
/// remaining plan (or none).
pub fn delete_plan(state: &mut AppState, id: Uuid) -> Result<()> {
    let idx = state
        .plans
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| Error::NotFound(format!("Plan {} not found", id)))?;
    state.plans.remove(idx);
    if state.active_plan_id == Some(id) {
        state.active_plan_id = state.plans.first().map(|p| p.id);
    }
    Ok(())
}

pub fn set_active_plan(state: &mut AppState, id: Uuid) -> Result<()> {
    state
        .plan(id)
        .ok_or_else(|| Error::NotFound(format!("Plan {} not found", id)))?;
    state.active_plan_id = Some(id);
    Ok(())
}

/// Append a day to a plan
pub fn add_day(
    state: &mut AppState,
    plan_id: Uuid,
    name: &str,
    weekday: Option<u8>,
) -> Result<Uuid> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Day name must not be empty".into()));
    }
    if let Some(w) = weekday {
        if w > 6 {
            return Err(Error::Validation(format!(
                "Weekday must be 0 (Sunday) to 6 (Saturday), got {}",
                w
            )));
        }
    }

    let plan = plan_mut(state, plan_id)?;
    let day = PlanDay {
        id: Uuid::new_v4(),
        name: name.to_string(),
        weekday,
        exercises: Vec::new(),
    };
    let id = day.id;
    plan.days.push(day);
    Ok(id)
}

pub fn duplicate_day(state: &mut AppState, plan_id: Uuid, day_id: Uuid) -> Result<Uuid> {
    let plan = plan_mut(state, plan_id)?;
    let source = plan
        .days
        .iter()
        .find(|d| d.id == day_id)
        .ok_or_else(|| Error::NotFound(format!("Day {} not found", day_id)))?;

    let mut copy = source.clone();
    copy.id = Uuid::new_v4();
    copy.name = format!("{} (copy)", source.name);
    let id = copy.id;
    plan.days.push(copy);
    Ok(id)
}

pub fn delete_day(state: &mut AppState, plan_id: Uuid, day_id: Uuid) -> Result<()> {
    let plan = plan_mut(state, plan_id)?;
    let idx = plan
        .days
        .iter()
        .position(|d| d.id == day_id)
        .ok_or_else(|| Error::NotFound(format!("Day {} not found", day_id)))?;
    plan.days.remove(idx);
    Ok(())
}

pub fn move_day(state: &mut AppState, plan_id: Uuid, from: usize, to: usize) -> Result<bool> {
    let plan = plan_mut(state, plan_id)?;
    Ok(move_item(&mut plan.days, from, to))
}

/// Append an exercise target to a day. Sets and both rep bounds must be
/// positive; a blank rest falls back to "90".
pub fn add_exercise(
    state: &mut AppState,
    plan_id: Uuid,
    day_id: Uuid,
    mut target: ExerciseTarget,
) -> Result<()> {
    target.name = target.name.trim().to_string();
    if target.name.is_empty() {
        return Err(Error::Validation("Exercise name must not be empty".into()));
    }
    if target.scheme.sets == 0 || target.scheme.rep_min == 0 || target.scheme.rep_max == 0 {
        return Err(Error::Validation(
            "Check sets and rep range: all must be positive".into(),
        ));
    }
    if target.scheme.rest.trim().is_empty() {
        target.scheme.rest = "90".to_string();
    }

    let plan = plan_mut(state, plan_id)?;
    day_mut(plan, day_id)?.exercises.push(target);
    Ok(())
}

pub fn remove_exercise(
    state: &mut AppState,
    plan_id: Uuid,
    day_id: Uuid,
    index: usize,
) -> Result<()> {
    let plan = plan_mut(state, plan_id)?;
    let day = day_mut(plan, day_id)?;
    if index >= day.exercises.len() {
        return Err(Error::NotFound(format!("No exercise at index {}", index)));
    }
    day.exercises.remove(index);
    Ok(())
}

pub fn move_exercise(
    state: &mut AppState,
    plan_id: Uuid,
    day_id: Uuid,
    from: usize,
    to: usize,
) -> Result<bool> {
    let plan = plan_mut(state, plan_id)?;
    let day = day_mut(plan, day_id)?;
    Ok(move_item(&mut day.exercises, from, to))
}
