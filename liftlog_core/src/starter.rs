//! Built-in starter plan.
//!
//! A 4-day upper/lower template users can load instead of building a
//! plan from scratch. The template data is built once and cloned into a
//! fresh `Plan` (with new ids) on every load.

use crate::types::{AppState, ExerciseTarget, Plan, PlanDay, RepScheme};
use once_cell::sync::Lazy;
use uuid::Uuid;

struct StarterDay {
    name: &'static str,
    weekday: u8,
    exercises: Vec<ExerciseTarget>,
}

fn target(name: &str, sets: u32, rep_min: u32, rep_max: u32, rest: &str) -> ExerciseTarget {
    ExerciseTarget {
        name: name.to_string(),
        scheme: RepScheme {
            sets,
            rep_min,
            rep_max,
            rest: rest.to_string(),
        },
    }
}

/// Cached starter template - built once and cloned per load
static STARTER_TEMPLATE: Lazy<Vec<StarterDay>> = Lazy::new(|| {
    vec![
        StarterDay {
            name: "Upper A",
            weekday: 1, // Monday
            exercises: vec![
                target("Bench Press", 4, 6, 8, "2:00"),
                target("Barbell Row", 4, 6, 8, "2:00"),
                target("Overhead Press", 3, 8, 10, "90"),
                target("Lat Pulldown", 3, 8, 12, "90"),
                target("Barbell Curl", 3, 10, 12, "60"),
            ],
        },
        StarterDay {
            name: "Lower A",
            weekday: 2, // Tuesday
            exercises: vec![
                target("Squat", 4, 6, 8, "2:30"),
                target("Romanian Deadlift", 3, 8, 10, "2:00"),
                target("Leg Press", 3, 10, 12, "90"),
                target("Standing Calf Raise", 4, 10, 15, "60"),
            ],
        },
        StarterDay {
            name: "Upper B",
            weekday: 4, // Thursday
            exercises: vec![
                target("Incline Dumbbell Press", 4, 8, 10, "2:00"),
                target("Pull-Up", 4, 6, 10, "2:00"),
                target("Dumbbell Shoulder Press", 3, 8, 12, "90"),
                target("Cable Row", 3, 10, 12, "90"),
                target("Triceps Pushdown", 3, 10, 12, "60"),
            ],
        },
        StarterDay {
            name: "Lower B",
            weekday: 5, // Friday
            exercises: vec![
                target("Deadlift", 3, 5, 6, "3:00"),
                target("Front Squat", 3, 8, 10, "2:00"),
                target("Leg Curl", 3, 10, 12, "90"),
                target("Seated Calf Raise", 4, 12, 15, "60"),
            ],
        },
    ]
});

/// Build a fresh copy of the starter plan with new ids
pub fn starter_plan() -> Plan {
    Plan {
        id: Uuid::new_v4(),
        name: "Starter 4-Day".to_string(),
        days: STARTER_TEMPLATE
            .iter()
            .map(|day| PlanDay {
                id: Uuid::new_v4(),
                name: day.name.to_string(),
                weekday: Some(day.weekday),
                exercises: day.exercises.clone(),
            })
            .collect(),
    }
}

/// Add the starter plan to the state and make it active
pub fn load_starter_plan(state: &mut AppState) -> Uuid {
    let plan = starter_plan();
    let id = plan.id;
    state.plans.push(plan);
    state.active_plan_id = Some(id);
    id
}
