//! Diet management and the weekly grocery list.
//!
//! Diets are 7-day grids of meals holding `{food, qty, unit}` lines.
//! Like the plan editor this is CRUD plumbing over the shared state;
//! the one computed artifact is the grocery list, aggregated per
//! (food, unit) pair over the whole week.

use crate::types::{AppState, Diet, FoodItem, MEALS_PER_DAY};
use crate::{Error, Result};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One aggregated grocery line
#[derive(Clone, Debug, PartialEq)]
pub struct GroceryLine {
    pub food: String,
    pub qty: f64,
    pub unit: String,
}

fn diet_mut(state: &mut AppState, id: Uuid) -> Result<&mut Diet> {
    state
        .diet_mut(id)
        .ok_or_else(|| Error::NotFound(format!("Diet {} not found", id)))
}

fn check_slot(day: usize, meal: usize) -> Result<()> {
    if day >= 7 {
        return Err(Error::Validation(format!("Day index {} out of range", day)));
    }
    if meal >= MEALS_PER_DAY {
        return Err(Error::Validation(format!(
            "Meal index {} out of range",
            meal
        )));
    }
    Ok(())
}

/// Create an empty diet and make it active
pub fn create_diet(state: &mut AppState, name: &str) -> Result<Uuid> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Diet name must not be empty".into()));
    }
    let diet = Diet::empty(name);
    let id = diet.id;
    state.diets.push(diet);
    state.active_diet_id = Some(id);
    Ok(id)
}

pub fn rename_diet(state: &mut AppState, id: Uuid, name: &str) -> Result<()> {
    let diet = diet_mut(state, id)?;
    let trimmed = name.trim();
    diet.name = if trimmed.is_empty() {
        "Diet".to_string()
    } else {
        trimmed.to_string()
    };
    Ok(())
}

pub fn duplicate_diet(state: &mut AppState, id: Uuid) -> Result<Uuid> {
    let source = state
        .diet(id)
        .ok_or_else(|| Error::NotFound(format!("Diet {} not found", id)))?;
    let mut copy = source.clone();
    copy.id = Uuid::new_v4();
    copy.name = format!("{} (copy)", source.name);
    let new_id = copy.id;
    state.diets.push(copy);
    Ok(new_id)
}

pub fn delete_diet(state: &mut AppState, id: Uuid) -> Result<()> {
    let idx = state
        .diets
        .iter()
        .position(|d| d.id == id)
        .ok_or_else(|| Error::NotFound(format!("Diet {} not found", id)))?;
    state.diets.remove(idx);
    if state.active_diet_id == Some(id) {
        state.active_diet_id = state.diets.first().map(|d| d.id);
    }
    Ok(())
}

pub fn set_active_diet(state: &mut AppState, id: Uuid) -> Result<()> {
    state
        .diet(id)
        .ok_or_else(|| Error::NotFound(format!("Diet {} not found", id)))?;
    state.active_diet_id = Some(id);
    Ok(())
}

/// Append a food line to one meal slot
pub fn add_food(
    state: &mut AppState,
    diet_id: Uuid,
    day: usize,
    meal: usize,
    item: FoodItem,
) -> Result<()> {
    check_slot(day, meal)?;
    if item.food.trim().is_empty() {
        return Err(Error::Validation("Food name must not be empty".into()));
    }
    if !(item.qty > 0.0) {
        return Err(Error::Validation("Quantity must be positive".into()));
    }

    let diet = diet_mut(state, diet_id)?;
    diet.week[day].meals[meal].push(item);
    Ok(())
}

pub fn remove_food(
    state: &mut AppState,
    diet_id: Uuid,
    day: usize,
    meal: usize,
    index: usize,
) -> Result<()> {
    check_slot(day, meal)?;
    let diet = diet_mut(state, diet_id)?;
    let foods = &mut diet.week[day].meals[meal];
    if index >= foods.len() {
        return Err(Error::NotFound(format!("No food at index {}", index)));
    }
    foods.remove(index);
    Ok(())
}

/// Copy one day's meals over every day of the week
pub fn copy_day_to_all(state: &mut AppState, diet_id: Uuid, day: usize) -> Result<()> {
    check_slot(day, 0)?;
    let diet = diet_mut(state, diet_id)?;
    let template = diet.week[day].clone();
    for d in diet.week.iter_mut() {
        *d = template.clone();
    }
    Ok(())
}

/// Copy one meal slot to the same slot of every day
pub fn copy_meal_to_all_days(
    state: &mut AppState,
    diet_id: Uuid,
    day: usize,
    meal: usize,
) -> Result<()> {
    check_slot(day, meal)?;
    let diet = diet_mut(state, diet_id)?;
    let template = diet.week[day].meals[meal].clone();
    for d in diet.week.iter_mut() {
        d.meals[meal] = template.clone();
    }
    Ok(())
}

/// Aggregate the whole week into a grocery list, one line per
/// (food, unit) pair, sorted by food name.
pub fn grocery_list(diet: &Diet) -> Vec<GroceryLine> {
    let mut totals: BTreeMap<(String, String), f64> = BTreeMap::new();

    for day in &diet.week {
        for meal in &day.meals {
            for item in meal {
                *totals
                    .entry((item.food.clone(), item.unit.clone()))
                    .or_insert(0.0) += item.qty;
            }
        }
    }

    totals
        .into_iter()
        .map(|((food, unit), qty)| GroceryLine { food, qty, unit })
        .collect()
}
