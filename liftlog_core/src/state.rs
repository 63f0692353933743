//! App state persistence with file locking.
//!
//! The whole document (settings, plans, diets, sessions, cursor) is a
//! single JSON file. Loads are tolerant: a missing or corrupt file
//! turns into a default state with a warning rather than an error.
//! Saves are atomic, temp file plus rename.

use crate::types::{AppState, DietDay, MEALS_PER_DAY};
use crate::{Error, Result};
use chrono::Utc;
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl AppState {
    /// Load app state from a file with shared locking
    ///
    /// Returns default state if file doesn't exist.
    /// If file is corrupted, logs a warning and returns default state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No state file found, using default state");
            let mut state = Self::default();
            state.normalize();
            return Ok(state);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open state file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock state file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read state file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<AppState>(&contents) {
            Ok(mut state) => {
                tracing::debug!("Loaded app state from {:?}", path);
                state.normalize();
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse state file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save app state to a file with exclusive locking
    ///
    /// Atomically writes state by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "state path missing parent")
        })?)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace old state file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved app state to {:?}", path);
        Ok(())
    }

    /// Load state, modify it, and save it back atomically
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut AppState) -> Result<()>,
    {
        let mut state = Self::load(path)?;
        f(&mut state)?;
        state.save(path)?;
        Ok(state)
    }

    /// Pretty-printed JSON of the whole document, for backups
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace the whole document from exported JSON.
    ///
    /// Strict: a parse failure rejects the import and leaves the
    /// current state untouched.
    pub fn import_json(contents: &str) -> Result<Self> {
        let mut state: AppState = serde_json::from_str(contents)
            .map_err(|e| Error::Validation(format!("Invalid backup file: {}", e)))?;
        state.normalize();
        Ok(state)
    }

    /// Repair invariants after a load or import.
    ///
    /// Backfills timestamps for sessions saved before the `ts` field
    /// existed, clears dangling active ids, and defaults the active
    /// plan/diet pointers to the first entry.
    pub fn normalize(&mut self) {
        // Legacy sessions carry ts == 0; assign synthetic timestamps
        // that keep their current (insertion) order stable.
        let missing = self.sessions.iter().filter(|s| s.ts == 0).count();
        if missing > 0 {
            let mut next = Utc::now().timestamp_millis() - (missing as i64) * 1000;
            for session in self.sessions.iter_mut().filter(|s| s.ts == 0) {
                session.ts = next;
                next += 1000;
            }
            tracing::info!("Backfilled timestamps for {} legacy sessions", missing);
        }

        if let Some(id) = self.active_plan_id {
            if self.plan(id).is_none() {
                self.active_plan_id = None;
            }
        }
        if self.active_plan_id.is_none() {
            self.active_plan_id = self.plans.first().map(|p| p.id);
        }

        // Imported diets may carry short or empty week grids; editing
        // code indexes day and meal slots directly, so pad them out.
        for diet in &mut self.diets {
            if diet.week.len() < 7 {
                diet.week.resize_with(7, DietDay::default);
            }
            for day in &mut diet.week {
                if day.meals.len() < MEALS_PER_DAY {
                    day.meals.resize(MEALS_PER_DAY, Vec::new());
                }
            }
        }

        if let Some(id) = self.active_diet_id {
            if self.diet(id).is_none() {
                self.active_diet_id = None;
            }
        }
        if self.active_diet_id.is_none() {
            self.active_diet_id = self.diets.first().map(|d| d.id);
        }

        if let Some(id) = self.active_session_id {
            if self.session(id).is_none() {
                self.active_session_id = None;
                self.active_exercise = 0;
                self.active_set = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::create_plan;
    use crate::types::Session;
    use uuid::Uuid;

    fn legacy_session(date: &str) -> Session {
        Session {
            id: Uuid::new_v4(),
            ts: 0,
            date: date.into(),
            plan_id: None,
            day_id: None,
            plan_name: String::new(),
            day_name: String::new(),
            closed: false,
            items: Vec::new(),
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        let mut state = AppState::default();
        let plan_id = create_plan(&mut state, "Push Pull Legs").unwrap();
        state.settings.weight_kg = 75.0;

        state.save(&state_path).unwrap();
        let loaded = AppState::load(&state_path).unwrap();

        assert_eq!(loaded.plans.len(), 1);
        assert_eq!(loaded.active_plan_id, Some(plan_id));
        assert_eq!(loaded.settings.weight_kg, 75.0);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("nonexistent.json");

        let state = AppState::load(&state_path).unwrap();
        assert!(state.plans.is_empty());
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_corrupted_state_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("corrupted.json");

        std::fs::write(&state_path, "{ invalid json }").unwrap();

        let state = AppState::load(&state_path).unwrap();
        assert!(state.plans.is_empty());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        AppState::default().save(&state_path).unwrap();

        AppState::update(&state_path, |state| {
            state.settings.kcal = 3200;
            Ok(())
        })
        .unwrap();

        let loaded = AppState::load(&state_path).unwrap();
        assert_eq!(loaded.settings.kcal, 3200);
    }

    #[test]
    fn test_normalize_backfills_legacy_timestamps() {
        let mut state = AppState::default();
        state.sessions.push(legacy_session("2024-01-01"));
        state.sessions.push(legacy_session("2024-01-02"));

        state.normalize();

        assert!(state.sessions.iter().all(|s| s.ts > 0));
        // Insertion order preserved by strictly increasing timestamps
        assert!(state.sessions[0].ts < state.sessions[1].ts);
    }

    #[test]
    fn test_normalize_clears_dangling_session_pointer() {
        let mut state = AppState::default();
        state.active_session_id = Some(Uuid::new_v4());
        state.active_exercise = 3;
        state.active_set = 2;

        state.normalize();

        assert!(state.active_session_id.is_none());
        assert_eq!(state.active_exercise, 0);
        assert_eq!(state.active_set, 0);
    }

    #[test]
    fn test_import_pads_short_diet_grids() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"diets":[{{"id":"{id}","name":"Cut"}}]}}"#);
        let mut state = AppState::import_json(&json).unwrap();

        let diet = state.diet(id).unwrap();
        assert_eq!(diet.week.len(), 7);
        assert!(diet.week.iter().all(|d| d.meals.len() == MEALS_PER_DAY));

        let item = crate::types::FoodItem {
            food: "oats".into(),
            qty: 80.0,
            unit: "g".into(),
        };
        crate::diet::add_food(&mut state, id, 0, 0, item).unwrap();
        assert_eq!(state.diet(id).unwrap().week[0].meals[0].len(), 1);
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        assert!(AppState::import_json("not json").is_err());

        let mut state = AppState::default();
        create_plan(&mut state, "A").unwrap();
        state.sessions.push(Session {
            id: Uuid::new_v4(),
            ts: 0,
            date: "2024-05-01".into(),
            plan_id: None,
            day_id: None,
            plan_name: String::new(),
            day_name: String::new(),
            closed: true,
            items: Vec::new(),
        });
        let exported = state.export_json().unwrap();
        let imported = AppState::import_json(&exported).unwrap();
        assert_eq!(imported.plans.len(), 1);
        // Normalize runs on import too
        assert!(imported.sessions[0].ts > 0);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        AppState::default().save(&state_path).unwrap();

        assert!(state_path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "state.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only state.json, found extras: {:?}",
            extras
        );
    }
}
