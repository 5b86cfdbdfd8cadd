//! Exercise model
//!
//! Exercises performed in a workout session, each with numbered sets, and
//! the categories exercises are filed under.

use serde::Serialize;

use super::error::{ensure_positive, ModelError, ModelResult};

/// Grouping for exercises (e.g. "Chest", "Cardio")
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseCategory {
    id: Option<i64>,
    pub name: String,
    pub description: String,
}

impl ExerciseCategory {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
        }
    }

    pub(crate) fn restore(id: i64, name: String, description: String) -> Self {
        Self {
            id: Some(id),
            name,
            description,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

/// One set of an exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseSet {
    id: Option<i64>,
    set_number: i32,
    weight_lbs: f64,
    repetitions: i32,
}

fn ensure_load(weight_lbs: f64, repetitions: i32) -> ModelResult<()> {
    ensure_positive("weight", weight_lbs)?;
    if repetitions <= 0 {
        return Err(ModelError::validation(
            "repetitions",
            format!("must be greater than 0, got {}", repetitions),
        ));
    }
    Ok(())
}

impl ExerciseSet {
    pub fn new(set_number: i32, weight_lbs: f64, repetitions: i32) -> ModelResult<Self> {
        if set_number <= 0 {
            return Err(ModelError::validation(
                "set number",
                format!("must be greater than 0, got {}", set_number),
            ));
        }
        ensure_load(weight_lbs, repetitions)?;

        Ok(Self {
            id: None,
            set_number,
            weight_lbs,
            repetitions,
        })
    }

    pub(crate) fn restore(id: i64, set_number: i32, weight_lbs: f64, repetitions: i32) -> Self {
        Self {
            id: Some(id),
            set_number,
            weight_lbs,
            repetitions,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn set_number(&self) -> i32 {
        self.set_number
    }

    pub fn weight_lbs(&self) -> f64 {
        self.weight_lbs
    }

    pub fn repetitions(&self) -> i32 {
        self.repetitions
    }

    /// Weight moved across all repetitions
    pub fn volume(&self) -> f64 {
        self.weight_lbs * f64::from(self.repetitions)
    }
}

/// An exercise within a workout session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exercise {
    id: Option<i64>,
    pub name: String,
    category_id: i64,
    sets: Vec<ExerciseSet>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, category_id: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            category_id,
            sets: Vec::new(),
        }
    }

    pub(crate) fn restore(id: i64, name: String, category_id: i64, sets: Vec<ExerciseSet>) -> Self {
        Self {
            id: Some(id),
            name,
            category_id,
            sets,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn category_id(&self) -> i64 {
        self.category_id
    }

    pub fn sets(&self) -> &[ExerciseSet] {
        &self.sets
    }

    pub(crate) fn sets_mut(&mut self) -> &mut [ExerciseSet] {
        &mut self.sets
    }

    pub fn find_set(&self, set_number: i32) -> Option<&ExerciseSet> {
        self.sets.iter().find(|s| s.set_number == set_number)
    }

    /// Append a new set; set numbers are unique within the exercise
    pub fn add_set(&mut self, set_number: i32, weight_lbs: f64, repetitions: i32) -> ModelResult<&ExerciseSet> {
        if self.find_set(set_number).is_some() {
            return Err(ModelError::DuplicateKey {
                key: "set number",
                value: set_number.to_string(),
            });
        }

        let set = ExerciseSet::new(set_number, weight_lbs, repetitions)?;
        self.sets.push(set);
        Ok(&self.sets[self.sets.len() - 1])
    }

    /// Overwrite weight and reps of an existing set.
    ///
    /// Returns `Ok(false)` when no set has that number. The new values are
    /// held to the same positivity rules as a freshly added set.
    pub fn update_set(&mut self, set_number: i32, weight_lbs: f64, repetitions: i32) -> ModelResult<bool> {
        let Some(set) = self.sets.iter_mut().find(|s| s.set_number == set_number) else {
            return Ok(false);
        };

        ensure_load(weight_lbs, repetitions)?;
        set.weight_lbs = weight_lbs;
        set.repetitions = repetitions;
        Ok(true)
    }

    /// Remove a set by number, returning it if it existed
    pub fn remove_set(&mut self, set_number: i32) -> Option<ExerciseSet> {
        let position = self.sets.iter().position(|s| s.set_number == set_number)?;
        Some(self.sets.remove(position))
    }

    pub fn total_volume(&self) -> f64 {
        self.sets.iter().map(ExerciseSet::volume).sum()
    }
}
