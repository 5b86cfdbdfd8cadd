//! Workout session model

use chrono::NaiveDate;
use serde::Serialize;

use super::clock::ensure_not_future;
use super::error::ModelResult;
use super::Exercise;

/// A dated training session holding an ordered list of exercises
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSession {
    id: Option<i64>,
    session_date: NaiveDate,
    pub notes: Option<String>,
    exercises: Vec<Exercise>,
}

impl WorkoutSession {
    pub fn new(session_date: NaiveDate) -> ModelResult<Self> {
        ensure_not_future("session date", session_date)?;
        Ok(Self {
            id: None,
            session_date,
            notes: None,
            exercises: Vec::new(),
        })
    }

    pub(crate) fn restore(
        id: i64,
        session_date: NaiveDate,
        notes: Option<String>,
        exercises: Vec<Exercise>,
    ) -> Self {
        Self {
            id: Some(id),
            session_date,
            notes,
            exercises,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn session_date(&self) -> NaiveDate {
        self.session_date
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn exercises_mut(&mut self) -> &mut [Exercise] {
        &mut self.exercises
    }

    pub fn add_exercise(&mut self, exercise: Exercise) -> &mut Exercise {
        self.exercises.push(exercise);
        let last = self.exercises.len() - 1;
        &mut self.exercises[last]
    }

    pub fn remove_exercise(&mut self, position: usize) -> Option<Exercise> {
        (position < self.exercises.len()).then(|| self.exercises.remove(position))
    }

    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets().len()).sum()
    }

    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(Exercise::total_volume).sum()
    }
}
