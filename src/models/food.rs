//! Food model
//!
//! Catalog entry with nutrition facts for one serving.

use serde::Serialize;

use super::error::{ensure_positive, ModelResult};
use super::Nutrition;

/// A food with per-serving nutrition facts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Food {
    id: Option<i64>,
    pub name: String,
    serving_size_grams: f64,
    /// Macros for one serving. Editing these does not touch food items
    /// already logged against this food.
    pub per_serving: Nutrition,
}

impl Food {
    pub fn new(name: impl Into<String>, serving_size_grams: f64, per_serving: Nutrition) -> ModelResult<Self> {
        ensure_positive("serving size", serving_size_grams)?;
        Ok(Self {
            id: None,
            name: name.into(),
            serving_size_grams,
            per_serving,
        })
    }

    pub(crate) fn restore(id: i64, name: String, serving_size_grams: f64, per_serving: Nutrition) -> Self {
        Self {
            id: Some(id),
            name,
            serving_size_grams,
            per_serving,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn serving_size_grams(&self) -> f64 {
        self.serving_size_grams
    }

    pub fn set_serving_size_grams(&mut self, grams: f64) -> ModelResult<()> {
        ensure_positive("serving size", grams)?;
        self.serving_size_grams = grams;
        Ok(())
    }
}
