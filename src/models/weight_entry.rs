//! Weight entry model
//!
//! A dated bodyweight and body-fat reading. The date is fixed at creation;
//! weight and body fat are re-validated on every assignment.

use chrono::NaiveDate;
use serde::Serialize;

use super::clock::ensure_not_future;
use super::error::{ensure_positive, ModelError, ModelResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightEntry {
    id: Option<i64>,
    entry_date: NaiveDate,
    weight_lbs: f64,
    body_fat_percentage: f64,
}

fn ensure_body_fat(percentage: f64) -> ModelResult<()> {
    if !(0.0..=100.0).contains(&percentage) {
        return Err(ModelError::validation(
            "body fat percentage",
            format!("must be between 0 and 100, got {}", percentage),
        ));
    }
    Ok(())
}

impl WeightEntry {
    pub fn new(entry_date: NaiveDate, weight_lbs: f64, body_fat_percentage: f64) -> ModelResult<Self> {
        ensure_not_future("entry date", entry_date)?;

        let mut entry = Self {
            id: None,
            entry_date,
            weight_lbs: 0.0,
            body_fat_percentage: 0.0,
        };
        entry.set_weight_lbs(weight_lbs)?;
        entry.set_body_fat_percentage(body_fat_percentage)?;
        Ok(entry)
    }

    pub(crate) fn restore(id: i64, entry_date: NaiveDate, weight_lbs: f64, body_fat_percentage: f64) -> Self {
        Self {
            id: Some(id),
            entry_date,
            weight_lbs,
            body_fat_percentage,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }

    pub fn weight_lbs(&self) -> f64 {
        self.weight_lbs
    }

    pub fn set_weight_lbs(&mut self, weight_lbs: f64) -> ModelResult<()> {
        ensure_positive("weight", weight_lbs)?;
        self.weight_lbs = weight_lbs;
        Ok(())
    }

    pub fn body_fat_percentage(&self) -> f64 {
        self.body_fat_percentage
    }

    pub fn set_body_fat_percentage(&mut self, percentage: f64) -> ModelResult<()> {
        ensure_body_fat(percentage)?;
        self.body_fat_percentage = percentage;
        Ok(())
    }
}
