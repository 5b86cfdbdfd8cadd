//! Body measurement model
//!
//! Circumference measurements taken on a given date. Every size must stay
//! strictly positive, both at construction and through the setters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::clock::ensure_not_future;
use super::error::{ensure_positive, ModelResult};

/// The five measured sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySizes {
    pub waist: f64,
    pub chest: f64,
    pub arm: f64,
    pub thigh: f64,
    pub hip: f64,
}

impl BodySizes {
    fn validate(&self) -> ModelResult<()> {
        ensure_positive("waist", self.waist)?;
        ensure_positive("chest", self.chest)?;
        ensure_positive("arm", self.arm)?;
        ensure_positive("thigh", self.thigh)?;
        ensure_positive("hip", self.hip)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyMeasurement {
    id: Option<i64>,
    measurement_date: NaiveDate,
    sizes: BodySizes,
}

macro_rules! size_setter {
    ($getter:ident, $setter:ident, $label:expr) => {
        pub fn $getter(&self) -> f64 {
            self.sizes.$getter
        }

        pub fn $setter(&mut self, value: f64) -> ModelResult<()> {
            ensure_positive($label, value)?;
            self.sizes.$getter = value;
            Ok(())
        }
    };
}

impl BodyMeasurement {
    pub fn new(measurement_date: NaiveDate, sizes: BodySizes) -> ModelResult<Self> {
        ensure_not_future("measurement date", measurement_date)?;
        sizes.validate()?;
        Ok(Self {
            id: None,
            measurement_date,
            sizes,
        })
    }

    pub(crate) fn restore(id: i64, measurement_date: NaiveDate, sizes: BodySizes) -> Self {
        Self {
            id: Some(id),
            measurement_date,
            sizes,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn measurement_date(&self) -> NaiveDate {
        self.measurement_date
    }

    pub fn sizes(&self) -> &BodySizes {
        &self.sizes
    }

    size_setter!(waist, set_waist, "waist");
    size_setter!(chest, set_chest, "chest");
    size_setter!(arm, set_arm, "arm");
    size_setter!(thigh, set_thigh, "thigh");
    size_setter!(hip, set_hip, "hip");
}
