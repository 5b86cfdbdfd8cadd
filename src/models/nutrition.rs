//! Macronutrients shared by foods (per serving), food items (per portion)
//! and meals (totals).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,       // grams
    pub carbohydrates: f64, // grams
    pub fats: f64,          // grams
}

impl Nutrition {
    pub fn new(calories: f64, protein: f64, carbohydrates: f64, fats: f64) -> Self {
        Self {
            calories,
            protein,
            carbohydrates,
            fats,
        }
    }

    /// Nutrition of `servings` portions of this one
    pub fn scale(&self, servings: f64) -> Self {
        Self::new(
            self.calories * servings,
            self.protein * servings,
            self.carbohydrates * servings,
            self.fats * servings,
        )
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::new(
            self.calories + other.calories,
            self.protein + other.protein,
            self.carbohydrates + other.carbohydrates,
            self.fats + other.fats,
        )
    }
}

/// Meal totals are the sum of their items' frozen nutrition
impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::default(), |acc, n| acc + n)
    }
}
