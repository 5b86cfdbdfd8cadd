//! Food Item model
//!
//! A portion of a food eaten as part of a meal. Nutrition is computed from
//! the food once, at construction, and cached.

use serde::Serialize;

use super::error::{ModelError, ModelResult};
use super::{Food, Nutrition};

/// A consumed portion of a catalog food
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodItem {
    id: Option<i64>,
    food_id: Option<i64>,
    food_name: Option<String>,
    servings_consumed: f64,
    nutrition: Nutrition,
}

impl FoodItem {
    pub fn new(food: &Food, servings_consumed: f64) -> Self {
        Self {
            id: None,
            food_id: food.id(),
            food_name: Some(food.name.clone()),
            servings_consumed,
            nutrition: food.per_serving.scale(servings_consumed),
        }
    }

    /// Build from the result of a food lookup; an absent food is an error
    pub fn from_lookup(food: Option<&Food>, servings_consumed: f64) -> ModelResult<Self> {
        let food = food.ok_or(ModelError::MissingReference("food"))?;
        Ok(Self::new(food, servings_consumed))
    }

    pub(crate) fn restore(
        id: i64,
        food_id: Option<i64>,
        food_name: Option<String>,
        servings_consumed: f64,
        nutrition: Nutrition,
    ) -> Self {
        Self {
            id: Some(id),
            food_id,
            food_name,
            servings_consumed,
            nutrition,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn food_id(&self) -> Option<i64> {
        self.food_id
    }

    /// Name of the source food, if it is still known
    pub fn food_name(&self) -> Option<&str> {
        self.food_name.as_deref()
    }

    pub fn servings_consumed(&self) -> f64 {
        self.servings_consumed
    }

    pub fn nutrition(&self) -> &Nutrition {
        &self.nutrition
    }

    pub fn calories(&self) -> f64 {
        self.nutrition.calories
    }

    pub fn protein(&self) -> f64 {
        self.nutrition.protein
    }

    pub fn carbohydrates(&self) -> f64 {
        self.nutrition.carbohydrates
    }

    pub fn fats(&self) -> f64 {
        self.nutrition.fats
    }
}
