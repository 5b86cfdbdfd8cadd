//! Meal model
//!
//! A named, timestamped collection of food items with nutrition totals.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::clock::ensure_not_future;
use super::error::{ModelError, ModelResult};
use super::{FoodItem, Nutrition};

/// A meal owned by a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meal {
    id: Option<i64>,
    name: String,
    eaten_at: NaiveDateTime,
    food_items: Vec<FoodItem>,
}

fn ensure_name(name: &str) -> ModelResult<()> {
    if name.trim().is_empty() {
        return Err(ModelError::validation("meal name", "cannot be empty"));
    }
    Ok(())
}

impl Meal {
    pub fn new(
        name: impl Into<String>,
        eaten_at: NaiveDateTime,
        food_items: Option<Vec<FoodItem>>,
    ) -> ModelResult<Self> {
        let name = name.into();
        ensure_name(&name)?;
        ensure_not_future("meal date", eaten_at.date())?;

        Ok(Self {
            id: None,
            name,
            eaten_at,
            food_items: food_items.unwrap_or_default(),
        })
    }

    pub(crate) fn restore(id: i64, name: String, eaten_at: NaiveDateTime, food_items: Vec<FoodItem>) -> Self {
        Self {
            id: Some(id),
            name,
            eaten_at,
            food_items,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ModelResult<()> {
        let name = name.into();
        ensure_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn eaten_at(&self) -> NaiveDateTime {
        self.eaten_at
    }

    pub fn food_items(&self) -> &[FoodItem] {
        &self.food_items
    }

    pub(crate) fn food_items_mut(&mut self) -> &mut [FoodItem] {
        &mut self.food_items
    }

    pub fn add_food_item(&mut self, item: FoodItem) {
        self.food_items.push(item);
    }

    /// Remove the item at `position`; there must be one
    pub fn remove_food_item(&mut self, position: usize) -> ModelResult<FoodItem> {
        if position >= self.food_items.len() {
            return Err(ModelError::MissingReference("food item"));
        }
        Ok(self.food_items.remove(position))
    }

    pub fn total_nutrition(&self) -> Nutrition {
        self.food_items.iter().map(|item| *item.nutrition()).sum()
    }

    pub fn calculate_total_calories(&self) -> f64 {
        self.food_items.iter().map(FoodItem::calories).sum()
    }

    pub fn calculate_total_protein(&self) -> f64 {
        self.food_items.iter().map(FoodItem::protein).sum()
    }

    pub fn calculate_total_carbohydrates(&self) -> f64 {
        self.food_items.iter().map(FoodItem::carbohydrates).sum()
    }

    pub fn calculate_total_fats(&self) -> f64 {
        self.food_items.iter().map(FoodItem::fats).sum()
    }

    /// Human readable report: header, one line per item, then totals
    pub fn meal_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Meal: {} ({})", self.name, self.eaten_at.format("%Y-%m-%d %H:%M"));

        for item in &self.food_items {
            let _ = writeln!(
                out,
                "  - {}: {:.1} kcal, {:.1} g protein, {:.1} g carbs, {:.1} g fats",
                item.food_name().unwrap_or("Unknown"),
                item.calories(),
                item.protein(),
                item.carbohydrates(),
                item.fats(),
            );
        }

        let _ = writeln!(out, "Total calories: {:.1} kcal", self.calculate_total_calories());
        let _ = writeln!(out, "Total protein: {:.1} g", self.calculate_total_protein());
        let _ = writeln!(out, "Total carbohydrates: {:.1} g", self.calculate_total_carbohydrates());
        let _ = write!(out, "Total fats: {:.1} g", self.calculate_total_fats());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{clock::today, Food};
    use chrono::{Days, NaiveTime};

    fn noon_today() -> NaiveDateTime {
        today().and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    }

    fn oats() -> Food {
        Food::new("Oats", 40.0, Nutrition::new(150.0, 5.0, 27.0, 3.0)).unwrap()
    }

    fn banana() -> Food {
        Food::new("Banana", 118.0, Nutrition::new(105.0, 1.3, 27.0, 0.4)).unwrap()
    }

    #[test]
    fn test_empty_meal_totals_are_zero() {
        let meal = Meal::new("Breakfast", noon_today(), None).unwrap();
        assert_eq!(meal.calculate_total_calories(), 0.0);
        assert_eq!(meal.calculate_total_protein(), 0.0);
        assert_eq!(meal.calculate_total_carbohydrates(), 0.0);
        assert_eq!(meal.calculate_total_fats(), 0.0);
    }

    #[test]
    fn test_totals_sum_items() {
        let items = vec![FoodItem::new(&oats(), 2.0), FoodItem::new(&banana(), 1.0)];
        let meal = Meal::new("Breakfast", noon_today(), Some(items)).unwrap();
        assert!((meal.calculate_total_calories() - 405.0).abs() < 1e-9);
        assert!((meal.calculate_total_protein() - 11.3).abs() < 1e-9);
        assert!((meal.calculate_total_carbohydrates() - 81.0).abs() < 1e-9);
        assert!((meal.calculate_total_fats() - 6.4).abs() < 1e-9);
        assert_eq!(meal.total_nutrition().calories, meal.calculate_total_calories());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(Meal::new("   ", noon_today(), None).unwrap_err().is_validation());

        let mut meal = Meal::new("Lunch", noon_today(), None).unwrap();
        assert!(meal.set_name("").is_err());
        assert_eq!(meal.name(), "Lunch");
        meal.set_name("Late lunch").unwrap();
        assert_eq!(meal.name(), "Late lunch");
    }

    #[test]
    fn test_future_date_rejected() {
        let tomorrow = noon_today().checked_add_days(Days::new(1)).unwrap();
        assert!(Meal::new("Dinner", tomorrow, None).unwrap_err().is_validation());
    }

    #[test]
    fn test_add_and_remove_items() {
        let mut meal = Meal::new("Snack", noon_today(), None).unwrap();
        meal.add_food_item(FoodItem::new(&oats(), 1.0));
        meal.add_food_item(FoodItem::new(&banana(), 1.0));

        let removed = meal.remove_food_item(0).unwrap();
        assert_eq!(removed.food_name(), Some("Oats"));
        assert_eq!(meal.food_items().len(), 1);

        let err = meal.remove_food_item(5).unwrap_err();
        assert_eq!(err, ModelError::MissingReference("food item"));
        assert_eq!(meal.food_items().len(), 1);
    }

    #[test]
    fn test_summary_lists_items_then_totals() {
        let unknown = FoodItem::restore(7, None, None, 1.0, Nutrition::new(10.0, 1.0, 1.0, 1.0));
        let items = vec![FoodItem::new(&oats(), 1.0), unknown];
        let meal = Meal::new("Breakfast", noon_today(), Some(items)).unwrap();

        let summary = meal.meal_summary();
        let lines: Vec<&str> = summary.lines().collect();
        assert!(lines[0].starts_with("Meal: Breakfast ("));
        assert!(lines[1].contains("Oats: 150.0 kcal"));
        assert!(lines[2].contains("Unknown: 10.0 kcal"));
        assert_eq!(lines[3], "Total calories: 160.0 kcal");
        assert_eq!(lines[6], "Total fats: 4.0 g");
    }
}
