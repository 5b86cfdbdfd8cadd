//! Data models
//!
//! In-memory entities with validated construction and derived metrics.
//! Storage lives in [`crate::db`].

pub mod clock;
pub mod health;

mod body_measurement;
mod error;
mod exercise;
mod food;
mod food_item;
mod meal;
mod nutrition;
mod user;
mod weight_entry;
mod workout_session;

pub use body_measurement::{BodyMeasurement, BodySizes};
pub use error::{ModelError, ModelResult};
pub use exercise::{Exercise, ExerciseCategory, ExerciseSet};
pub use food::Food;
pub use food_item::FoodItem;
pub use health::{ActivityLevel, BmiCategory, FitnessGoal, Gender};
pub use meal::Meal;
pub use nutrition::Nutrition;
pub use user::{Height, User, UserSummary};
pub use weight_entry::WeightEntry;
pub use workout_session::WorkoutSession;
