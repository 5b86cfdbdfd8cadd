//! User model
//!
//! The aggregate root: a user's profile plus everything they have logged.
//! Derived metrics (age, BMI, BMR, TDEE, calorie target) are computed from
//! the profile and the most recent weight entry.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::clock::today;
use super::error::{ModelError, ModelResult};
use super::health::{self, ActivityLevel, BmiCategory, FitnessGoal, Gender};
use super::{BodyMeasurement, Meal, WeightEntry, WorkoutSession};

/// Height in feet and inches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Height {
    pub feet: i32,
    pub inches: i32,
}

impl Height {
    pub fn new(feet: i32, inches: i32) -> ModelResult<Self> {
        if feet <= 0 {
            return Err(ModelError::validation(
                "height feet",
                format!("must be greater than 0, got {}", feet),
            ));
        }
        if !(0..=11).contains(&inches) {
            return Err(ModelError::validation(
                "height inches",
                format!("must be between 0 and 11, got {}", inches),
            ));
        }
        Ok(Self { feet, inches })
    }

    /// Total height in inches, computed in `f64` so any stored feet value is safe
    pub fn total_inches(&self) -> f64 {
        f64::from(self.feet) * 12.0 + f64::from(self.inches)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: Option<i64>,
    height: Height,
    date_of_birth: NaiveDate,
    gender: Gender,
    activity_level: ActivityLevel,
    goal: FitnessGoal,
    calorie_target: i32,
    weight_entries: Vec<WeightEntry>,
    body_measurements: Vec<BodyMeasurement>,
    workout_sessions: Vec<WorkoutSession>,
    meals: Vec<Meal>,
}

/// Snapshot of a user's profile and derived metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: Option<i64>,
    pub age: i32,
    pub gender: Gender,
    pub height: Height,
    pub activity_level: ActivityLevel,
    pub goal: FitnessGoal,
    pub current_weight_lbs: Option<f64>,
    pub current_bmi: Option<f64>,
    pub bmi_category: Option<BmiCategory>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub calorie_target: i32,
    pub weight_entries: usize,
    pub body_measurements: usize,
    pub workout_sessions: usize,
    pub meals: usize,
}

/// Whole years from `born` to `on`
fn years_between(born: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - born.year();
    if (on.month(), on.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age
}

impl User {
    pub fn new(
        height_feet: i32,
        height_inches: i32,
        date_of_birth: NaiveDate,
        goal: FitnessGoal,
        gender: &str,
    ) -> ModelResult<Self> {
        let today = today();
        if date_of_birth >= today {
            return Err(ModelError::validation(
                "date of birth",
                format!("must be before {}, got {}", today, date_of_birth),
            ));
        }
        let height = Height::new(height_feet, height_inches)?;
        let gender = Gender::parse(gender)?;

        Ok(Self {
            id: None,
            height,
            date_of_birth,
            gender,
            activity_level: ActivityLevel::default(),
            goal,
            calorie_target: 0,
            weight_entries: Vec::new(),
            body_measurements: Vec::new(),
            workout_sessions: Vec::new(),
            meals: Vec::new(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: i64,
        height: Height,
        date_of_birth: NaiveDate,
        gender: Gender,
        activity_level: ActivityLevel,
        goal: FitnessGoal,
        calorie_target: i32,
        weight_entries: Vec<WeightEntry>,
        body_measurements: Vec<BodyMeasurement>,
        workout_sessions: Vec<WorkoutSession>,
        meals: Vec<Meal>,
    ) -> Self {
        Self {
            id: Some(id),
            height,
            date_of_birth,
            gender,
            activity_level,
            goal,
            calorie_target,
            weight_entries,
            body_measurements,
            workout_sessions,
            meals,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn height(&self) -> Height {
        self.height
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn activity_level(&self) -> ActivityLevel {
        self.activity_level
    }

    pub fn set_activity_level(&mut self, level: ActivityLevel) {
        self.activity_level = level;
    }

    pub fn goal(&self) -> FitnessGoal {
        self.goal
    }

    pub fn set_goal(&mut self, goal: FitnessGoal) {
        self.goal = goal;
    }

    /// Last value computed by [`User::update_calorie_target`]
    pub fn calorie_target(&self) -> i32 {
        self.calorie_target
    }

    // Owned collections, in insertion order

    pub fn weight_entries(&self) -> &[WeightEntry] {
        &self.weight_entries
    }

    pub fn body_measurements(&self) -> &[BodyMeasurement] {
        &self.body_measurements
    }

    pub fn workout_sessions(&self) -> &[WorkoutSession] {
        &self.workout_sessions
    }

    pub fn workout_sessions_mut(&mut self) -> &mut [WorkoutSession] {
        &mut self.workout_sessions
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn meals_mut(&mut self) -> &mut [Meal] {
        &mut self.meals
    }

    pub(crate) fn weight_entries_mut(&mut self) -> &mut [WeightEntry] {
        &mut self.weight_entries
    }

    pub(crate) fn body_measurements_mut(&mut self) -> &mut [BodyMeasurement] {
        &mut self.body_measurements
    }

    pub fn add_weight_entry(&mut self, entry: WeightEntry) {
        self.weight_entries.push(entry);
    }

    pub fn add_body_measurement(&mut self, measurement: BodyMeasurement) {
        self.body_measurements.push(measurement);
    }

    pub fn add_workout_session(&mut self, session: WorkoutSession) {
        self.workout_sessions.push(session);
    }

    pub fn add_meal(&mut self, meal: Meal) {
        self.meals.push(meal);
    }

    // Derived metrics

    pub fn age(&self) -> i32 {
        self.age_on(today())
    }

    /// Age in whole years on the given date
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        years_between(self.date_of_birth, date)
    }

    /// Weight of the most recently added entry
    pub fn current_weight(&self) -> Option<f64> {
        self.weight_entries.last().map(WeightEntry::weight_lbs)
    }

    pub fn calculate_bmi(&self, weight_lbs: f64) -> ModelResult<f64> {
        health::bmi(weight_lbs, self.height.total_inches())
    }

    pub fn current_bmi(&self) -> ModelResult<Option<f64>> {
        self.current_weight().map(|w| self.calculate_bmi(w)).transpose()
    }

    /// Category of the current BMI; `Ok(None)` without a weight entry
    pub fn bmi_category(&self) -> ModelResult<Option<BmiCategory>> {
        Ok(self.current_bmi()?.map(BmiCategory::from_bmi))
    }

    pub fn calculate_bmr(&self) -> Option<f64> {
        let weight = self.current_weight()?;
        Some(health::mifflin_st_jeor(
            weight,
            self.height.total_inches(),
            self.age(),
            self.gender,
        ))
    }

    pub fn tdee(&self) -> Option<f64> {
        self.calculate_bmr().map(|bmr| health::tdee(bmr, self.activity_level))
    }

    /// Recompute and cache the daily calorie target; 0 when no weight is known
    pub fn update_calorie_target(&mut self) -> i32 {
        self.calorie_target = match self.calculate_bmr() {
            Some(bmr) => health::calorie_target(bmr, self.activity_level, self.goal),
            None => 0,
        };
        self.calorie_target
    }

    pub fn summary(&self) -> UserSummary {
        let current_bmi = self.current_bmi().ok().flatten();
        let bmi_category = self.bmi_category().ok().flatten();
        UserSummary {
            id: self.id,
            age: self.age(),
            gender: self.gender,
            height: self.height,
            activity_level: self.activity_level,
            goal: self.goal,
            current_weight_lbs: self.current_weight(),
            current_bmi,
            bmi_category,
            bmr: self.calculate_bmr(),
            tdee: self.tdee(),
            calorie_target: self.calorie_target,
            weight_entries: self.weight_entries.len(),
            body_measurements: self.body_measurements.len(),
            workout_sessions: self.workout_sessions.len(),
            meals: self.meals.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Months};

    fn years_ago(years: u32) -> NaiveDate {
        today().checked_sub_months(Months::new(years * 12)).unwrap()
    }

    fn male_5_10(dob: NaiveDate) -> User {
        User::new(5, 10, dob, FitnessGoal::Maintenance, "Male").unwrap()
    }

    #[test]
    fn test_construct_validation() {
        let dob = years_ago(30);
        assert!(User::new(0, 10, dob, FitnessGoal::Strength, "male").unwrap_err().is_validation());
        assert!(User::new(5, 12, dob, FitnessGoal::Strength, "male").unwrap_err().is_validation());
        assert!(User::new(5, -1, dob, FitnessGoal::Strength, "male").is_err());
        assert!(User::new(5, 10, dob, FitnessGoal::Strength, "robot").is_err());
        assert!(User::new(5, 10, today(), FitnessGoal::Strength, "male").is_err());
        assert!(User::new(5, 0, dob, FitnessGoal::Strength, "FEMALE").is_ok());
        assert!(User::new(5, 11, dob, FitnessGoal::Strength, "female").is_ok());
    }

    #[test]
    fn test_new_user_defaults() {
        let user = male_5_10(years_ago(30));
        assert_eq!(user.activity_level(), ActivityLevel::Sedentary);
        assert_eq!(user.calorie_target(), 0);
        assert_eq!(user.id(), None);
    }

    #[test]
    fn test_age_one_day_past_birthday() {
        let dob = years_ago(30).checked_sub_days(Days::new(1)).unwrap();
        assert_eq!(male_5_10(dob).age(), 30);
    }

    #[test]
    fn test_age_birthday_tomorrow() {
        let dob = years_ago(30).checked_add_days(Days::new(1)).unwrap();
        assert_eq!(male_5_10(dob).age(), 29);
    }

    #[test]
    fn test_age_on_fixed_dates() {
        let user = male_5_10(NaiveDate::from_ymd_opt(1990, 6, 15).unwrap());
        assert_eq!(user.age_on(NaiveDate::from_ymd_opt(2020, 6, 14).unwrap()), 29);
        assert_eq!(user.age_on(NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()), 30);
        assert_eq!(user.age_on(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()), 30);
    }

    #[test]
    fn test_no_weight_means_no_metrics() {
        let mut user = male_5_10(years_ago(30));
        assert_eq!(user.current_weight(), None);
        assert_eq!(user.current_bmi().unwrap(), None);
        assert_eq!(user.calculate_bmr(), None);
        assert_eq!(user.tdee(), None);
        assert_eq!(user.update_calorie_target(), 0);
        assert_eq!(user.calorie_target(), 0);
    }

    #[test]
    fn test_current_weight_is_last_added() {
        let mut user = male_5_10(years_ago(30));
        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
        user.add_weight_entry(WeightEntry::new(today(), 182.0, 20.0).unwrap());
        // Insertion order wins, not entry date
        user.add_weight_entry(WeightEntry::new(yesterday, 180.0, 20.0).unwrap());
        assert_eq!(user.current_weight(), Some(180.0));
    }

    #[test]
    fn test_calculate_bmi() {
        let user = male_5_10(years_ago(30));
        let expected = 180.0 / (70.0 * 70.0) * 703.0;
        assert!((user.calculate_bmi(180.0).unwrap() - expected).abs() < 1e-9);
        assert!(user.calculate_bmi(0.0).unwrap_err().is_validation());
    }

    #[test]
    fn test_bmr_male_180_5_10_age_30() {
        let dob = years_ago(30).checked_sub_days(Days::new(1)).unwrap();
        let mut user = male_5_10(dob);
        user.add_weight_entry(WeightEntry::new(today(), 180.0, 15.0).unwrap());

        let expected = 10.0 * (180.0 * 0.453592) + 6.25 * (70.0 * 2.54) - 5.0 * 30.0 + 5.0;
        let bmr = user.calculate_bmr().unwrap();
        assert!((bmr - expected).abs() < 1e-6);
    }

    #[test]
    fn test_update_calorie_target_applies_activity_and_goal() {
        let dob = years_ago(30).checked_sub_days(Days::new(1)).unwrap();
        let mut user = male_5_10(dob);
        user.add_weight_entry(WeightEntry::new(today(), 180.0, 15.0).unwrap());
        let bmr = user.calculate_bmr().unwrap();

        user.set_activity_level(ActivityLevel::VeryActive);
        user.set_goal(FitnessGoal::WeightLoss);
        let target = user.update_calorie_target();
        assert_eq!(target, (bmr * 1.725 - 500.0) as i32);
        assert_eq!(user.calorie_target(), target);

        user.set_goal(FitnessGoal::MuscleGain);
        assert_eq!(user.update_calorie_target(), (bmr * 1.725 + 300.0) as i32);
    }

    #[test]
    fn test_bmi_category_follows_current_weight() {
        let mut user = male_5_10(years_ago(30));
        assert_eq!(user.bmi_category().unwrap(), None);

        user.add_weight_entry(WeightEntry::new(today(), 150.0, 15.0).unwrap());
        assert_eq!(user.bmi_category().unwrap(), Some(BmiCategory::Normal));

        user.add_weight_entry(WeightEntry::new(today(), 215.0, 25.0).unwrap());
        assert_eq!(user.bmi_category().unwrap(), Some(BmiCategory::Obese));
    }

    #[test]
    fn test_extreme_height_does_not_overflow() {
        let height = Height::new(i32::MAX, 11).unwrap();
        assert_eq!(height.total_inches(), f64::from(i32::MAX) * 12.0 + 11.0);

        let mut user = User::new(i32::MAX, 0, years_ago(30), FitnessGoal::Maintenance, "male").unwrap();
        user.add_weight_entry(WeightEntry::new(today(), 180.0, 15.0).unwrap());

        let bmi = user.current_bmi().unwrap().unwrap();
        assert!(bmi.is_finite() && bmi > 0.0);
        assert!(user.calculate_bmr().unwrap().is_finite());
    }

    #[test]
    fn test_summary() {
        let mut user = male_5_10(years_ago(40));
        user.add_weight_entry(WeightEntry::new(today(), 180.0, 15.0).unwrap());
        user.update_calorie_target();

        let summary = user.summary();
        assert_eq!(summary.age, 40);
        assert_eq!(summary.current_weight_lbs, Some(180.0));
        assert_eq!(summary.bmi_category, Some(BmiCategory::Overweight));
        assert_eq!(summary.calorie_target, user.calorie_target());
        assert_eq!(summary.weight_entries, 1);
    }
}
