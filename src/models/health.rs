//! Health metric formulas
//!
//! Closed-form calculations used by the user profile:
//!
//! - BMI (imperial): `weight_lbs / height_in^2 x 703`
//! - BMR, Mifflin-St Jeor (1990):
//!   `10 x weight_kg + 6.25 x height_cm - 5 x age + s`, where `s` is +5 for
//!   men and -161 for women
//! - TDEE: BMR scaled by an activity multiplier
//! - Calorie target: TDEE adjusted for the fitness goal, truncated toward zero

use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};

pub const KG_PER_LB: f64 = 0.453592;
pub const CM_PER_INCH: f64 = 2.54;
pub const BMI_IMPERIAL_FACTOR: f64 = 703.0;

pub const WEIGHT_LOSS_DEFICIT: f64 = 500.0;
pub const MUSCLE_GAIN_SURPLUS: f64 = 300.0;

/// Biological sex used by the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Parse "male"/"female", ignoring case
    pub fn parse(s: &str) -> ModelResult<Self> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ModelError::validation(
                "gender",
                format!("must be 'male' or 'female', got '{}'", s),
            )),
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// 1-3 days/week
    LightlyActive,
    /// 3-5 days/week
    ModeratelyActive,
    /// 6-7 days/week
    VeryActive,
    /// Hard training twice a day
    ExtremelyActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "lightly_active" | "lightlyactive" | "light" => Some(ActivityLevel::LightlyActive),
            "moderately_active" | "moderatelyactive" | "moderate" => Some(ActivityLevel::ModeratelyActive),
            "very_active" | "veryactive" => Some(ActivityLevel::VeryActive),
            "extremely_active" | "extremelyactive" | "extreme" => Some(ActivityLevel::ExtremelyActive),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }
}

/// What the user is training for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    Endurance,
    Strength,
    Maintenance,
    GeneralFitness,
}

impl FitnessGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::WeightLoss => "weight_loss",
            FitnessGoal::MuscleGain => "muscle_gain",
            FitnessGoal::Endurance => "endurance",
            FitnessGoal::Strength => "strength",
            FitnessGoal::Maintenance => "maintenance",
            FitnessGoal::GeneralFitness => "general_fitness",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "weight_loss" | "weightloss" => Some(FitnessGoal::WeightLoss),
            "muscle_gain" | "musclegain" => Some(FitnessGoal::MuscleGain),
            "endurance" => Some(FitnessGoal::Endurance),
            "strength" => Some(FitnessGoal::Strength),
            "maintenance" => Some(FitnessGoal::Maintenance),
            "general_fitness" | "generalfitness" => Some(FitnessGoal::GeneralFitness),
            _ => None,
        }
    }

    /// Calories added to (or removed from) TDEE for this goal
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            FitnessGoal::WeightLoss => -WEIGHT_LOSS_DEFICIT,
            FitnessGoal::MuscleGain => MUSCLE_GAIN_SURPLUS,
            _ => 0.0,
        }
    }
}

/// WHO adult BMI bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

/// BMI from pounds and inches
pub fn bmi(weight_lbs: f64, height_inches: f64) -> ModelResult<f64> {
    if !(weight_lbs > 0.0) {
        return Err(ModelError::validation(
            "weight",
            format!("must be greater than 0, got {}", weight_lbs),
        ));
    }
    if height_inches <= 0.0 {
        return Err(ModelError::InvalidState(format!(
            "BMI is undefined for a height of {} inches",
            height_inches
        )));
    }
    Ok(weight_lbs / (height_inches * height_inches) * BMI_IMPERIAL_FACTOR)
}

/// Mifflin-St Jeor BMR from imperial inputs
pub fn mifflin_st_jeor(weight_lbs: f64, height_inches: f64, age: i32, gender: Gender) -> f64 {
    let weight_kg = weight_lbs * KG_PER_LB;
    let height_cm = height_inches * CM_PER_INCH;
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);

    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

pub fn tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Daily calorie target for a BMR, truncated toward zero
pub fn calorie_target(bmr: f64, activity_level: ActivityLevel, goal: FitnessGoal) -> i32 {
    (tdee(bmr, activity_level) + goal.calorie_adjustment()).trunc() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_bmi_formula() {
        let value = bmi(180.0, 70.0).unwrap();
        assert!((value - 180.0 / 4900.0 * 703.0).abs() < 1e-9);
    }

    #[test]
    fn test_bmi_holds_across_heights() {
        for feet in 1..=8 {
            for inches in 0..=11 {
                let total = f64::from(feet * 12 + inches);
                for weight in [1.0, 97.5, 150.0, 310.25] {
                    let expected = weight / (total * total) * 703.0;
                    assert!((bmi(weight, total).unwrap() - expected).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_bmi_errors() {
        assert!(bmi(0.0, 70.0).unwrap_err().is_validation());
        assert!(matches!(bmi(150.0, 0.0), Err(ModelError::InvalidState(_))));
    }

    #[test]
    fn test_mifflin_st_jeor_male() {
        let expected = 10.0 * (180.0 * 0.453592) + 6.25 * (70.0 * 2.54) - 5.0 * 30.0 + 5.0;
        assert!((mifflin_st_jeor(180.0, 70.0, 30, Gender::Male) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_mifflin_st_jeor_female_offset() {
        let male = mifflin_st_jeor(140.0, 64.0, 40, Gender::Male);
        let female = mifflin_st_jeor(140.0, 64.0, 40, Gender::Female);
        assert!((male - female - 166.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(FitnessGoal::WeightLoss, 1540)]
    #[case(FitnessGoal::MuscleGain, 2340)]
    #[case(FitnessGoal::Maintenance, 2040)]
    #[case(FitnessGoal::Endurance, 2040)]
    #[case(FitnessGoal::Strength, 2040)]
    #[case(FitnessGoal::GeneralFitness, 2040)]
    fn test_calorie_target_sedentary(#[case] goal: FitnessGoal, #[case] expected: i32) {
        assert_eq!(calorie_target(1700.0, ActivityLevel::Sedentary, goal), expected);
    }

    #[rstest]
    #[case(ActivityLevel::Sedentary, 1.2)]
    #[case(ActivityLevel::LightlyActive, 1.375)]
    #[case(ActivityLevel::ModeratelyActive, 1.55)]
    #[case(ActivityLevel::VeryActive, 1.725)]
    #[case(ActivityLevel::ExtremelyActive, 1.9)]
    fn test_activity_multipliers(#[case] level: ActivityLevel, #[case] multiplier: f64) {
        assert_eq!(level.multiplier(), multiplier);
        assert_eq!(ActivityLevel::from_str(level.as_str()), Some(level));
    }

    #[test]
    fn test_calorie_target_truncates() {
        // 1000.9 * 1.2 = 1201.08
        assert_eq!(calorie_target(1000.9, ActivityLevel::Sedentary, FitnessGoal::Maintenance), 1201);
    }

    #[test]
    fn test_gender_parse_ignores_case() {
        assert_eq!(Gender::parse("MALE").unwrap(), Gender::Male);
        assert_eq!(Gender::parse("Female").unwrap(), Gender::Female);
        assert!(Gender::parse("other").unwrap_err().is_validation());
        assert!(Gender::parse(" male").is_err());
    }

    #[test]
    fn test_goal_round_trip() {
        for goal in [
            FitnessGoal::WeightLoss,
            FitnessGoal::MuscleGain,
            FitnessGoal::Endurance,
            FitnessGoal::Strength,
            FitnessGoal::Maintenance,
            FitnessGoal::GeneralFitness,
        ] {
            assert_eq!(FitnessGoal::from_str(goal.as_str()), Some(goal));
        }
        assert_eq!(FitnessGoal::from_str("bulking"), None);
    }

    #[test]
    fn test_bmi_category() {
        assert_eq!(BmiCategory::from_bmi(17.0), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(27.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }
}
