//! FitTrack
//!
//! Command-line front end over the fitness tracking store. Every command
//! prints its result as JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fittrack::build_info;
use fittrack::config::{Config, DATABASE_PATH_VAR};
use fittrack::db::{self, catalog, meals, migrations, users, workouts, Database, DbError};
use fittrack::models::clock::today;
use fittrack::models::{
    ActivityLevel, BodyMeasurement, BodySizes, Exercise, ExerciseCategory, FitnessGoal, Food, Meal,
    Nutrition, User, WeightEntry, WorkoutSession,
};

#[derive(Debug, Parser)]
#[command(name = "fittrack", about = "Personal fitness tracking", version)]
struct Cli {
    /// Database file; defaults to `data/fittrack.db` under the project root
    #[arg(long, global = true, value_name = "path", env = DATABASE_PATH_VAR)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or upgrade the database schema
    Init,
    /// User profiles
    User {
        #[command(subcommand)]
        action: UserCommand,
    },
    /// Weight log
    Weight {
        #[command(subcommand)]
        action: WeightCommand,
    },
    /// Body measurements
    Measure {
        #[command(subcommand)]
        action: MeasureCommand,
    },
    /// Food catalog
    Food {
        #[command(subcommand)]
        action: FoodCommand,
    },
    /// Exercise categories
    Category {
        #[command(subcommand)]
        action: CategoryCommand,
    },
    /// Meals and logged food
    Meal {
        #[command(subcommand)]
        action: MealCommand,
    },
    /// Workout sessions, exercises and sets
    Workout {
        #[command(subcommand)]
        action: WorkoutCommand,
    },
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    Add {
        #[arg(long)]
        feet: i32,
        #[arg(long)]
        inches: i32,
        /// Date of birth, `YYYY-MM-DD`
        #[arg(long)]
        dob: NaiveDate,
        #[arg(long)]
        gender: String,
        #[arg(long, value_parser = parse_goal)]
        goal: FitnessGoal,
        #[arg(long, value_parser = parse_activity)]
        activity: Option<ActivityLevel>,
    },
    /// Profile with derived metrics
    Show { id: i64 },
    /// Summaries of every stored user
    List,
    SetGoal {
        id: i64,
        #[arg(value_parser = parse_goal)]
        goal: FitnessGoal,
    },
    SetActivity {
        id: i64,
        #[arg(value_parser = parse_activity)]
        level: ActivityLevel,
    },
    /// Delete a user and everything they logged
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
enum WeightCommand {
    Add {
        user: i64,
        lbs: f64,
        body_fat: f64,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Subcommand)]
enum MeasureCommand {
    Add {
        user: i64,
        #[arg(long)]
        waist: f64,
        #[arg(long)]
        chest: f64,
        #[arg(long)]
        arm: f64,
        #[arg(long)]
        thigh: f64,
        #[arg(long)]
        hip: f64,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Subcommand)]
enum FoodCommand {
    Add {
        name: String,
        grams: f64,
        calories: f64,
        protein: f64,
        carbohydrates: f64,
        fats: f64,
    },
    List,
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    Add {
        name: String,
        #[arg(default_value = "")]
        description: String,
    },
    List,
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
enum MealCommand {
    Add {
        user: i64,
        name: String,
        /// When the meal was eaten, `YYYY-MM-DDTHH:MM:SS`; defaults to now
        #[arg(long)]
        at: Option<NaiveDateTime>,
    },
    /// Log servings of a catalog food into a meal
    Item { meal: i64, food: i64, servings: f64 },
    /// Summaries of all meals of a user
    Show { user: i64 },
}

#[derive(Debug, Subcommand)]
enum WorkoutCommand {
    Add {
        user: i64,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Exercise { session: i64, name: String, category: i64 },
    Set { exercise: i64, number: i32, lbs: f64, reps: i32 },
}

fn parse_goal(value: &str) -> Result<FitnessGoal, String> {
    FitnessGoal::from_str(value).ok_or_else(|| format!("unknown goal '{value}'"))
}

fn parse_activity(value: &str) -> Result<ActivityLevel, String> {
    ActivityLevel::from_str(value).ok_or_else(|| format!("unknown activity level '{value}'"))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn require_user(conn: &Connection, id: i64) -> db::DbResult<User> {
    users::get_user(conn, id)?.ok_or(DbError::NotFound { entity: "user", id })
}

/// Recompute the calorie target after a profile or weight change and store it
fn refresh_calorie_target(conn: &Connection, user: &mut User) -> db::DbResult<()> {
    let target = user.update_calorie_target();
    users::update_user_profile(conn, user)?;
    info!(user_id = ?user.id(), calorie_target = target, "Updated calorie target");
    Ok(())
}

fn run_user(conn: &Connection, action: UserCommand) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        UserCommand::Add {
            feet,
            inches,
            dob,
            gender,
            goal,
            activity,
        } => {
            let mut user = User::new(feet, inches, dob, goal, &gender)?;
            if let Some(level) = activity {
                user.set_activity_level(level);
            }
            users::insert_user(conn, &mut user)?;
            print_json(&user.summary())
        }
        UserCommand::Show { id } => print_json(&require_user(conn, id)?.summary()),
        UserCommand::List => {
            let summaries: Vec<_> = users::list_users(conn)?.iter().map(User::summary).collect();
            print_json(&summaries)
        }
        UserCommand::SetGoal { id, goal } => {
            let mut user = require_user(conn, id)?;
            user.set_goal(goal);
            refresh_calorie_target(conn, &mut user)?;
            print_json(&user.summary())
        }
        UserCommand::SetActivity { id, level } => {
            let mut user = require_user(conn, id)?;
            user.set_activity_level(level);
            refresh_calorie_target(conn, &mut user)?;
            print_json(&user.summary())
        }
        UserCommand::Delete { id } => print_json(&json!({ "deleted": users::delete_user(conn, id)? })),
    }
}

fn run_meal(conn: &Connection, action: MealCommand) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MealCommand::Add { user, name, at } => {
            let at = at.unwrap_or_else(|| chrono::Local::now().naive_local());
            let mut meal = Meal::new(name, at, None)?;
            meals::insert_meal(conn, user, &mut meal)?;
            print_json(&meal)
        }
        MealCommand::Item { meal, food, servings } => print_json(&meals::add_food_item(conn, meal, food, servings)?),
        MealCommand::Show { user } => {
            let summaries: Vec<String> = meals::list_meals_for_user(conn, user)?
                .iter()
                .map(Meal::meal_summary)
                .collect();
            print_json(&summaries)
        }
    }
}

fn run_workout(conn: &Connection, action: WorkoutCommand) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WorkoutCommand::Add { user, date } => {
            let mut session = WorkoutSession::new(date.unwrap_or_else(today))?;
            workouts::insert_session(conn, user, &mut session)?;
            print_json(&session)
        }
        WorkoutCommand::Exercise { session, name, category } => {
            if catalog::get_category(conn, category)?.is_none() {
                return Err(DbError::NotFound {
                    entity: "exercise category",
                    id: category,
                }
                .into());
            }
            let mut exercise = Exercise::new(name, category);
            workouts::add_exercise(conn, session, &mut exercise)?;
            print_json(&exercise)
        }
        WorkoutCommand::Set {
            exercise,
            number,
            lbs,
            reps,
        } => print_json(&workouts::add_set(conn, exercise, number, lbs, reps)?),
    }
}

fn run(conn: &Connection, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Init => print_json(&json!({
            "applied_schema_version": migrations::get_schema_version(conn)?,
            "build": build_info::BuildInfo::current(),
        })),
        Command::User { action } => run_user(conn, action),
        Command::Weight {
            action: WeightCommand::Add {
                user,
                lbs,
                body_fat,
                date,
            },
        } => {
            let mut entry = WeightEntry::new(date.unwrap_or_else(today), lbs, body_fat)?;
            users::add_weight_entry(conn, user, &mut entry)?;
            let mut user = require_user(conn, user)?;
            refresh_calorie_target(conn, &mut user)?;
            print_json(&user.summary())
        }
        Command::Measure {
            action: MeasureCommand::Add {
                user,
                waist,
                chest,
                arm,
                thigh,
                hip,
                date,
            },
        } => {
            let sizes = BodySizes {
                waist,
                chest,
                arm,
                thigh,
                hip,
            };
            let mut measurement = BodyMeasurement::new(date.unwrap_or_else(today), sizes)?;
            users::add_body_measurement(conn, user, &mut measurement)?;
            print_json(&measurement)
        }
        Command::Food { action } => match action {
            FoodCommand::Add {
                name,
                grams,
                calories,
                protein,
                carbohydrates,
                fats,
            } => {
                let mut food = Food::new(name, grams, Nutrition::new(calories, protein, carbohydrates, fats))?;
                catalog::insert_food(conn, &mut food)?;
                print_json(&food)
            }
            FoodCommand::List => print_json(&catalog::list_foods(conn)?),
        },
        Command::Category { action } => match action {
            CategoryCommand::Add { name, description } => {
                let mut category = ExerciseCategory::new(name, description);
                catalog::insert_category(conn, &mut category)?;
                print_json(&category)
            }
            CategoryCommand::List => print_json(&catalog::list_categories(conn)?),
            CategoryCommand::Delete { id } => print_json(&json!({ "deleted": catalog::delete_category(conn, id)? })),
        },
        Command::Meal { action } => run_meal(conn, action),
        Command::Workout { action } => run_workout(conn, action),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_env().with_database_path(cli.database);

    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner(&config.database_path);

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;
        let version = migrations::get_schema_version(conn)?;
        info!(version, "Database schema ready");
        Ok(())
    })?;

    let conn = database.get_conn()?;
    run(&conn, cli.command)
}
