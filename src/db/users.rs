//! User storage
//!
//! Saves and rehydrates the whole user aggregate. Deleting a user removes
//! everything they own through `ON DELETE CASCADE`.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use super::connection::{DbError, DbResult};
use super::meals::{list_meals_for_user, write_meal};
use super::workouts::{list_sessions_for_user, write_session};
use crate::models::{
    ActivityLevel, BodyMeasurement, BodySizes, FitnessGoal, Gender, Height, User, WeightEntry,
};

/// Raw user columns before enum parsing
struct UserRow {
    id: i64,
    height_feet: i32,
    height_inches: i32,
    date_of_birth: NaiveDate,
    gender: String,
    activity_level: String,
    goal: String,
    calorie_target: i32,
}

impl UserRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            height_feet: row.get("height_feet")?,
            height_inches: row.get("height_inches")?,
            date_of_birth: row.get("date_of_birth")?,
            gender: row.get("gender")?,
            activity_level: row.get("activity_level")?,
            goal: row.get("goal")?,
            calorie_target: row.get("calorie_target")?,
        })
    }

    /// Rebuild the aggregate, loading owned collections
    fn into_user(self, conn: &Connection) -> DbResult<User> {
        let gender = Gender::parse(&self.gender)
            .map_err(|_| DbError::Corrupt(format!("user {} has gender '{}'", self.id, self.gender)))?;
        let activity_level = ActivityLevel::from_str(&self.activity_level).ok_or_else(|| {
            DbError::Corrupt(format!("user {} has activity level '{}'", self.id, self.activity_level))
        })?;
        let goal = FitnessGoal::from_str(&self.goal)
            .ok_or_else(|| DbError::Corrupt(format!("user {} has goal '{}'", self.id, self.goal)))?;

        Ok(User::restore(
            self.id,
            Height {
                feet: self.height_feet,
                inches: self.height_inches,
            },
            self.date_of_birth,
            gender,
            activity_level,
            goal,
            self.calorie_target,
            list_weight_entries(conn, self.id)?,
            list_body_measurements(conn, self.id)?,
            list_sessions_for_user(conn, self.id)?,
            list_meals_for_user(conn, self.id)?,
        ))
    }
}

fn weight_entry_from_row(row: &Row) -> rusqlite::Result<WeightEntry> {
    Ok(WeightEntry::restore(
        row.get("id")?,
        row.get("entry_date")?,
        row.get("weight_lbs")?,
        row.get("body_fat_percentage")?,
    ))
}

fn body_measurement_from_row(row: &Row) -> rusqlite::Result<BodyMeasurement> {
    Ok(BodyMeasurement::restore(
        row.get("id")?,
        row.get("measurement_date")?,
        BodySizes {
            waist: row.get("waist")?,
            chest: row.get("chest")?,
            arm: row.get("arm")?,
            thigh: row.get("thigh")?,
            hip: row.get("hip")?,
        },
    ))
}

fn write_weight_entry(conn: &Connection, user_id: i64, entry: &mut WeightEntry) -> DbResult<i64> {
    conn.execute(
        r#"
        INSERT INTO weight_entries (user_id, entry_date, weight_lbs, body_fat_percentage)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![user_id, entry.entry_date(), entry.weight_lbs(), entry.body_fat_percentage()],
    )?;

    let id = conn.last_insert_rowid();
    entry.set_id(id);
    Ok(id)
}

fn write_body_measurement(conn: &Connection, user_id: i64, measurement: &mut BodyMeasurement) -> DbResult<i64> {
    let sizes = measurement.sizes();
    conn.execute(
        r#"
        INSERT INTO body_measurements (user_id, measurement_date, waist, chest, arm, thigh, hip)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            user_id,
            measurement.measurement_date(),
            sizes.waist,
            sizes.chest,
            sizes.arm,
            sizes.thigh,
            sizes.hip,
        ],
    )?;

    let id = conn.last_insert_rowid();
    measurement.set_id(id);
    Ok(id)
}

/// Insert a user and everything it owns in one transaction.
///
/// Ids are written to a staged copy and handed to the caller only once the
/// commit succeeds; on error `user` is left untouched.
pub fn insert_user(conn: &Connection, user: &mut User) -> DbResult<i64> {
    let mut staged = user.clone();
    let tx = conn.unchecked_transaction()?;

    let height = staged.height();
    tx.execute(
        r#"
        INSERT INTO users (height_feet, height_inches, date_of_birth, gender, activity_level, goal, calorie_target)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            height.feet,
            height.inches,
            staged.date_of_birth(),
            staged.gender().as_str(),
            staged.activity_level().as_str(),
            staged.goal().as_str(),
            staged.calorie_target(),
        ],
    )?;
    let id = tx.last_insert_rowid();
    staged.set_id(id);

    for entry in staged.weight_entries_mut() {
        write_weight_entry(&tx, id, entry)?;
    }
    for measurement in staged.body_measurements_mut() {
        write_body_measurement(&tx, id, measurement)?;
    }
    for session in staged.workout_sessions_mut() {
        write_session(&tx, id, session)?;
    }
    for meal in staged.meals_mut() {
        write_meal(&tx, id, meal)?;
    }

    tx.commit()?;
    *user = staged;
    debug!(user_id = id, "Inserted user");
    Ok(id)
}

/// Load a user with all owned collections
pub fn get_user(conn: &Connection, id: i64) -> DbResult<Option<User>> {
    let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

    let result = stmt.query_row([id], UserRow::from_row);
    match result {
        Ok(row) => Ok(Some(row.into_user(conn)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_users(conn: &Connection) -> DbResult<Vec<User>> {
    let mut stmt = conn.prepare("SELECT * FROM users ORDER BY id")?;
    let rows = stmt
        .query_map([], UserRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(|row| row.into_user(conn)).collect()
}

/// Persist the mutable part of a profile: goal, activity level and calorie target
pub fn update_user_profile(conn: &Connection, user: &User) -> DbResult<bool> {
    let Some(id) = user.id() else {
        return Ok(false);
    };

    let rows = conn.execute(
        r#"
        UPDATE users
        SET activity_level = ?1, goal = ?2, calorie_target = ?3, updated_at = datetime('now')
        WHERE id = ?4
        "#,
        params![
            user.activity_level().as_str(),
            user.goal().as_str(),
            user.calorie_target(),
            id,
        ],
    )?;
    Ok(rows > 0)
}

/// Delete a user and, by cascade, everything they own
pub fn delete_user(conn: &Connection, id: i64) -> DbResult<bool> {
    let rows = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
    if rows > 0 {
        info!(user_id = id, "Deleted user and owned records");
    }
    Ok(rows > 0)
}

fn require_user(conn: &Connection, id: i64) -> DbResult<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users WHERE id = ?1", [id], |row| row.get(0))?;
    if count == 0 {
        return Err(DbError::NotFound { entity: "user", id });
    }
    Ok(())
}

pub fn add_weight_entry(conn: &Connection, user_id: i64, entry: &mut WeightEntry) -> DbResult<i64> {
    require_user(conn, user_id)?;
    let id = write_weight_entry(conn, user_id, entry)?;
    debug!(user_id, weight_entry_id = id, weight_lbs = entry.weight_lbs(), "Added weight entry");
    Ok(id)
}

/// Weight entries in insertion order; the last one is the current weight
pub fn list_weight_entries(conn: &Connection, user_id: i64) -> DbResult<Vec<WeightEntry>> {
    let mut stmt = conn.prepare("SELECT * FROM weight_entries WHERE user_id = ?1 ORDER BY id")?;
    let entries = stmt
        .query_map([user_id], weight_entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

pub fn add_body_measurement(conn: &Connection, user_id: i64, measurement: &mut BodyMeasurement) -> DbResult<i64> {
    require_user(conn, user_id)?;
    let id = write_body_measurement(conn, user_id, measurement)?;
    debug!(user_id, measurement_id = id, "Added body measurement");
    Ok(id)
}

pub fn list_body_measurements(conn: &Connection, user_id: i64) -> DbResult<Vec<BodyMeasurement>> {
    let mut stmt = conn.prepare("SELECT * FROM body_measurements WHERE user_id = ?1 ORDER BY id")?;
    let measurements = stmt
        .query_map([user_id], body_measurement_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(measurements)
}
