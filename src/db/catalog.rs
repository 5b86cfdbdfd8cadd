//! Catalog storage
//!
//! Foods and exercise categories. Both are shared reference data: deleting
//! one that is still referenced is refused.

use rusqlite::{params, Connection, Row};
use tracing::{debug, info, warn};

use super::connection::{DbError, DbResult};
use crate::models::{ExerciseCategory, Food, Nutrition};

// ============================================================================
// Foods
// ============================================================================

fn food_from_row(row: &Row) -> rusqlite::Result<Food> {
    Ok(Food::restore(
        row.get("id")?,
        row.get("name")?,
        row.get("serving_size_grams")?,
        Nutrition {
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbohydrates: row.get("carbohydrates")?,
            fats: row.get("fats")?,
        },
    ))
}

/// Insert a food and assign its id
pub fn insert_food(conn: &Connection, food: &mut Food) -> DbResult<i64> {
    conn.execute(
        r#"
        INSERT INTO foods (name, serving_size_grams, calories, protein, carbohydrates, fats)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            food.name,
            food.serving_size_grams(),
            food.per_serving.calories,
            food.per_serving.protein,
            food.per_serving.carbohydrates,
            food.per_serving.fats,
        ],
    )?;

    let id = conn.last_insert_rowid();
    food.set_id(id);
    debug!(food_id = id, name = %food.name, "Inserted food");
    Ok(id)
}

pub fn get_food(conn: &Connection, id: i64) -> DbResult<Option<Food>> {
    let mut stmt = conn.prepare("SELECT * FROM foods WHERE id = ?1")?;

    let result = stmt.query_row([id], food_from_row);
    match result {
        Ok(food) => Ok(Some(food)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_foods(conn: &Connection) -> DbResult<Vec<Food>> {
    let mut stmt = conn.prepare("SELECT * FROM foods ORDER BY name ASC, id ASC")?;
    let foods = stmt
        .query_map([], food_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(foods)
}

/// Persist a food's current values. Already logged food items keep the
/// nutrition they were logged with.
pub fn update_food(conn: &Connection, food: &Food) -> DbResult<bool> {
    let Some(id) = food.id() else {
        return Ok(false);
    };

    let rows = conn.execute(
        r#"
        UPDATE foods
        SET name = ?1, serving_size_grams = ?2,
            calories = ?3, protein = ?4, carbohydrates = ?5, fats = ?6
        WHERE id = ?7
        "#,
        params![
            food.name,
            food.serving_size_grams(),
            food.per_serving.calories,
            food.per_serving.protein,
            food.per_serving.carbohydrates,
            food.per_serving.fats,
            id,
        ],
    )?;

    Ok(rows > 0)
}

/// Count meal items logged against a food
pub fn get_food_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM meal_food_items WHERE food_id = ?1",
        [id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Delete a food that no meal item refers to.
/// Returns Ok(false) if not found, `Restricted` if still in use.
pub fn delete_food(conn: &Connection, id: i64) -> DbResult<bool> {
    if get_food(conn, id)?.is_none() {
        return Ok(false);
    }

    let references = get_food_usage_count(conn, id)?;
    if references > 0 {
        warn!(food_id = id, references, "Refusing to delete food still in use");
        return Err(DbError::Restricted {
            entity: "food",
            id,
            references,
        });
    }

    let rows = conn.execute("DELETE FROM foods WHERE id = ?1", [id])?;
    info!(food_id = id, "Deleted food");
    Ok(rows > 0)
}

// ============================================================================
// Exercise categories
// ============================================================================

fn category_from_row(row: &Row) -> rusqlite::Result<ExerciseCategory> {
    Ok(ExerciseCategory::restore(
        row.get("id")?,
        row.get("name")?,
        row.get("description")?,
    ))
}

pub fn insert_category(conn: &Connection, category: &mut ExerciseCategory) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO exercise_categories (name, description) VALUES (?1, ?2)",
        params![category.name, category.description],
    )?;

    let id = conn.last_insert_rowid();
    category.set_id(id);
    debug!(category_id = id, name = %category.name, "Inserted exercise category");
    Ok(id)
}

pub fn get_category(conn: &Connection, id: i64) -> DbResult<Option<ExerciseCategory>> {
    let mut stmt = conn.prepare("SELECT * FROM exercise_categories WHERE id = ?1")?;

    let result = stmt.query_row([id], category_from_row);
    match result {
        Ok(category) => Ok(Some(category)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_categories(conn: &Connection) -> DbResult<Vec<ExerciseCategory>> {
    let mut stmt = conn.prepare("SELECT * FROM exercise_categories ORDER BY name ASC, id ASC")?;
    let categories = stmt
        .query_map([], category_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(categories)
}

pub fn get_category_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM exercises WHERE category_id = ?1",
        [id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Delete a category no exercise refers to.
/// Returns Ok(false) if not found, `Restricted` if still in use.
pub fn delete_category(conn: &Connection, id: i64) -> DbResult<bool> {
    if get_category(conn, id)?.is_none() {
        return Ok(false);
    }

    let references = get_category_usage_count(conn, id)?;
    if references > 0 {
        warn!(category_id = id, references, "Refusing to delete category still in use");
        return Err(DbError::Restricted {
            entity: "exercise category",
            id,
            references,
        });
    }

    let rows = conn.execute("DELETE FROM exercise_categories WHERE id = ?1", [id])?;
    info!(category_id = id, "Deleted exercise category");
    Ok(rows > 0)
}
