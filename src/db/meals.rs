//! Meal storage
//!
//! Meals and their food items. Item nutrition is stored as logged and is
//! never recomputed from the food on load.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use super::catalog::get_food;
use super::connection::{DbError, DbResult};
use crate::models::{FoodItem, Meal, Nutrition};

fn food_item_from_row(row: &Row) -> rusqlite::Result<FoodItem> {
    Ok(FoodItem::restore(
        row.get("id")?,
        row.get("food_id")?,
        row.get("food_name")?,
        row.get("servings_consumed")?,
        Nutrition {
            calories: row.get("cached_calories")?,
            protein: row.get("cached_protein")?,
            carbohydrates: row.get("cached_carbohydrates")?,
            fats: row.get("cached_fats")?,
        },
    ))
}

fn load_food_items(conn: &Connection, meal_id: i64) -> DbResult<Vec<FoodItem>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT i.*, f.name AS food_name
        FROM meal_food_items i
        LEFT JOIN foods f ON f.id = i.food_id
        WHERE i.meal_id = ?1
        ORDER BY i.id
        "#,
    )?;
    let items = stmt
        .query_map([meal_id], food_item_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(items)
}

fn write_food_item(conn: &Connection, meal_id: i64, item: &mut FoodItem) -> DbResult<i64> {
    let nutrition = item.nutrition();
    conn.execute(
        r#"
        INSERT INTO meal_food_items (
            meal_id, food_id, servings_consumed,
            cached_calories, cached_protein, cached_carbohydrates, cached_fats
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            meal_id,
            item.food_id(),
            item.servings_consumed(),
            nutrition.calories,
            nutrition.protein,
            nutrition.carbohydrates,
            nutrition.fats,
        ],
    )?;

    let id = conn.last_insert_rowid();
    item.set_id(id);
    Ok(id)
}

/// Write a meal with its items (no transaction)
pub(crate) fn write_meal(conn: &Connection, user_id: i64, meal: &mut Meal) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO meals (user_id, name, eaten_at) VALUES (?1, ?2, ?3)",
        params![user_id, meal.name(), meal.eaten_at()],
    )?;

    let id = conn.last_insert_rowid();
    meal.set_id(id);
    for item in meal.food_items_mut() {
        write_food_item(conn, id, item)?;
    }
    Ok(id)
}

/// Insert a meal for a user in one transaction
pub fn insert_meal(conn: &Connection, user_id: i64, meal: &mut Meal) -> DbResult<i64> {
    // Ids reach the caller's meal only after the commit
    let mut staged = meal.clone();
    let tx = conn.unchecked_transaction()?;
    let id = write_meal(&tx, user_id, &mut staged)?;
    tx.commit()?;
    *meal = staged;

    debug!(user_id, meal_id = id, items = meal.food_items().len(), "Inserted meal");
    Ok(id)
}

pub fn get_meal(conn: &Connection, id: i64) -> DbResult<Option<Meal>> {
    let mut stmt = conn.prepare("SELECT name, eaten_at FROM meals WHERE id = ?1")?;

    let result = stmt.query_row([id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, NaiveDateTime>(1)?))
    });
    match result {
        Ok((name, eaten_at)) => Ok(Some(Meal::restore(id, name, eaten_at, load_food_items(conn, id)?))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All meals of a user in insertion order
pub fn list_meals_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Meal>> {
    let mut stmt = conn.prepare("SELECT id, name, eaten_at FROM meals WHERE user_id = ?1 ORDER BY id")?;
    let heads = stmt
        .query_map([user_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, NaiveDateTime>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    heads
        .into_iter()
        .map(|(id, name, eaten_at)| Ok(Meal::restore(id, name, eaten_at, load_food_items(conn, id)?)))
        .collect()
}

/// Log `servings` of a catalog food into a stored meal
pub fn add_food_item(conn: &Connection, meal_id: i64, food_id: i64, servings: f64) -> DbResult<FoodItem> {
    let meals: i64 = conn.query_row("SELECT COUNT(*) FROM meals WHERE id = ?1", [meal_id], |row| row.get(0))?;
    if meals == 0 {
        return Err(DbError::NotFound {
            entity: "meal",
            id: meal_id,
        });
    }

    let food = get_food(conn, food_id)?;
    let mut item = FoodItem::from_lookup(food.as_ref(), servings)?;

    write_food_item(conn, meal_id, &mut item)?;
    debug!(meal_id, food_id, servings, calories = item.calories(), "Logged food item");
    Ok(item)
}

/// Remove a logged item from a meal; Ok(false) if the meal has no such item
pub fn remove_food_item(conn: &Connection, meal_id: i64, item_id: i64) -> DbResult<bool> {
    let rows = conn.execute(
        "DELETE FROM meal_food_items WHERE id = ?1 AND meal_id = ?2",
        [item_id, meal_id],
    )?;
    Ok(rows > 0)
}

pub fn rename_meal(conn: &Connection, id: i64, name: &str) -> DbResult<bool> {
    let Some(mut meal) = get_meal(conn, id)? else {
        return Ok(false);
    };
    meal.set_name(name)?;

    let rows = conn.execute("UPDATE meals SET name = ?1 WHERE id = ?2", params![meal.name(), id])?;
    Ok(rows > 0)
}

/// Delete a meal; its food items go with it
pub fn delete_meal(conn: &Connection, id: i64) -> DbResult<bool> {
    let rows = conn.execute("DELETE FROM meals WHERE id = ?1", [id])?;
    if rows > 0 {
        info!(meal_id = id, "Deleted meal");
    }
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog::{delete_food, insert_food, update_food};
    use crate::db::migrations::run_migrations;
    use crate::models::clock::today;
    use crate::models::{Food, ModelError};
    use chrono::NaiveTime;

    fn conn_with_user() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (height_feet, height_inches, date_of_birth, gender, goal)
             VALUES (5, 4, '1992-11-20', 'female', 'weight_loss')",
            [],
        )
        .unwrap();
        let user_id = conn.last_insert_rowid();
        (conn, user_id)
    }

    fn breakfast() -> Meal {
        let at = today().and_time(NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        Meal::new("Breakfast", at, None).unwrap()
    }

    fn stored_food(conn: &Connection) -> Food {
        let mut food = Food::new("Egg", 50.0, Nutrition::new(72.0, 6.3, 0.4, 4.8)).unwrap();
        insert_food(conn, &mut food).unwrap();
        food
    }

    #[test]
    fn test_meal_round_trip_with_items() {
        let (conn, user_id) = conn_with_user();
        let egg = stored_food(&conn);
        let mut meal = breakfast();
        meal.add_food_item(FoodItem::new(&egg, 3.0));
        insert_meal(&conn, user_id, &mut meal).unwrap();

        let loaded = get_meal(&conn, meal.id().unwrap()).unwrap().unwrap();
        assert_eq!(loaded, meal);
        assert!((loaded.calculate_total_calories() - 216.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_food_item_requires_existing_food() {
        let (conn, user_id) = conn_with_user();
        let mut meal = breakfast();
        let meal_id = insert_meal(&conn, user_id, &mut meal).unwrap();

        let err = add_food_item(&conn, meal_id, 42, 1.0).unwrap_err();
        assert!(matches!(err, DbError::Model(ModelError::MissingReference("food"))));

        let err = add_food_item(&conn, meal_id + 10, 42, 1.0).unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "meal", .. }));
    }

    #[test]
    fn test_logged_nutrition_survives_food_edit() {
        let (conn, user_id) = conn_with_user();
        let mut egg = stored_food(&conn);
        let meal_id = insert_meal(&conn, user_id, &mut breakfast()).unwrap();
        add_food_item(&conn, meal_id, egg.id().unwrap(), 2.0).unwrap();

        egg.per_serving.calories = 1000.0;
        update_food(&conn, &egg).unwrap();

        let loaded = get_meal(&conn, meal_id).unwrap().unwrap();
        assert_eq!(loaded.calculate_total_calories(), 144.0);
    }

    #[test]
    fn test_food_in_use_cannot_be_deleted() {
        let (conn, user_id) = conn_with_user();
        let egg = stored_food(&conn);
        let meal_id = insert_meal(&conn, user_id, &mut breakfast()).unwrap();
        let item = add_food_item(&conn, meal_id, egg.id().unwrap(), 1.0).unwrap();

        let err = delete_food(&conn, egg.id().unwrap()).unwrap_err();
        assert!(matches!(err, DbError::Restricted { references: 1, .. }));

        assert!(remove_food_item(&conn, meal_id, item.id().unwrap()).unwrap());
        assert!(delete_food(&conn, egg.id().unwrap()).unwrap());
    }

    #[test]
    fn test_failed_meal_insert_leaves_no_ids_or_rows() {
        let (conn, user_id) = conn_with_user();
        let egg = stored_food(&conn);
        let mut meal = breakfast();
        meal.add_food_item(FoodItem::new(&egg, 1.0));
        let unsaved = Food::restore(999, "Ghost".to_string(), 100.0, Nutrition::default());
        meal.add_food_item(FoodItem::new(&unsaved, 1.0));

        assert!(insert_meal(&conn, user_id, &mut meal).is_err());
        assert_eq!(meal.id(), None);
        assert!(meal.food_items().iter().all(|item| item.id().is_none()));

        let rows: i64 = conn
            .query_row(
                "SELECT (SELECT COUNT(*) FROM meals) + (SELECT COUNT(*) FROM meal_food_items)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_rename_validates() {
        let (conn, user_id) = conn_with_user();
        let meal_id = insert_meal(&conn, user_id, &mut breakfast()).unwrap();

        assert!(rename_meal(&conn, meal_id, " ").is_err());
        assert!(rename_meal(&conn, meal_id, "Brunch").unwrap());
        assert_eq!(get_meal(&conn, meal_id).unwrap().unwrap().name(), "Brunch");
    }

    #[test]
    fn test_delete_meal_cascades_items() {
        let (conn, user_id) = conn_with_user();
        let egg = stored_food(&conn);
        let meal_id = insert_meal(&conn, user_id, &mut breakfast()).unwrap();
        add_food_item(&conn, meal_id, egg.id().unwrap(), 1.0).unwrap();

        assert!(delete_meal(&conn, meal_id).unwrap());
        let items: i64 = conn
            .query_row("SELECT COUNT(*) FROM meal_food_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(items, 0);
    }
}
