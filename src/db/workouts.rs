//! Workout storage
//!
//! Sessions, their exercises and sets. Set mutations load the owning
//! exercise and go through its rules before anything is written.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use super::connection::{DbError, DbResult};
use crate::models::{Exercise, ExerciseSet, WorkoutSession};

fn set_from_row(row: &Row) -> rusqlite::Result<ExerciseSet> {
    Ok(ExerciseSet::restore(
        row.get("id")?,
        row.get("set_number")?,
        row.get("weight_lbs")?,
        row.get("repetitions")?,
    ))
}

fn load_sets(conn: &Connection, exercise_id: i64) -> DbResult<Vec<ExerciseSet>> {
    let mut stmt = conn.prepare("SELECT * FROM exercise_sets WHERE exercise_id = ?1 ORDER BY id")?;
    let sets = stmt
        .query_map([exercise_id], set_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(sets)
}

/// Load exercises of a session with their sets, in session order
fn load_exercises(conn: &Connection, session_id: i64) -> DbResult<Vec<Exercise>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category_id FROM exercises WHERE session_id = ?1 ORDER BY position, id",
    )?;
    let heads = stmt
        .query_map([session_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    heads
        .into_iter()
        .map(|(id, name, category_id)| Ok(Exercise::restore(id, name, category_id, load_sets(conn, id)?)))
        .collect()
}

fn write_set(conn: &Connection, exercise_id: i64, set: &mut ExerciseSet) -> DbResult<i64> {
    conn.execute(
        r#"
        INSERT INTO exercise_sets (exercise_id, set_number, weight_lbs, repetitions)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![exercise_id, set.set_number(), set.weight_lbs(), set.repetitions()],
    )?;

    let id = conn.last_insert_rowid();
    set.set_id(id);
    Ok(id)
}

fn write_exercise(conn: &Connection, session_id: i64, position: i64, exercise: &mut Exercise) -> DbResult<i64> {
    conn.execute(
        r#"
        INSERT INTO exercises (session_id, category_id, name, position)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![session_id, exercise.category_id(), exercise.name, position],
    )?;

    let id = conn.last_insert_rowid();
    exercise.set_id(id);
    for set in exercise.sets_mut() {
        write_set(conn, id, set)?;
    }
    Ok(id)
}

/// Write a session with all of its exercises and sets (no transaction)
pub(crate) fn write_session(conn: &Connection, user_id: i64, session: &mut WorkoutSession) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO workout_sessions (user_id, session_date, notes) VALUES (?1, ?2, ?3)",
        params![user_id, session.session_date(), session.notes],
    )?;

    let id = conn.last_insert_rowid();
    session.set_id(id);
    for (position, exercise) in session.exercises_mut().iter_mut().enumerate() {
        write_exercise(conn, id, position as i64, exercise)?;
    }
    Ok(id)
}

/// Insert a session for a user in one transaction
pub fn insert_session(conn: &Connection, user_id: i64, session: &mut WorkoutSession) -> DbResult<i64> {
    // Ids reach the caller's session only after the commit
    let mut staged = session.clone();
    let tx = conn.unchecked_transaction()?;
    let id = write_session(&tx, user_id, &mut staged)?;
    tx.commit()?;
    *session = staged;

    debug!(user_id, session_id = id, exercises = session.exercises().len(), "Inserted workout session");
    Ok(id)
}

fn session_from_parts(
    conn: &Connection,
    id: i64,
    date: NaiveDate,
    notes: Option<String>,
) -> DbResult<WorkoutSession> {
    Ok(WorkoutSession::restore(id, date, notes, load_exercises(conn, id)?))
}

pub fn get_session(conn: &Connection, id: i64) -> DbResult<Option<WorkoutSession>> {
    let mut stmt = conn.prepare("SELECT session_date, notes FROM workout_sessions WHERE id = ?1")?;

    let result = stmt.query_row([id], |row| {
        Ok((row.get::<_, NaiveDate>(0)?, row.get::<_, Option<String>>(1)?))
    });
    match result {
        Ok((date, notes)) => Ok(Some(session_from_parts(conn, id, date, notes)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All sessions of a user in insertion order
pub fn list_sessions_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<WorkoutSession>> {
    let mut stmt = conn.prepare(
        "SELECT id, session_date, notes FROM workout_sessions WHERE user_id = ?1 ORDER BY id",
    )?;
    let heads = stmt
        .query_map([user_id], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<(i64, NaiveDate, Option<String>)>, _>>()?;

    heads
        .into_iter()
        .map(|(id, date, notes)| session_from_parts(conn, id, date, notes))
        .collect()
}

/// Delete a session; its exercises and sets go with it
pub fn delete_session(conn: &Connection, id: i64) -> DbResult<bool> {
    let rows = conn.execute("DELETE FROM workout_sessions WHERE id = ?1", [id])?;
    if rows > 0 {
        info!(session_id = id, "Deleted workout session");
    }
    Ok(rows > 0)
}

/// Append an exercise (and any sets it already has) to a stored session
pub fn add_exercise(conn: &Connection, session_id: i64, exercise: &mut Exercise) -> DbResult<i64> {
    if get_session(conn, session_id)?.is_none() {
        return Err(DbError::NotFound {
            entity: "workout session",
            id: session_id,
        });
    }

    let next_position: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM exercises WHERE session_id = ?1",
        [session_id],
        |row| row.get(0),
    )?;

    let mut staged = exercise.clone();
    let tx = conn.unchecked_transaction()?;
    let id = write_exercise(&tx, session_id, next_position, &mut staged)?;
    tx.commit()?;
    *exercise = staged;

    debug!(session_id, exercise_id = id, "Added exercise");
    Ok(id)
}

pub fn get_exercise(conn: &Connection, id: i64) -> DbResult<Option<Exercise>> {
    let mut stmt = conn.prepare("SELECT name, category_id FROM exercises WHERE id = ?1")?;

    let result = stmt.query_row([id], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)));
    match result {
        Ok((name, category_id)) => Ok(Some(Exercise::restore(id, name, category_id, load_sets(conn, id)?))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn require_exercise(conn: &Connection, id: i64) -> DbResult<Exercise> {
    get_exercise(conn, id)?.ok_or(DbError::NotFound { entity: "exercise", id })
}

/// Add a set to a stored exercise
pub fn add_set(
    conn: &Connection,
    exercise_id: i64,
    set_number: i32,
    weight_lbs: f64,
    repetitions: i32,
) -> DbResult<ExerciseSet> {
    let mut exercise = require_exercise(conn, exercise_id)?;
    let mut set = exercise.add_set(set_number, weight_lbs, repetitions)?.clone();

    write_set(conn, exercise_id, &mut set)?;
    debug!(exercise_id, set_number, "Added set");
    Ok(set)
}

/// Update weight and reps of a stored set; Ok(false) if there is no such set
pub fn update_set(
    conn: &Connection,
    exercise_id: i64,
    set_number: i32,
    weight_lbs: f64,
    repetitions: i32,
) -> DbResult<bool> {
    let mut exercise = require_exercise(conn, exercise_id)?;
    if !exercise.update_set(set_number, weight_lbs, repetitions)? {
        return Ok(false);
    }

    conn.execute(
        r#"
        UPDATE exercise_sets
        SET weight_lbs = ?1, repetitions = ?2, updated_at = datetime('now')
        WHERE exercise_id = ?3 AND set_number = ?4
        "#,
        params![weight_lbs, repetitions, exercise_id, set_number],
    )?;
    Ok(true)
}

/// Remove a stored set; Ok(false) if there is no such set
pub fn remove_set(conn: &Connection, exercise_id: i64, set_number: i32) -> DbResult<bool> {
    let mut exercise = require_exercise(conn, exercise_id)?;
    let Some(removed) = exercise.remove_set(set_number) else {
        return Ok(false);
    };

    let rows = conn.execute(
        "DELETE FROM exercise_sets WHERE id = ?1",
        [removed.id()],
    )?;
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog::insert_category;
    use crate::db::migrations::run_migrations;
    use crate::models::clock::today;
    use crate::models::{ExerciseCategory, ModelError};

    struct Fixture {
        conn: Connection,
        user_id: i64,
        category_id: i64,
    }

    fn fixture() -> Fixture {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (height_feet, height_inches, date_of_birth, gender, goal)
             VALUES (6, 1, '1985-03-02', 'male', 'strength')",
            [],
        )
        .unwrap();
        let user_id = conn.last_insert_rowid();
        let category_id = insert_category(&conn, &mut ExerciseCategory::new("Push", "Pressing")).unwrap();
        Fixture {
            conn,
            user_id,
            category_id,
        }
    }

    fn stored_session(f: &Fixture) -> WorkoutSession {
        let mut session = WorkoutSession::new(today()).unwrap();
        session.notes = Some("Heavy day".to_string());
        let bench = session.add_exercise(Exercise::new("Bench", f.category_id));
        bench.add_set(1, 185.0, 5).unwrap();
        bench.add_set(2, 185.0, 5).unwrap();
        session.add_exercise(Exercise::new("Dips", f.category_id));
        insert_session(&f.conn, f.user_id, &mut session).unwrap();
        session
    }

    #[test]
    fn test_session_round_trip() {
        let f = fixture();
        let session = stored_session(&f);

        let loaded = get_session(&f.conn, session.id().unwrap()).unwrap().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.exercises()[0].name, "Bench");
        assert_eq!(loaded.exercises()[0].sets().len(), 2);

        let all = list_sessions_for_user(&f.conn, f.user_id).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_add_set_rejects_duplicate_number() {
        let f = fixture();
        let session = stored_session(&f);
        let bench_id = session.exercises()[0].id().unwrap();

        let err = add_set(&f.conn, bench_id, 2, 200.0, 3).unwrap_err();
        assert!(matches!(err, DbError::Model(ModelError::DuplicateKey { .. })));

        let set = add_set(&f.conn, bench_id, 3, 195.0, 3).unwrap();
        assert!(set.id().is_some());
        assert_eq!(get_exercise(&f.conn, bench_id).unwrap().unwrap().sets().len(), 3);
    }

    #[test]
    fn test_update_and_remove_set() {
        let f = fixture();
        let session = stored_session(&f);
        let bench_id = session.exercises()[0].id().unwrap();

        assert!(update_set(&f.conn, bench_id, 1, 190.0, 4).unwrap());
        assert!(!update_set(&f.conn, bench_id, 9, 190.0, 4).unwrap());
        assert!(update_set(&f.conn, bench_id, 1, 0.0, 4).is_err());

        let bench = get_exercise(&f.conn, bench_id).unwrap().unwrap();
        let first = bench.find_set(1).unwrap();
        assert_eq!(first.weight_lbs(), 190.0);
        assert_eq!(first.repetitions(), 4);

        assert!(remove_set(&f.conn, bench_id, 1).unwrap());
        assert!(!remove_set(&f.conn, bench_id, 1).unwrap());
        assert_eq!(get_exercise(&f.conn, bench_id).unwrap().unwrap().sets().len(), 1);
    }

    #[test]
    fn test_add_exercise_appends() {
        let f = fixture();
        let session = stored_session(&f);
        let session_id = session.id().unwrap();

        add_exercise(&f.conn, session_id, &mut Exercise::new("Push-up", f.category_id)).unwrap();
        let loaded = get_session(&f.conn, session_id).unwrap().unwrap();
        assert_eq!(loaded.exercises().len(), 3);
        assert_eq!(loaded.exercises()[2].name, "Push-up");

        let err = add_exercise(&f.conn, 999, &mut Exercise::new("Ghost", f.category_id)).unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_delete_session_cascades() {
        let f = fixture();
        let session = stored_session(&f);
        let bench_id = session.exercises()[0].id().unwrap();

        assert!(delete_session(&f.conn, session.id().unwrap()).unwrap());
        assert!(get_exercise(&f.conn, bench_id).unwrap().is_none());
        let sets: i64 = f
            .conn
            .query_row("SELECT COUNT(*) FROM exercise_sets", [], |row| row.get(0))
            .unwrap();
        assert_eq!(sets, 0);
    }

    #[test]
    fn test_failed_session_insert_leaves_no_ids_or_rows() {
        let f = fixture();
        let mut session = WorkoutSession::new(today()).unwrap();
        session.add_exercise(Exercise::new("Squat", f.category_id)).add_set(1, 225.0, 5).unwrap();
        session.add_exercise(Exercise::new("Ghost lift", 999));

        assert!(insert_session(&f.conn, f.user_id, &mut session).is_err());
        assert_eq!(session.id(), None);
        assert!(session.exercises().iter().all(|e| e.id().is_none()));
        assert_eq!(session.exercises()[0].sets()[0].id(), None);

        let rows: i64 = f
            .conn
            .query_row(
                "SELECT (SELECT COUNT(*) FROM workout_sessions) + (SELECT COUNT(*) FROM exercises)
                      + (SELECT COUNT(*) FROM exercise_sets)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_failed_add_exercise_keeps_exercise_unsaved() {
        let f = fixture();
        let session = stored_session(&f);

        let mut ghost = Exercise::new("Ghost lift", 999);
        ghost.add_set(1, 100.0, 5).unwrap();
        assert!(add_exercise(&f.conn, session.id().unwrap(), &mut ghost).is_err());
        assert_eq!(ghost.id(), None);
        assert_eq!(ghost.sets()[0].id(), None);
    }

    #[test]
    fn test_referenced_category_cannot_be_deleted() {
        let f = fixture();
        stored_session(&f);

        let err = crate::db::catalog::delete_category(&f.conn, f.category_id).unwrap_err();
        assert!(matches!(err, DbError::Restricted { references: 2, .. }));
    }
}
