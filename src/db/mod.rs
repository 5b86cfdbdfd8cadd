//! Database module
//!
//! SQLite connection pool, migrations, and storage for each aggregate.

pub mod catalog;
pub mod connection;
pub mod meals;
pub mod migrations;
pub mod users;
pub mod workouts;

pub use connection::{Database, DbError, DbResult};
