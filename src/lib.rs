//! FitTrack Library
//!
//! Personal fitness tracking: user profiles, body metrics, workouts and meals.

pub mod build_info;
pub mod config;
pub mod db;
pub mod models;
