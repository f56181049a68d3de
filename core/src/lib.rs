//! Synthetic weekly-cohort activity data for cohort-retention analysis.
//!
//! One run produces a CSV of `user_id,signup_date,event_date` rows from a
//! seeded retention model. See `generator::Generator`.

pub mod config;
pub mod error;
pub mod generator;
pub mod rng;
pub mod schedule;
pub mod simulator;
pub mod sink;
pub mod summary;
pub mod types;
pub mod validate;
