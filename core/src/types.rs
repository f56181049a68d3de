//! Shared primitive types used across the generator.

/// Zero-based position of a cohort in the schedule.
pub type CohortIndex = usize;

/// Weeks elapsed since a cohort's start date. Week 0 is signup.
pub type Week = usize;

/// A synthetic user identifier, e.g. `U0042`.
pub type UserId = String;
