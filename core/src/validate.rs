//! Output contract check.
//!
//! The analysis tool that loads this file rejects uploads over 10,000
//! rows, and rows with a blank user id, an event before signup, or a date
//! later than today. Any of those aborts the run before anything is
//! written. Soft limits come back as warnings.

use crate::{
    error::{GenError, GenResult},
    simulator::EventRow,
};
use chrono::NaiveDate;
use std::collections::HashMap;

pub const MAX_UPLOAD_ROWS: usize = 10_000;
pub const MIN_MEANINGFUL_USERS: usize = 10;

/// Check `rows` against the upload rules as of `today`.
pub fn check_rows(rows: &[EventRow], today: NaiveDate) -> GenResult<Vec<String>> {
    if rows.is_empty() {
        return Err(violation(0, "no rows generated".into()));
    }
    if rows.len() > MAX_UPLOAD_ROWS {
        return Err(violation(
            MAX_UPLOAD_ROWS,
            format!("{} rows exceeds the {MAX_UPLOAD_ROWS}-row upload limit", rows.len()),
        ));
    }

    // user_id -> (first row index, signup rows seen)
    let mut signups: HashMap<&str, (usize, usize)> = HashMap::new();

    for (i, row) in rows.iter().enumerate() {
        if row.user_id.trim().is_empty() {
            return Err(violation(i, "blank user_id".into()));
        }
        if row.signup_date > today {
            return Err(violation(i, format!("signup_date {} is after {today}", row.signup_date)));
        }
        if row.event_date > today {
            return Err(violation(i, format!("event_date {} is after {today}", row.event_date)));
        }
        if row.event_date < row.signup_date {
            return Err(violation(
                i,
                format!("event_date {} precedes signup_date {}", row.event_date, row.signup_date),
            ));
        }
        signups.entry(row.user_id.as_str()).or_insert((i, 0)).1 += row.is_signup() as usize;
    }

    let mut users: Vec<_> = signups.into_iter().collect();
    users.sort_by_key(|(_, (first, _))| *first);
    if let Some((user, (first, count))) = users.iter().find(|(_, (_, count))| *count != 1) {
        return Err(violation(*first, format!("user {user} has {count} signup rows")));
    }

    let mut warnings = Vec::new();
    if users.len() < MIN_MEANINGFUL_USERS {
        warnings.push(format!(
            "only {} distinct users; cohort analysis may not be meaningful",
            users.len()
        ));
    }
    for w in &warnings {
        log::warn!("{w}");
    }
    Ok(warnings)
}

fn violation(row: usize, reason: String) -> GenError {
    GenError::ContractViolation { row, reason }
}
