//! Cohort schedule — one Monday-aligned start date per weekly cohort.

use crate::{
    config::GeneratorConfig,
    error::{GenError, GenResult},
    types::CohortIndex,
};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    pub index:      CohortIndex,
    pub start_date: NaiveDate,
    pub user_count: usize,
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Build `cohort_count` consecutive weekly cohorts, the first being the
/// week that contains `start_date`.
pub fn build_schedule(
    start_date: NaiveDate,
    users_per_cohort: &[usize],
    cohort_count: usize,
) -> GenResult<Vec<Cohort>> {
    if users_per_cohort.len() != cohort_count {
        return Err(GenError::CohortCountMismatch {
            expected: cohort_count,
            actual:   users_per_cohort.len(),
        });
    }

    let mut cohorts = Vec::with_capacity(cohort_count);
    let mut candidate = start_date;
    while cohorts.len() < cohort_count {
        let index = cohorts.len();
        let monday = week_start(candidate);
        cohorts.push(Cohort {
            index,
            start_date: monday,
            user_count: users_per_cohort[index],
        });
        candidate = monday + Duration::weeks(1);
    }
    Ok(cohorts)
}

impl GeneratorConfig {
    pub fn schedule(&self) -> GenResult<Vec<Cohort>> {
        build_schedule(self.start_date, &self.users_per_cohort, self.cohort_count)
    }
}
