//! Retention summary — per-cohort weekly active counts over the generated rows.

use crate::{schedule::Cohort, simulator::EventRow, types::Week};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortRetention {
    pub index:      usize,
    pub start_date: NaiveDate,
    pub size:       usize,
    /// Distinct users with at least one event in week k. Week 0 is signup.
    pub active_by_week: Vec<usize>,
}

impl CohortRetention {
    pub fn percent(&self, week: Week) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        self.active_by_week.get(week).copied().unwrap_or(0) as f64 * 100.0 / self.size as f64
    }
}

/// Weeks beyond `horizon` (late re-engagements) are not counted.
pub fn retention_table(cohorts: &[Cohort], rows: &[EventRow], horizon: Week) -> Vec<CohortRetention> {
    let mut active: HashMap<NaiveDate, Vec<HashSet<&str>>> = cohorts
        .iter()
        .map(|c| (c.start_date, vec![HashSet::new(); horizon + 1]))
        .collect();

    for row in rows {
        let days = (row.event_date - row.signup_date).num_days();
        if days < 0 {
            continue;
        }
        let week = (days / 7) as Week;
        if week > horizon {
            continue;
        }
        if let Some(weeks) = active.get_mut(&row.signup_date) {
            weeks[week].insert(row.user_id.as_str());
        }
    }

    cohorts
        .iter()
        .map(|c| CohortRetention {
            index:      c.index,
            start_date: c.start_date,
            size:       c.user_count,
            active_by_week: active
                .get(&c.start_date)
                .map(|weeks| weeks.iter().map(HashSet::len).collect())
                .unwrap_or_default(),
        })
        .collect()
}

/// One text line per cohort, e.g. `2025-09-01  n=65  100.0  70.8  ...`.
pub fn format_table(table: &[CohortRetention]) -> Vec<String> {
    table
        .iter()
        .map(|c| {
            let cells: Vec<String> = (0..c.active_by_week.len())
                .map(|w| format!("{:5.1}", c.percent(w)))
                .collect();
            format!("{}  n={:<3} {}", c.start_date, c.size, cells.join(" "))
        })
        .collect()
}
