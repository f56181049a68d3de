//! Retention simulator — weekly engagement traces for synthetic users.
//!
//! For every cohort, for every user:
//!   1. Emit the signup row (event_date == signup_date).
//!   2. For each week after signup, roll whether the user is still active
//!      using the base retention curve adjusted by season and maturity,
//!      plus per-user Gaussian noise.
//!   3. The first miss churns the user. A churned user may emit exactly one
//!      late re-engagement row, then stops for good.
//!
//! Re-engagement rows may land past the nominal horizon. Consumers that
//! assume a bounded observation window should expect that.

use crate::{
    config::GeneratorConfig,
    rng::Draws,
    schedule::Cohort,
    types::{CohortIndex, UserId, Week},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

/// One CSV row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    pub user_id:     UserId,
    pub signup_date: NaiveDate,
    pub event_date:  NaiveDate,
}

impl EventRow {
    pub fn is_signup(&self) -> bool {
        self.event_date == self.signup_date
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticUser {
    pub id:     UserId,
    pub cohort: Cohort,
}

impl SyntheticUser {
    /// `seq` is the 1-based position across all cohorts.
    pub fn new(seq: usize, cohort: Cohort) -> Self {
        Self { id: format!("U{seq:04}"), cohort }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserState {
    Active,
    /// Terminal. Reached on the first missed week.
    Churned { week: Week, reengaged: bool },
}

impl UserState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Churned { .. })
    }
}

// ── Model ────────────────────────────────────────────────────────────────────

pub struct RetentionModel<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> RetentionModel<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn horizon(&self) -> Week {
        self.config.horizon()
    }

    /// Seasonal multiplier from the last band starting at or before `index`.
    pub fn season_factor(&self, index: CohortIndex) -> f64 {
        self.config
            .season_bands
            .iter()
            .take_while(|band| band.from_index <= index)
            .last()
            .map(|band| band.factor)
            .unwrap_or(1.0)
    }

    pub fn maturity_bonus(&self, index: CohortIndex) -> f64 {
        let m = &self.config.maturity;
        if index > m.start_index {
            (index - m.start_index) as f64 * m.step
        } else {
            0.0
        }
    }

    /// Continuation probability for `week` before individual noise.
    pub fn base_probability(&self, index: CohortIndex, week: Week) -> f64 {
        let base = self.config.base_retention[week] / 100.0;
        let prob = base * self.season_factor(index) * (1.0 + self.maturity_bonus(index));
        prob.min(self.config.probability_cap)
    }

    /// Apply the noise term and clamp into the configured bounds.
    pub fn noisy_probability(&self, prob: f64, noise: f64) -> f64 {
        (prob + noise).clamp(self.config.min_probability, self.config.max_probability)
    }

    fn offset_date(&self, start: NaiveDate, weeks: i64, days: i64) -> NaiveDate {
        start + Duration::weeks(weeks) + Duration::days(days)
    }

    /// Roll one week for an active user. Returns the user's next state.
    pub fn step(
        &self,
        user: &SyntheticUser,
        week: Week,
        draws: &mut impl Draws,
        rows: &mut Vec<EventRow>,
    ) -> UserState {
        let cohort = &user.cohort;
        let prob = self.base_probability(cohort.index, week);
        let noise = draws.gauss(0.0, self.config.noise_std_dev);
        let prob = self.noisy_probability(prob, noise);

        if draws.uniform() < prob {
            let day = draws.int_inclusive(0, self.config.max_day_jitter);
            rows.push(EventRow {
                user_id:     user.id.clone(),
                signup_date: cohort.start_date,
                event_date:  self.offset_date(cohort.start_date, week as i64, day),
            });
            return UserState::Active;
        }

        let re = &self.config.reengagement;
        let reengaged = draws.uniform() < re.probability;
        if reengaged {
            let ahead = draws.int_inclusive(re.min_weeks_ahead as i64, re.max_weeks_ahead as i64);
            let day = draws.int_inclusive(0, self.config.max_day_jitter);
            rows.push(EventRow {
                user_id:     user.id.clone(),
                signup_date: cohort.start_date,
                event_date:  self.offset_date(cohort.start_date, week as i64 + ahead, day),
            });
        }
        UserState::Churned { week, reengaged }
    }

    /// Full trace for one user: the signup row, then weekly rolls until
    /// churn or the horizon.
    pub fn simulate_user(
        &self,
        user: &SyntheticUser,
        draws: &mut impl Draws,
        rows: &mut Vec<EventRow>,
    ) -> UserState {
        rows.push(EventRow {
            user_id:     user.id.clone(),
            signup_date: user.cohort.start_date,
            event_date:  user.cohort.start_date,
        });

        let mut state = UserState::Active;
        for week in 1..=self.horizon() {
            state = self.step(user, week, draws, rows);
            if state.is_terminal() {
                break;
            }
        }
        state
    }

    /// Simulate every cohort in order. User ids run sequentially across
    /// cohorts starting at `U0001`.
    pub fn simulate(&self, cohorts: &[Cohort], draws: &mut impl Draws) -> Vec<EventRow> {
        let mut rows = Vec::new();
        let mut seq = 1;

        for cohort in cohorts {
            let before = rows.len();
            let mut churned = 0usize;
            let mut reengaged = 0usize;

            for _ in 0..cohort.user_count {
                let user = SyntheticUser::new(seq, *cohort);
                if let UserState::Churned { reengaged: r, .. } =
                    self.simulate_user(&user, draws, &mut rows)
                {
                    churned += 1;
                    reengaged += r as usize;
                }
                seq += 1;
            }

            log::debug!(
                "cohort {} ({}): {} users, {} rows, {} churned, {} re-engaged",
                cohort.index,
                cohort.start_date,
                cohort.user_count,
                rows.len() - before,
                churned,
                reengaged,
            );
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;

    #[test]
    fn season_bands_match_calendar_degradation() {
        let config = GeneratorConfig::default();
        let model = RetentionModel::new(&config);
        assert_eq!(model.season_factor(0), 1.0);
        assert_eq!(model.season_factor(7), 1.0);
        assert_eq!(model.season_factor(8), 0.85);
        assert_eq!(model.season_factor(11), 0.85);
        assert_eq!(model.season_factor(12), 0.7);
        assert_eq!(model.season_factor(15), 0.7);
    }

    #[test]
    fn maturity_bonus_starts_after_index_four() {
        let config = GeneratorConfig::default();
        let model = RetentionModel::new(&config);
        assert_eq!(model.maturity_bonus(0), 0.0);
        assert_eq!(model.maturity_bonus(4), 0.0);
        assert!((model.maturity_bonus(5) - 0.02).abs() < 1e-12);
        assert!((model.maturity_bonus(15) - 0.22).abs() < 1e-12);
    }

    #[test]
    fn user_ids_are_zero_padded() {
        let cohort = Cohort {
            index: 0,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            user_count: 1,
        };
        assert_eq!(SyntheticUser::new(7, cohort).id, "U0007");
        assert_eq!(SyntheticUser::new(1010, cohort).id, "U1010");
    }

    #[test]
    fn signup_row_is_first_for_every_user() {
        let config = GeneratorConfig::default();
        let cohorts = config.schedule().unwrap();
        let mut rng = SimRng::new(config.seed);
        let rows = RetentionModel::new(&config).simulate(&cohorts, &mut rng);

        let mut previous: Option<&str> = None;
        for row in &rows {
            if previous != Some(row.user_id.as_str()) {
                assert!(row.is_signup(), "first row of {} is not signup", row.user_id);
                previous = Some(row.user_id.as_str());
            }
        }
    }
}
