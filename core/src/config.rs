use crate::{
    error::{GenError, GenResult},
    types::{CohortIndex, Week},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_COHORT_COUNT: usize = 16;
pub const DEFAULT_OUTPUT_PATH: &str = "public/sample_cohort_data.csv";

// ── Retention model parameters ─────────────────────────────────────

/// Multiplier applied to every cohort at or after `from_index`
/// until the next band takes over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonBand {
    pub from_index: CohortIndex,
    pub factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaturityConfig {
    /// Cohorts after this index earn a bonus.
    pub start_index: CohortIndex,
    /// Bonus added per cohort past `start_index`.
    pub step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReengagementConfig {
    pub probability: f64,
    pub min_weeks_ahead: Week,
    pub max_weeks_ahead: Week,
}

// ── Generator config ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub start_date: NaiveDate,
    pub cohort_count: usize,
    pub users_per_cohort: Vec<usize>,
    /// Percent of a cohort expected active in week k. Index 0 is signup.
    pub base_retention: Vec<f64>,
    pub season_bands: Vec<SeasonBand>,
    pub maturity: MaturityConfig,
    /// Cap on the adjusted probability before noise.
    pub probability_cap: f64,
    pub noise_std_dev: f64,
    pub min_probability: f64,
    pub max_probability: f64,
    pub reengagement: ReengagementConfig,
    /// Largest within-week day offset added to an event.
    pub max_day_jitter: i64,
    pub output_path: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid default start date"),
            cohort_count: DEFAULT_COHORT_COUNT,
            users_per_cohort: vec![
                65, 70, 55, 60, 75, 68, 72, 58,
                80, 62, 50, 65, 70, 55, 60, 45,
            ],
            base_retention: vec![
                100.0, 72.0, 55.0, 44.0, 37.0, 32.0, 28.0, 25.0,
                22.0, 20.0, 18.0, 17.0, 16.0, 15.0, 14.0, 13.0,
            ],
            season_bands: vec![
                SeasonBand { from_index: 0,  factor: 1.0  },
                SeasonBand { from_index: 8,  factor: 0.85 },
                SeasonBand { from_index: 12, factor: 0.7  },
            ],
            maturity: MaturityConfig { start_index: 4, step: 0.02 },
            probability_cap: 0.98,
            noise_std_dev: 0.08,
            min_probability: 0.02,
            max_probability: 0.98,
            reengagement: ReengagementConfig {
                probability: 0.05,
                min_weeks_ahead: 1,
                max_weeks_ahead: 3,
            },
            max_day_jitter: 6,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl GeneratorConfig {
    /// Load overrides from a JSON file. Absent fields keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Number of weeks simulated after signup.
    pub fn horizon(&self) -> Week {
        self.base_retention.len().saturating_sub(1)
    }

    pub fn total_users(&self) -> usize {
        self.users_per_cohort.iter().sum()
    }

    /// Reject inconsistent parameters before any simulation runs.
    pub fn validate(&self) -> GenResult<()> {
        if self.cohort_count == 0 {
            return Err(invalid("cohort_count must be > 0"));
        }
        if self.users_per_cohort.len() != self.cohort_count {
            return Err(GenError::CohortCountMismatch {
                expected: self.cohort_count,
                actual:   self.users_per_cohort.len(),
            });
        }
        if self.base_retention.len() < 2 {
            return Err(invalid("base_retention needs at least a signup and one week"));
        }
        if self.base_retention.iter().any(|p| !(0.0..=100.0).contains(p)) {
            return Err(invalid("base_retention values must be percentages in [0, 100]"));
        }
        if self.base_retention.windows(2).any(|w| w[1] > w[0]) {
            return Err(invalid("base_retention must be non-increasing"));
        }
        match self.season_bands.first() {
            Some(band) if band.from_index == 0 => {}
            _ => return Err(invalid("season_bands must start at cohort index 0")),
        }
        if self.season_bands.windows(2).any(|w| w[1].from_index <= w[0].from_index) {
            return Err(invalid("season_bands must be strictly ascending by from_index"));
        }
        if !(0.0 <= self.min_probability
            && self.min_probability <= self.max_probability
            && self.max_probability <= 1.0)
        {
            return Err(invalid("require 0 <= min_probability <= max_probability <= 1"));
        }
        if !(self.probability_cap > 0.0 && self.probability_cap <= 1.0) {
            return Err(invalid("probability_cap must be in (0, 1]"));
        }
        if !(self.noise_std_dev.is_finite() && self.noise_std_dev >= 0.0) {
            return Err(invalid("noise_std_dev must be finite and >= 0"));
        }
        if self.season_bands.iter().any(|b| !(b.factor.is_finite() && b.factor >= 0.0)) {
            return Err(invalid("season_bands factors must be finite and >= 0"));
        }
        if !(self.maturity.step.is_finite() && self.maturity.step >= 0.0) {
            return Err(invalid("maturity.step must be finite and >= 0"));
        }
        let re = &self.reengagement;
        if !(0.0..=1.0).contains(&re.probability) {
            return Err(invalid("reengagement.probability must be in [0, 1]"));
        }
        if re.min_weeks_ahead == 0 || re.min_weeks_ahead > re.max_weeks_ahead {
            return Err(invalid("require 1 <= reengagement.min_weeks_ahead <= max_weeks_ahead"));
        }
        if !(0..=6).contains(&self.max_day_jitter) {
            return Err(invalid("max_day_jitter must stay within one week (0..=6)"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> GenError {
    GenError::InvalidConfig { reason: reason.to_string() }
}
