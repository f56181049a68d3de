//! The generator — wires schedule, simulator, contract check and sink.
//!
//! EXECUTION ORDER (fixed):
//!   1. Validate config (fails fast on a cohort/user-count mismatch)
//!   2. Build the cohort schedule
//!   3. Simulate every cohort, every user, from one seeded stream
//!   4. Sort rows by (signup_date, user_id, event_date)
//!   5. Check the output contract
//!   6. Write the CSV
//!
//! The row accumulator lives only inside `generate()` and is returned
//! to the caller. Nothing is global.

use crate::{
    config::GeneratorConfig,
    error::GenResult,
    rng::{Draws, SimRng},
    schedule::Cohort,
    simulator::{EventRow, RetentionModel},
    sink,
    summary::{self, CohortRetention},
    validate,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

/// Sorted rows plus the schedule they were generated from.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub cohorts: Vec<Cohort>,
    pub rows:    Vec<EventRow>,
}

impl Dataset {
    pub fn user_count(&self) -> usize {
        self.cohorts.iter().map(|c| c.user_count).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub seed:         u64,
    pub row_count:    usize,
    pub user_count:   usize,
    pub cohort_count: usize,
    pub output_path:  PathBuf,
    pub warnings:     Vec<String>,
    pub retention:    Vec<CohortRetention>,
}

impl GenerationReport {
    /// The two stdout lines printed after a run.
    pub fn summary_lines(&self) -> [String; 2] {
        [
            format!(
                "Generated {} rows for {} users across {} cohorts",
                self.row_count, self.user_count, self.cohort_count
            ),
            format!("Output: {}", self.output_path.display()),
        ]
    }
}

pub struct Generator {
    pub config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Generate with the configured seed.
    pub fn generate(&self) -> GenResult<Dataset> {
        let mut rng = SimRng::new(self.config.seed);
        self.generate_with(&mut rng)
    }

    /// Generate from an arbitrary draw source.
    pub fn generate_with(&self, draws: &mut impl Draws) -> GenResult<Dataset> {
        let cohorts = self.config.schedule()?;
        let model = RetentionModel::new(&self.config);
        let mut rows = model.simulate(&cohorts, draws);
        sink::sort_rows(&mut rows);
        Ok(Dataset { cohorts, rows })
    }

    /// Generate, check and write the CSV to the configured output path.
    pub fn run(&self) -> GenResult<GenerationReport> {
        self.run_as_of(chrono::Local::now().date_naive())
    }

    /// As `run`, with dates after `today` treated as a contract violation.
    pub fn run_as_of(&self, today: NaiveDate) -> GenResult<GenerationReport> {
        log::info!(
            "generating {} cohorts from {} with seed {}",
            self.config.cohort_count,
            self.config.start_date,
            self.config.seed,
        );

        let dataset = self.generate()?;
        let warnings = validate::check_rows(&dataset.rows, today)?;
        let output_path = sink::write_csv(&self.config.output_path, &dataset.rows)?;

        let retention =
            summary::retention_table(&dataset.cohorts, &dataset.rows, self.config.horizon());
        for line in summary::format_table(&retention) {
            log::debug!("{line}");
        }

        Ok(GenerationReport {
            seed:         self.config.seed,
            row_count:    dataset.rows.len(),
            user_count:   dataset.user_count(),
            cohort_count: dataset.cohorts.len(),
            output_path,
            warnings,
            retention,
        })
    }
}
