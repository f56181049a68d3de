use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cohort count mismatch: expected {expected} user counts, got {actual}")]
    CohortCountMismatch { expected: usize, actual: usize },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Output contract violated at row {row}: {reason}")]
    ContractViolation { row: usize, reason: String },
}

pub type GenResult<T> = Result<T, GenError>;
