//! Domain error types.

use std::fmt;

/// Why a value is mathematically undefined for its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undefined {
    /// The first year of a series has no predecessor to compare against.
    FirstYear,
    /// No usable values remained after filtering.
    EmptySample,
    /// Book liabilities (total assets minus equity) are zero.
    ZeroLiabilities,
}

impl fmt::Display for Undefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Undefined::FirstYear => write!(f, "first year"),
            Undefined::EmptySample => write!(f, "empty sample"),
            Undefined::ZeroLiabilities => write!(f, "zero liabilities"),
        }
    }
}

/// A per-item calculator failure.
///
/// Returned for a single year or metric; it never aborts the computation of
/// other years.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("division by zero: {field} is zero")]
    DivisionByZero { field: String },

    #[error("not computable: {0}")]
    NotComputable(Undefined),

    #[error("missing field: {field}")]
    MissingField { field: String },
}

impl AnalysisError {
    pub fn division_by_zero(field: &str) -> Self {
        AnalysisError::DivisionByZero {
            field: field.to_string(),
        }
    }

    /// Short text for table cells, e.g. `n/a (first year)`.
    pub fn short_label(&self) -> String {
        match self {
            AnalysisError::DivisionByZero { field } => format!("undefined ({field} = 0)"),
            AnalysisError::NotComputable(why) => format!("n/a ({why})"),
            AnalysisError::MissingField { field } => format!("missing {field}"),
        }
    }
}

/// Divide, failing with [`AnalysisError::DivisionByZero`] when the
/// denominator is exactly zero.
pub fn checked_div(numerator: f64, denominator: f64, field: &str) -> Result<f64, AnalysisError> {
    if denominator == 0.0 {
        Err(AnalysisError::division_by_zero(field))
    } else {
        Ok(numerator / denominator)
    }
}

/// Top-level error type for fraudlens.
#[derive(Debug, thiserror::Error)]
pub enum FraudlensError {
    #[error("data load error: {reason}")]
    DataLoad { reason: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown company: {company}")]
    UnknownCompany { company: String },

    #[error("no {year} record for {company}")]
    UnknownYear { company: String, year: i32 },

    #[error("unknown metric: {name}")]
    UnknownMetric { name: String },

    #[error("duplicate year {year} for {company}")]
    DuplicateYear { company: String, year: i32 },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FraudlensError> for std::process::ExitCode {
    fn from(err: &FraudlensError) -> Self {
        let code: u8 = match err {
            FraudlensError::Io(_) => 1,
            FraudlensError::ConfigParse { .. }
            | FraudlensError::ConfigMissing { .. }
            | FraudlensError::ConfigInvalid { .. } => 2,
            FraudlensError::DataLoad { .. }
            | FraudlensError::Database { .. }
            | FraudlensError::DatabaseQuery { .. } => 3,
            FraudlensError::UnknownCompany { .. }
            | FraudlensError::UnknownYear { .. }
            | FraudlensError::UnknownMetric { .. } => 4,
            FraudlensError::DuplicateYear { .. } | FraudlensError::Analysis(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
