//! Report generation port trait.

use crate::domain::analysis::YearAnalysis;
use crate::domain::error::FraudlensError;

/// Port for writing a (company, year) analysis report.
pub trait ReportPort {
    fn write(&self, analysis: &YearAnalysis, output_path: &str) -> Result<(), FraudlensError>;
}
