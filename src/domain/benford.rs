//! Benford's-Law first-digit analysis.
//!
//! Expected share of leading digit d: log10(1 + 1/d) * 100.
//! Goodness of fit: chi-square over percentages for digits 1..=9, compliant
//! when strictly below 15.507 (95% confidence, 8 degrees of freedom).
//!
//! Only values with a non-zero integer part contribute: non-positive,
//! non-finite and sub-unit values are dropped before counting.

use crate::domain::error::{AnalysisError, Undefined};
use crate::domain::financial_record::{CompanySeries, Field};

pub const CHI_SQUARE_CRITICAL: f64 = 15.507;

/// Fields pooled when none are configured.
pub const DEFAULT_FIELDS: [Field; 8] = [
    Field::Revenue,
    Field::Cogs,
    Field::Sga,
    Field::TotalAssets,
    Field::CurrentAssets,
    Field::CurrentLiabilities,
    Field::TotalDebt,
    Field::Receivables,
];

#[derive(Debug, Clone, PartialEq)]
pub struct BenfordAnalysis {
    /// Index 0 is digit 1.
    pub observed: [f64; 9],
    pub expected: [f64; 9],
    pub counts: [usize; 9],
    pub sample_size: usize,
    pub chi_square: f64,
    pub compliant: bool,
}

pub fn expected_distribution() -> [f64; 9] {
    let mut expected = [0.0; 9];
    for (i, slot) in expected.iter_mut().enumerate() {
        let d = (i + 1) as f64;
        *slot = (1.0 + 1.0 / d).log10() * 100.0;
    }
    expected
}

/// Leading digit of the integer part of `value`, or `None` when the value
/// has no such digit.
pub fn leading_digit(value: f64) -> Option<u8> {
    if !value.is_finite() || value < 1.0 {
        return None;
    }
    let digits = format!("{:.0}", value.trunc());
    digits
        .bytes()
        .next()
        .map(|b| b - b'0')
        .filter(|d| (1..=9).contains(d))
}

pub fn chi_square(observed: &[f64; 9], expected: &[f64; 9]) -> f64 {
    observed
        .iter()
        .zip(expected.iter())
        .map(|(o, e)| (o - e).powi(2) / e)
        .sum()
}

pub fn is_compliant(chi_square: f64) -> bool {
    chi_square < CHI_SQUARE_CRITICAL
}

pub fn benford(values: &[f64]) -> Result<BenfordAnalysis, AnalysisError> {
    let mut counts = [0usize; 9];
    for d in values.iter().filter_map(|&v| leading_digit(v)) {
        counts[(d - 1) as usize] += 1;
    }

    let sample_size: usize = counts.iter().sum();
    if sample_size == 0 {
        return Err(AnalysisError::NotComputable(Undefined::EmptySample));
    }

    let mut observed = [0.0; 9];
    for (slot, &count) in observed.iter_mut().zip(counts.iter()) {
        *slot = count as f64 / sample_size as f64 * 100.0;
    }

    let expected = expected_distribution();
    let chi = chi_square(&observed, &expected);

    Ok(BenfordAnalysis {
        observed,
        expected,
        counts,
        sample_size,
        chi_square: chi,
        compliant: is_compliant(chi),
    })
}

/// Pool `fields` across every year of `series`. Absent values (a missing
/// CFO) are skipped.
pub fn collect_values(series: &CompanySeries, fields: &[Field]) -> Vec<f64> {
    let mut values = Vec::with_capacity(series.len() * fields.len());
    for &field in fields {
        values.extend(series.records().iter().filter_map(|r| r.value(field)));
    }
    values
}
