//! Altman Z-Score bankruptcy predictor.
//!
//! Z = 1.2*X1 + 1.4*X2 + 3.3*X3 + 0.6*X4 + 1.0*X5
//!
//! - X1: working capital / total assets
//! - X2: retained earnings / total assets
//! - X3: EBIT / total assets
//! - X4: market cap / book liabilities (total assets - total equity)
//! - X5: revenue / total assets
//!
//! Zones: Z > 2.99 safe, 1.81 < Z <= 2.99 grey, Z <= 1.81 distress.

use crate::domain::error::{checked_div, AnalysisError, Undefined};
use crate::domain::financial_record::{CompanySeries, FinancialRecord, YearResult};
use std::fmt;

pub const SAFE_THRESHOLD: f64 = 2.99;
pub const DISTRESS_THRESHOLD: f64 = 1.81;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZZone {
    Safe,
    Grey,
    Distress,
}

impl ZZone {
    pub fn classify(score: f64) -> Self {
        if score > SAFE_THRESHOLD {
            ZZone::Safe
        } else if score > DISTRESS_THRESHOLD {
            ZZone::Grey
        } else {
            ZZone::Distress
        }
    }
}

impl fmt::Display for ZZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZZone::Safe => write!(f, "Safe"),
            ZZone::Grey => write!(f, "Grey"),
            ZZone::Distress => write!(f, "Distress"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZScore {
    pub year: i32,
    pub x1: f64,
    pub x2: f64,
    pub x3: f64,
    pub x4: f64,
    pub x5: f64,
    pub score: f64,
    pub zone: ZZone,
}

pub fn z_score(r: &FinancialRecord) -> Result<ZScore, AnalysisError> {
    let liabilities = r.book_liabilities();
    if r.total_assets != 0.0 && liabilities == 0.0 {
        return Err(AnalysisError::NotComputable(Undefined::ZeroLiabilities));
    }

    let x1 = checked_div(
        r.current_assets - r.current_liabilities,
        r.total_assets,
        "Total_Assets",
    )?;
    let x2 = checked_div(r.retained_earnings, r.total_assets, "Total_Assets")?;
    let x3 = checked_div(r.ebit, r.total_assets, "Total_Assets")?;
    let x4 = r.market_cap / liabilities;
    let x5 = checked_div(r.revenue, r.total_assets, "Total_Assets")?;

    let score = 1.2 * x1 + 1.4 * x2 + 3.3 * x3 + 0.6 * x4 + 1.0 * x5;

    Ok(ZScore {
        year: r.year,
        x1,
        x2,
        x3,
        x4,
        x5,
        score,
        zone: ZZone::classify(score),
    })
}

/// One result per year; no year depends on another.
pub fn z_scores(series: &CompanySeries) -> Vec<YearResult<ZScore>> {
    series
        .records()
        .iter()
        .map(|r| YearResult {
            year: r.year,
            outcome: z_score(r),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::financial_record::test_support::sample_record;
    use approx::assert_relative_eq;

    fn worldcom_2002() -> FinancialRecord {
        FinancialRecord {
            year: 2002,
            revenue: 30.360e9,
            cogs: 17.842e9,
            sga: 11.046e9,
            ebit: 1.472e9,
            net_income: -3.852e9,
            total_assets: 107.036e9,
            current_assets: 12.047e9,
            fixed_assets: 92.989e9,
            current_liabilities: 29.896e9,
            total_debt: 45.358e9,
            total_equity: 15.296e9,
            receivables: 6.815e9,
            inventory: 0.4e9,
            retained_earnings: 12.6e9,
            market_cap: 0.15e9,
            depreciation: 8.1e9,
            cfo: None,
        }
    }

    #[test]
    fn components_and_score() {
        let z = z_score(&sample_record(2001)).unwrap();
        assert_relative_eq!(z.x1, 0.2, epsilon = 1e-12);
        assert_relative_eq!(z.x2, 0.25, epsilon = 1e-12);
        assert_relative_eq!(z.x3, 0.125, epsilon = 1e-12);
        assert_relative_eq!(z.x4, 1_500.0 / 1_100.0, epsilon = 1e-12);
        assert_relative_eq!(z.x5, 0.5, epsilon = 1e-12);
        let expected = 1.2 * 0.2 + 1.4 * 0.25 + 3.3 * 0.125 + 0.6 * (1_500.0 / 1_100.0) + 0.5;
        assert_relative_eq!(z.score, expected, epsilon = 1e-12);
        assert_eq!(z.zone, ZZone::Grey);
    }

    #[test]
    fn worldcom_2002_is_in_distress() {
        let z = z_score(&worldcom_2002()).unwrap();
        assert!(z.score < DISTRESS_THRESHOLD, "score was {}", z.score);
        assert_eq!(z.zone, ZZone::Distress);
    }

    #[test]
    fn zone_boundaries() {
        assert_eq!(ZZone::classify(3.0), ZZone::Safe);
        assert_eq!(ZZone::classify(2.99), ZZone::Grey);
        assert_eq!(ZZone::classify(1.82), ZZone::Grey);
        assert_eq!(ZZone::classify(1.81), ZZone::Distress);
        assert_eq!(ZZone::classify(-4.0), ZZone::Distress);
    }

    #[test]
    fn zero_liabilities_is_not_computable() {
        let mut record = sample_record(2001);
        record.total_equity = record.total_assets;
        assert_eq!(
            z_score(&record),
            Err(AnalysisError::NotComputable(Undefined::ZeroLiabilities))
        );
    }

    #[test]
    fn zero_total_assets_is_division_by_zero() {
        let mut record = sample_record(2001);
        record.total_assets = 0.0;
        assert_eq!(
            z_score(&record),
            Err(AnalysisError::division_by_zero("Total_Assets"))
        );
    }

    #[test]
    fn zero_assets_and_equity_reports_assets() {
        let mut record = sample_record(2001);
        record.total_assets = 0.0;
        record.total_equity = 0.0;
        assert_eq!(
            z_score(&record),
            Err(AnalysisError::division_by_zero("Total_Assets"))
        );
    }

    #[test]
    fn one_result_per_year() {
        let series = CompanySeries::new(
            "ACME",
            vec![sample_record(2001), worldcom_2002(), sample_record(2003)],
        )
        .unwrap();
        let scores = z_scores(&series);
        assert_eq!(scores.len(), 3);
        assert_eq!(
            scores.iter().map(|s| s.year).collect::<Vec<_>>(),
            vec![2001, 2002, 2003]
        );
        assert_eq!(
            scores[0].ok().map(|z| z.score),
            scores[2].ok().map(|z| z.score)
        );
        assert_eq!(scores[1].ok().map(|z| z.zone), Some(ZZone::Distress));
    }
}
