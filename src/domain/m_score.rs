//! Beneish M-Score earnings-manipulation predictor.
//!
//! Each score compares a year with the year immediately before it in the
//! series, so the first year never has a score.
//!
//! M = -4.84 + 0.92*DSRI + 0.528*GMI + 0.404*AQI + 0.892*SGI + 0.115*DEPI
//!     - 0.172*SGAI + 4.679*TATA - 0.327*LVGI
//!
//! M > -1.78 flags a likely manipulator.

use crate::domain::error::{checked_div, AnalysisError, Undefined};
use crate::domain::financial_record::{CompanySeries, FinancialRecord, YearResult};
use std::fmt;

pub const MANIPULATION_THRESHOLD: f64 = -1.78;

/// How total accruals (TATA) are measured.
///
/// The two variants are not numerically equivalent. One method is chosen per
/// dataset and used for every year of every series in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TataMethod {
    /// (net income - CFO) / total assets. Requires CFO on every record.
    CashFlow,
    /// (net income - ((current assets - receivables) - current liabilities)) / total assets.
    AccrualProxy,
}

impl fmt::Display for TataMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TataMethod::CashFlow => write!(f, "cash flow (CFO)"),
            TataMethod::AccrualProxy => write!(f, "working-capital accrual proxy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationRisk {
    LikelyManipulator,
    Unlikely,
}

impl ManipulationRisk {
    pub fn classify(score: f64) -> Self {
        if score > MANIPULATION_THRESHOLD {
            ManipulationRisk::LikelyManipulator
        } else {
            ManipulationRisk::Unlikely
        }
    }
}

impl fmt::Display for ManipulationRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManipulationRisk::LikelyManipulator => write!(f, "Likely Manipulator"),
            ManipulationRisk::Unlikely => write!(f, "Unlikely Manipulator"),
        }
    }
}

/// The eight Beneish indices.
#[derive(Debug, Clone, PartialEq)]
pub struct MScoreComponents {
    /// Days sales in receivables index.
    pub dsri: f64,
    /// Gross margin index.
    pub gmi: f64,
    /// Asset quality index.
    pub aqi: f64,
    /// Sales growth index.
    pub sgi: f64,
    /// Depreciation index.
    pub depi: f64,
    /// SG&A expense index.
    pub sgai: f64,
    /// Leverage index.
    pub lvgi: f64,
    /// Total accruals to total assets.
    pub tata: f64,
}

impl MScoreComponents {
    pub fn compute(
        prev: &FinancialRecord,
        cur: &FinancialRecord,
        method: TataMethod,
    ) -> Result<Self, AnalysisError> {
        let receivables_share = |r: &FinancialRecord| checked_div(r.receivables, r.revenue, "Revenue");
        let gross_margin =
            |r: &FinancialRecord| checked_div(r.revenue - r.cogs, r.revenue, "Revenue");
        let soft_assets = |r: &FinancialRecord| {
            checked_div(r.current_assets + r.fixed_assets, r.total_assets, "Total_Assets")
                .map(|hard| 1.0 - hard)
        };
        let depreciation_rate = |r: &FinancialRecord| {
            checked_div(
                r.depreciation,
                r.depreciation + r.fixed_assets,
                "Depreciation + Fixed_Assets",
            )
        };
        let sga_share = |r: &FinancialRecord| checked_div(r.sga, r.revenue, "Revenue");
        let leverage = |r: &FinancialRecord| checked_div(r.total_debt, r.total_assets, "Total_Assets");

        let dsri = checked_div(receivables_share(cur)?, receivables_share(prev)?, "Receivables")?;
        let gmi = checked_div(gross_margin(prev)?, gross_margin(cur)?, "Gross_Margin")?;
        let aqi = checked_div(soft_assets(cur)?, soft_assets(prev)?, "Asset_Quality")?;
        let sgi = checked_div(cur.revenue, prev.revenue, "Revenue")?;
        let depi = checked_div(
            depreciation_rate(prev)?,
            depreciation_rate(cur)?,
            "Depreciation",
        )?;
        let sgai = checked_div(sga_share(cur)?, sga_share(prev)?, "SGA")?;
        let lvgi = checked_div(leverage(cur)?, leverage(prev)?, "Total_Debt")?;
        let tata = total_accruals(cur, method)?;

        Ok(MScoreComponents {
            dsri,
            gmi,
            aqi,
            sgi,
            depi,
            sgai,
            lvgi,
            tata,
        })
    }

    pub fn score(&self) -> f64 {
        -4.84 + 0.92 * self.dsri + 0.528 * self.gmi + 0.404 * self.aqi + 0.892 * self.sgi
            + 0.115 * self.depi
            - 0.172 * self.sgai
            + 4.679 * self.tata
            - 0.327 * self.lvgi
    }
}

pub fn total_accruals(r: &FinancialRecord, method: TataMethod) -> Result<f64, AnalysisError> {
    let accruals = match method {
        TataMethod::CashFlow => {
            let cfo = r.cfo.ok_or_else(|| AnalysisError::MissingField {
                field: "CFO".to_string(),
            })?;
            r.net_income - cfo
        }
        TataMethod::AccrualProxy => {
            let non_cash_working_capital =
                (r.current_assets - r.receivables) - r.current_liabilities;
            r.net_income - non_cash_working_capital
        }
    };
    checked_div(accruals, r.total_assets, "Total_Assets")
}

#[derive(Debug, Clone, PartialEq)]
pub struct MScore {
    pub year: i32,
    pub components: MScoreComponents,
    pub score: f64,
    pub risk: ManipulationRisk,
}

pub fn m_score(
    prev: &FinancialRecord,
    cur: &FinancialRecord,
    method: TataMethod,
) -> Result<MScore, AnalysisError> {
    let components = MScoreComponents::compute(prev, cur, method)?;
    let score = components.score();
    Ok(MScore {
        year: cur.year,
        components,
        score,
        risk: ManipulationRisk::classify(score),
    })
}

/// One result per year. The first is always `NotComputable(FirstYear)`.
pub fn m_scores(series: &CompanySeries, method: TataMethod) -> Vec<YearResult<MScore>> {
    let records = series.records();
    let mut results = Vec::with_capacity(records.len());

    if let Some(first) = records.first() {
        results.push(YearResult {
            year: first.year,
            outcome: Err(AnalysisError::NotComputable(Undefined::FirstYear)),
        });
    }

    for pair in records.windows(2) {
        results.push(YearResult {
            year: pair[1].year,
            outcome: m_score(&pair[0], &pair[1], method),
        });
    }

    results
}
