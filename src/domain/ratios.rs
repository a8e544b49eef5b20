//! Profitability, liquidity, leverage and efficiency ratios.
//!
//! Percent ratios (margins, ROA, ROE, debt/equity ratio) are scaled by 100;
//! the rest are plain multiples. Every ratio for a year is computed from that
//! year's record alone.

use crate::domain::error::{checked_div, AnalysisError};
use crate::domain::financial_record::{CompanySeries, FinancialRecord, YearResult};

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RatioSet {
    pub year: i32,
    pub gross_margin: f64,
    pub operating_margin: f64,
    pub net_profit_margin: f64,
    pub roa: f64,
    pub roe: f64,
    pub current_ratio: f64,
    pub quick_ratio: f64,
    pub debt_to_equity: f64,
    pub debt_ratio: f64,
    pub equity_ratio: f64,
    pub asset_turnover: f64,
    pub receivables_turnover: f64,
    pub days_sales_outstanding: f64,
}

/// Net income as a percentage of revenue.
pub fn net_profit_margin(r: &FinancialRecord) -> Result<f64, AnalysisError> {
    checked_div(r.net_income, r.revenue, "Revenue").map(|x| x * 100.0)
}

pub fn current_ratio(r: &FinancialRecord) -> Result<f64, AnalysisError> {
    checked_div(r.current_assets, r.current_liabilities, "Current_Liabilities")
}

pub fn debt_to_equity(r: &FinancialRecord) -> Result<f64, AnalysisError> {
    checked_div(r.total_debt, r.total_equity, "Total_Equity")
}

impl RatioSet {
    /// Fails on the first zero denominator, naming the field. Callers that
    /// need single ratios regardless of the others use the free functions.
    pub fn compute(r: &FinancialRecord) -> Result<Self, AnalysisError> {
        let receivables_turnover = checked_div(r.revenue, r.receivables, "Receivables")?;

        Ok(RatioSet {
            year: r.year,
            gross_margin: checked_div(r.revenue - r.cogs, r.revenue, "Revenue")? * 100.0,
            operating_margin: checked_div(r.ebit, r.revenue, "Revenue")? * 100.0,
            net_profit_margin: net_profit_margin(r)?,
            roa: checked_div(r.net_income, r.total_assets, "Total_Assets")? * 100.0,
            roe: checked_div(r.net_income, r.total_equity, "Total_Equity")? * 100.0,
            current_ratio: current_ratio(r)?,
            quick_ratio: checked_div(
                r.current_assets - r.inventory,
                r.current_liabilities,
                "Current_Liabilities",
            )?,
            debt_to_equity: debt_to_equity(r)?,
            debt_ratio: checked_div(r.total_debt, r.total_assets, "Total_Assets")? * 100.0,
            equity_ratio: checked_div(r.total_equity, r.total_assets, "Total_Assets")? * 100.0,
            asset_turnover: checked_div(r.revenue, r.total_assets, "Total_Assets")?,
            receivables_turnover,
            days_sales_outstanding: checked_div(
                DAYS_PER_YEAR,
                receivables_turnover,
                "Receivables_Turnover",
            )?,
        })
    }
}

/// One ratio set per year of the series, in series order.
pub fn ratios(series: &CompanySeries) -> Vec<YearResult<RatioSet>> {
    series
        .records()
        .iter()
        .map(|r| YearResult {
            year: r.year,
            outcome: RatioSet::compute(r),
        })
        .collect()
}
