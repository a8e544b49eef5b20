//! Common-size (vertical), trend (horizontal) and cross-company analysis.

use std::collections::BTreeMap;

use crate::domain::error::{checked_div, AnalysisError};
use crate::domain::financial_record::{CompanySeries, Field, FinancialRecord, YearResult};

/// Income-statement lines as a percentage of same-year revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonSizeRow {
    pub year: i32,
    pub revenue: f64,
    pub cogs: f64,
    pub sga: f64,
    pub ebit: f64,
    pub net_income: f64,
}

impl CommonSizeRow {
    pub fn compute(r: &FinancialRecord) -> Result<Self, AnalysisError> {
        let pct = |v: f64| checked_div(v, r.revenue, "Revenue").map(|x| x * 100.0);
        Ok(CommonSizeRow {
            year: r.year,
            revenue: 100.0,
            cogs: pct(r.cogs)?,
            sga: pct(r.sga)?,
            ebit: pct(r.ebit)?,
            net_income: pct(r.net_income)?,
        })
    }
}

pub fn common_size(series: &CompanySeries) -> Vec<YearResult<CommonSizeRow>> {
    series
        .records()
        .iter()
        .map(|r| YearResult {
            year: r.year,
            outcome: CommonSizeRow::compute(r),
        })
        .collect()
}

pub const TREND_FIELDS: [Field; 5] = [
    Field::Revenue,
    Field::NetIncome,
    Field::TotalAssets,
    Field::TotalDebt,
    Field::TotalEquity,
];

/// Year-over-year percentage change against the previous record.
///
/// Each cell is independent: a zero prior value only invalidates that cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub year: i32,
    pub revenue: Result<f64, AnalysisError>,
    pub net_income: Result<f64, AnalysisError>,
    pub total_assets: Result<f64, AnalysisError>,
    pub total_debt: Result<f64, AnalysisError>,
    pub total_equity: Result<f64, AnalysisError>,
}

impl TrendRow {
    pub fn get(&self, field: Field) -> Option<&Result<f64, AnalysisError>> {
        match field {
            Field::Revenue => Some(&self.revenue),
            Field::NetIncome => Some(&self.net_income),
            Field::TotalAssets => Some(&self.total_assets),
            Field::TotalDebt => Some(&self.total_debt),
            Field::TotalEquity => Some(&self.total_equity),
            _ => None,
        }
    }
}

pub fn percent_change(prev: f64, cur: f64, field: &str) -> Result<f64, AnalysisError> {
    checked_div(cur - prev, prev, field).map(|x| x * 100.0)
}

/// One row per year after the first; the first year has no predecessor and
/// is left out rather than zero-filled.
pub fn trend(series: &CompanySeries) -> Vec<TrendRow> {
    series
        .records()
        .windows(2)
        .map(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            TrendRow {
                year: cur.year,
                revenue: percent_change(prev.revenue, cur.revenue, "Revenue"),
                net_income: percent_change(prev.net_income, cur.net_income, "Net_Income"),
                total_assets: percent_change(prev.total_assets, cur.total_assets, "Total_Assets"),
                total_debt: percent_change(prev.total_debt, cur.total_debt, "Total_Debt"),
                total_equity: percent_change(prev.total_equity, cur.total_equity, "Total_Equity"),
            }
        })
        .collect()
}

/// Revenue of each year as a percentage of the first year's revenue.
pub fn revenue_index(series: &CompanySeries) -> Vec<YearResult<f64>> {
    let Some(base) = series.records().first() else {
        return Vec::new();
    };
    series
        .records()
        .iter()
        .map(|r| YearResult {
            year: r.year,
            outcome: checked_div(r.revenue, base.revenue, "Revenue").map(|x| x * 100.0),
        })
        .collect()
}

/// The figures behind an income-statement waterfall for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeBreakdown {
    pub year: i32,
    pub revenue: f64,
    pub cogs: f64,
    pub sga: f64,
    pub ebit: f64,
    /// Reported EBIT minus (revenue - COGS - SGA): items not explained by the
    /// three lines above, such as depreciation or other operating income.
    pub other: f64,
}

pub fn income_breakdown(r: &FinancialRecord) -> IncomeBreakdown {
    IncomeBreakdown {
        year: r.year,
        revenue: r.revenue,
        cogs: r.cogs,
        sga: r.sga,
        ebit: r.ebit,
        other: r.ebit - (r.revenue - r.cogs - r.sga),
    }
}

/// `metric` for `year` across companies. Companies without a record for the
/// year, or without a value for the field, are left out.
pub fn compare(series: &[CompanySeries], year: i32, metric: Field) -> BTreeMap<String, f64> {
    series
        .iter()
        .filter_map(|s| {
            let value = s.record_for_year(year)?.value(metric)?;
            Some((s.company().to_string(), value))
        })
        .collect()
}
