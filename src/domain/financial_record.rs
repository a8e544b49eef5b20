//! Financial statement records and per-company series.

use crate::domain::error::FraudlensError;
use std::fmt;
use std::str::FromStr;

/// One fiscal year of statement line items for one company.
///
/// Monetary fields are in the reporting currency's base unit. `ebit`,
/// `net_income`, `total_equity` and `cfo` may be negative; everything else
/// is expected non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRecord {
    pub year: i32,
    pub revenue: f64,
    pub cogs: f64,
    /// Selling, general & administrative (a.k.a. operating expenses).
    pub sga: f64,
    pub ebit: f64,
    pub net_income: f64,
    pub total_assets: f64,
    pub current_assets: f64,
    pub fixed_assets: f64,
    pub current_liabilities: f64,
    pub total_debt: f64,
    pub total_equity: f64,
    pub receivables: f64,
    pub inventory: f64,
    pub retained_earnings: f64,
    pub market_cap: f64,
    pub depreciation: f64,
    /// Cash flow from operations, when the dataset reports it.
    pub cfo: Option<f64>,
}

impl FinancialRecord {
    pub fn value(&self, field: Field) -> Option<f64> {
        let v = match field {
            Field::Revenue => self.revenue,
            Field::Cogs => self.cogs,
            Field::Sga => self.sga,
            Field::Ebit => self.ebit,
            Field::NetIncome => self.net_income,
            Field::TotalAssets => self.total_assets,
            Field::CurrentAssets => self.current_assets,
            Field::FixedAssets => self.fixed_assets,
            Field::CurrentLiabilities => self.current_liabilities,
            Field::TotalDebt => self.total_debt,
            Field::TotalEquity => self.total_equity,
            Field::Receivables => self.receivables,
            Field::Inventory => self.inventory,
            Field::RetainedEarnings => self.retained_earnings,
            Field::MarketCap => self.market_cap,
            Field::Depreciation => self.depreciation,
            Field::Cfo => return self.cfo,
        };
        Some(v)
    }

    /// Book value of total liabilities: total assets minus equity.
    pub fn book_liabilities(&self) -> f64 {
        self.total_assets - self.total_equity
    }
}

/// A named statement line, used wherever a field is selected at runtime
/// (cross-company comparison, Benford field lists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Revenue,
    Cogs,
    Sga,
    Ebit,
    NetIncome,
    TotalAssets,
    CurrentAssets,
    FixedAssets,
    CurrentLiabilities,
    TotalDebt,
    TotalEquity,
    Receivables,
    Inventory,
    RetainedEarnings,
    MarketCap,
    Depreciation,
    Cfo,
}

impl Field {
    pub const ALL: [Field; 17] = [
        Field::Revenue,
        Field::Cogs,
        Field::Sga,
        Field::Ebit,
        Field::NetIncome,
        Field::TotalAssets,
        Field::CurrentAssets,
        Field::FixedAssets,
        Field::CurrentLiabilities,
        Field::TotalDebt,
        Field::TotalEquity,
        Field::Receivables,
        Field::Inventory,
        Field::RetainedEarnings,
        Field::MarketCap,
        Field::Depreciation,
        Field::Cfo,
    ];

    /// Canonical column name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Revenue => "Revenue",
            Field::Cogs => "COGS",
            Field::Sga => "SGA",
            Field::Ebit => "EBIT",
            Field::NetIncome => "Net_Income",
            Field::TotalAssets => "Total_Assets",
            Field::CurrentAssets => "Current_Assets",
            Field::FixedAssets => "Fixed_Assets",
            Field::CurrentLiabilities => "Current_Liabilities",
            Field::TotalDebt => "Total_Debt",
            Field::TotalEquity => "Total_Equity",
            Field::Receivables => "Receivables",
            Field::Inventory => "Inventory",
            Field::RetainedEarnings => "Retained_Earnings",
            Field::MarketCap => "Market_Cap",
            Field::Depreciation => "Depreciation",
            Field::Cfo => "CFO",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FraudlensError;

    /// Case-insensitive; `Operating_Expenses` is accepted for `SGA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if needle.eq_ignore_ascii_case("Operating_Expenses") {
            return Ok(Field::Sga);
        }
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| FraudlensError::UnknownMetric {
                name: needle.to_string(),
            })
    }
}

/// Parse a comma-separated field list such as `Revenue, COGS, SGA`.
pub fn parse_fields(list: &str) -> Result<Vec<Field>, FraudlensError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Field::from_str)
        .collect()
}

/// Descriptive case notes for a company. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyProfile {
    pub display_name: Option<String>,
    pub fraud_type: Option<String>,
    pub amount: Option<String>,
    pub period: Option<String>,
    pub description: Option<String>,
}

impl CompanyProfile {
    /// "Accounting Fraud - $11 billion", or whichever half is present.
    pub fn headline(&self) -> Option<String> {
        match (&self.fraud_type, &self.amount) {
            (Some(kind), Some(amount)) => Some(format!("{kind} - {amount}")),
            (Some(kind), None) => Some(kind.clone()),
            (None, Some(amount)) => Some(amount.clone()),
            (None, None) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// All records for one company, ascending by year, immutable after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanySeries {
    company: String,
    records: Vec<FinancialRecord>,
    profile: Option<CompanyProfile>,
}

impl CompanySeries {
    /// Sort records by year. Years need not be contiguous but must be
    /// unique.
    pub fn new(
        company: impl Into<String>,
        mut records: Vec<FinancialRecord>,
    ) -> Result<Self, FraudlensError> {
        let company = company.into();
        records.sort_by_key(|r| r.year);
        if let Some(pair) = records.windows(2).find(|w| w[0].year == w[1].year) {
            return Err(FraudlensError::DuplicateYear {
                company,
                year: pair[0].year,
            });
        }
        Ok(Self {
            company,
            records,
            profile: None,
        })
    }

    /// Attach case notes. Empty profiles are dropped.
    pub fn with_profile(mut self, profile: Option<CompanyProfile>) -> Self {
        self.profile = profile.filter(|p| !p.is_empty());
        self
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn profile(&self) -> Option<&CompanyProfile> {
        self.profile.as_ref()
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.records.last().map(|r| r.year)
    }

    pub fn index_of_year(&self, year: i32) -> Option<usize> {
        self.records.binary_search_by_key(&year, |r| r.year).ok()
    }

    pub fn record_for_year(&self, year: i32) -> Option<&FinancialRecord> {
        self.index_of_year(year).map(|i| &self.records[i])
    }

    /// The record immediately preceding `year` in the series, if any.
    pub fn previous(&self, year: i32) -> Option<&FinancialRecord> {
        match self.index_of_year(year) {
            Some(i) if i > 0 => Some(&self.records[i - 1]),
            _ => None,
        }
    }

    /// True when every record reports CFO.
    pub fn has_cash_flow(&self) -> bool {
        self.records.iter().all(|r| r.cfo.is_some())
    }
}

/// A per-year calculator outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct YearResult<T> {
    pub year: i32,
    pub outcome: Result<T, crate::domain::error::AnalysisError>,
}

impl<T> YearResult<T> {
    pub fn ok(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }
}
