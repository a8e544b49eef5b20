//! The loaded, immutable multi-company dataset.
//!
//! Built once from a [`DataPort`] and passed by reference to every
//! calculator and command.

use crate::domain::error::FraudlensError;
use crate::domain::financial_record::CompanySeries;
use crate::domain::m_score::TataMethod;
use crate::ports::data_port::DataPort;
use std::str::FromStr;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    series: Vec<CompanySeries>,
}

impl Dataset {
    /// Fetch every company the port lists. Companies with no records are
    /// skipped with a warning; any load failure aborts.
    pub fn load(port: &dyn DataPort) -> Result<Self, FraudlensError> {
        let companies = port.list_companies()?;
        tracing::debug!(count = companies.len(), "listing companies");

        let mut series = Vec::with_capacity(companies.len());
        for company in companies {
            let s = port
                .fetch_series(&company)?
                .with_profile(port.fetch_profile(&company)?);
            if s.is_empty() {
                tracing::warn!(company = %company, "no records, skipping");
                continue;
            }
            tracing::debug!(company = %company, years = s.len(), "loaded series");
            series.push(s);
        }

        if series.is_empty() {
            return Err(FraudlensError::DataLoad {
                reason: "dataset contains no companies with records".to_string(),
            });
        }

        Ok(Self::from_series(series))
    }

    /// Sorted by company name.
    pub fn from_series(mut series: Vec<CompanySeries>) -> Self {
        series.sort_by(|a, b| a.company().cmp(b.company()));
        Self { series }
    }

    pub fn series(&self) -> &[CompanySeries] {
        &self.series
    }

    pub fn companies(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.company()).collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Exact name match first, then case-insensitive.
    pub fn company(&self, name: &str) -> Result<&CompanySeries, FraudlensError> {
        let name = name.trim();
        self.series
            .iter()
            .find(|s| s.company() == name)
            .or_else(|| {
                self.series
                    .iter()
                    .find(|s| s.company().eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| FraudlensError::UnknownCompany {
                company: name.to_string(),
            })
    }

    /// True when every record of every company reports CFO.
    pub fn has_cash_flow(&self) -> bool {
        !self.series.is_empty() && self.series.iter().all(|s| s.has_cash_flow())
    }
}

/// The configured TATA method, before it is resolved against a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TataPreference {
    #[default]
    Auto,
    CashFlow,
    AccrualProxy,
}

impl TataPreference {
    pub fn resolve(self, dataset: &Dataset) -> TataMethod {
        match self {
            TataPreference::CashFlow => TataMethod::CashFlow,
            TataPreference::AccrualProxy => TataMethod::AccrualProxy,
            TataPreference::Auto if dataset.has_cash_flow() => TataMethod::CashFlow,
            TataPreference::Auto => TataMethod::AccrualProxy,
        }
    }
}

impl FromStr for TataPreference {
    type Err = FraudlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(TataPreference::Auto),
            "cfo" | "cashflow" | "cash_flow" => Ok(TataPreference::CashFlow),
            "accrual" | "accrual_proxy" => Ok(TataPreference::AccrualProxy),
            other => Err(FraudlensError::ConfigInvalid {
                section: "analysis".to_string(),
                key: "tata_method".to_string(),
                reason: format!("unknown tata_method '{other}', expected auto, cfo or accrual"),
            }),
        }
    }
}
