//! Data access port trait.

use crate::domain::error::FraudlensError;
use crate::domain::financial_record::{CompanyProfile, CompanySeries};

pub trait DataPort {
    fn list_companies(&self) -> Result<Vec<String>, FraudlensError>;

    fn fetch_series(&self, company: &str) -> Result<CompanySeries, FraudlensError>;

    /// Case notes for `company`. Sources without profiles return `None`.
    fn fetch_profile(&self, _company: &str) -> Result<Option<CompanyProfile>, FraudlensError> {
        Ok(None)
    }
}
