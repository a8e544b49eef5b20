//! Everything shown for one (company, year) selection.

use crate::domain::benford::{self, BenfordAnalysis, DEFAULT_FIELDS};
use crate::domain::comparative::{self, CommonSizeRow, IncomeBreakdown, TrendRow};
use crate::domain::error::{AnalysisError, FraudlensError, Undefined};
use crate::domain::financial_record::{
    CompanyProfile, CompanySeries, Field, FinancialRecord, YearResult,
};
use crate::domain::m_score::{self, MScore, TataMethod};
use crate::domain::ratios::{self, RatioSet};
use crate::domain::red_flags::{self, RedFlag};
use crate::domain::z_score::{self, ZScore};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub tata_method: TataMethod,
    pub benford_fields: Vec<Field>,
}

impl AnalysisSettings {
    pub fn new(tata_method: TataMethod) -> Self {
        Self {
            tata_method,
            benford_fields: DEFAULT_FIELDS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearAnalysis {
    pub company: String,
    pub profile: Option<CompanyProfile>,
    pub year: i32,
    pub years: Vec<i32>,
    pub tata_method: TataMethod,
    pub record: FinancialRecord,
    pub ratios: Result<RatioSet, AnalysisError>,
    pub z_score: Result<ZScore, AnalysisError>,
    pub m_score: Result<MScore, AnalysisError>,
    /// Rules with an undefined input are left out; the rest still report.
    pub red_flags: Vec<RedFlag>,
    pub income: IncomeBreakdown,
    pub benford_fields: Vec<Field>,
    /// Company-wide, pooled over every year.
    pub benford: Result<BenfordAnalysis, AnalysisError>,
    pub trend: Vec<TrendRow>,
    pub common_size: Vec<YearResult<CommonSizeRow>>,
    pub revenue_index: Vec<YearResult<f64>>,
}

/// `year` defaults to the latest year of the series.
pub fn analyze(
    series: &CompanySeries,
    year: Option<i32>,
    settings: &AnalysisSettings,
) -> Result<YearAnalysis, FraudlensError> {
    let year = match year.or_else(|| series.latest_year()) {
        Some(y) => y,
        None => {
            return Err(FraudlensError::DataLoad {
                reason: format!("{} has no records", series.company()),
            });
        }
    };
    let index = series
        .index_of_year(year)
        .ok_or_else(|| FraudlensError::UnknownYear {
            company: series.company().to_string(),
            year,
        })?;

    let record = &series.records()[index];
    let prior = series.previous(year);

    let ratio_set = ratios::RatioSet::compute(record);
    let z = z_score::z_score(record);
    let m = match prior {
        Some(prev) => m_score::m_score(prev, record, settings.tata_method),
        None => Err(AnalysisError::NotComputable(Undefined::FirstYear)),
    };

    if let Err(e) = &ratio_set {
        tracing::warn!(company = series.company(), year, error = %e, "ratios not computable");
    }
    let flags = red_flags::red_flags(record, z.as_ref().ok().map(|z| z.score), prior);

    let values = benford::collect_values(series, &settings.benford_fields);

    Ok(YearAnalysis {
        company: series.company().to_string(),
        profile: series.profile().cloned(),
        year,
        years: series.years(),
        tata_method: settings.tata_method,
        record: record.clone(),
        ratios: ratio_set,
        z_score: z,
        m_score: m,
        red_flags: flags,
        income: comparative::income_breakdown(record),
        benford_fields: settings.benford_fields.clone(),
        benford: benford::benford(&values),
        trend: comparative::trend(series),
        common_size: comparative::common_size(series),
        revenue_index: comparative::revenue_index(series),
    })
}
