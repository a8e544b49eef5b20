//! CSV file data adapter.
//!
//! One `<Company>.csv` per company in a directory. Columns are matched by
//! header name; `Operating_Expenses` is read as `SGA` and `CFO` is optional.
//!
//! An optional `profiles.ini` beside the CSV files holds case notes, one
//! section per company:
//!
//! ```ini
//! [WorldCom]
//! name = WorldCom
//! fraud_type = Accounting Fraud
//! amount = $11 billion
//! period = 2000-2002
//! description = Operating expenses booked as capital expenditures.
//! ```

use crate::domain::error::FraudlensError;
use crate::domain::financial_record::{CompanyProfile, CompanySeries, FinancialRecord};
use crate::ports::data_port::DataPort;
use configparser::ini::Ini;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Revenue")]
    revenue: f64,
    #[serde(rename = "COGS")]
    cogs: f64,
    #[serde(rename = "SGA", alias = "Operating_Expenses")]
    sga: f64,
    #[serde(rename = "EBIT")]
    ebit: f64,
    #[serde(rename = "Net_Income")]
    net_income: f64,
    #[serde(rename = "Total_Assets")]
    total_assets: f64,
    #[serde(rename = "Current_Assets")]
    current_assets: f64,
    #[serde(rename = "Fixed_Assets")]
    fixed_assets: f64,
    #[serde(rename = "Current_Liabilities")]
    current_liabilities: f64,
    #[serde(rename = "Total_Debt")]
    total_debt: f64,
    #[serde(rename = "Total_Equity")]
    total_equity: f64,
    #[serde(rename = "Receivables")]
    receivables: f64,
    #[serde(rename = "Inventory")]
    inventory: f64,
    #[serde(rename = "Retained_Earnings")]
    retained_earnings: f64,
    #[serde(rename = "Market_Cap")]
    market_cap: f64,
    #[serde(rename = "Depreciation")]
    depreciation: f64,
    #[serde(rename = "CFO", default)]
    cfo: Option<f64>,
}

impl From<CsvRow> for FinancialRecord {
    fn from(row: CsvRow) -> Self {
        FinancialRecord {
            year: row.year,
            revenue: row.revenue,
            cogs: row.cogs,
            sga: row.sga,
            ebit: row.ebit,
            net_income: row.net_income,
            total_assets: row.total_assets,
            current_assets: row.current_assets,
            fixed_assets: row.fixed_assets,
            current_liabilities: row.current_liabilities,
            total_debt: row.total_debt,
            total_equity: row.total_equity,
            receivables: row.receivables,
            inventory: row.inventory,
            retained_earnings: row.retained_earnings,
            market_cap: row.market_cap,
            depreciation: row.depreciation,
            cfo: row.cfo,
        }
    }
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, company: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", company))
    }

    fn profiles_path(&self) -> PathBuf {
        self.base_path.join(PROFILES_FILE)
    }
}

pub const PROFILES_FILE: &str = "profiles.ini";

impl DataPort for CsvAdapter {
    fn list_companies(&self) -> Result<Vec<String>, FraudlensError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| FraudlensError::DataLoad {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut companies = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FraudlensError::DataLoad {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem()) {
                companies.push(stem.to_string_lossy().into_owned());
            }
        }

        companies.sort();
        Ok(companies)
    }

    fn fetch_series(&self, company: &str) -> Result<CompanySeries, FraudlensError> {
        let path = self.csv_path(company);
        if !path.is_file() {
            return Err(FraudlensError::UnknownCompany {
                company: company.to_string(),
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| FraudlensError::DataLoad {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;

        let mut records = Vec::new();
        for result in rdr.deserialize::<CsvRow>() {
            let row = result.map_err(|e| FraudlensError::DataLoad {
                reason: format!("{}: {}", path.display(), e),
            })?;
            records.push(FinancialRecord::from(row));
        }

        CompanySeries::new(company, records)
    }

    fn fetch_profile(&self, company: &str) -> Result<Option<CompanyProfile>, FraudlensError> {
        let path = self.profiles_path();
        if !path.is_file() {
            return Ok(None);
        }

        let mut ini = Ini::new();
        ini.load(&path).map_err(|reason| FraudlensError::DataLoad {
            reason: format!("failed to read {}: {}", path.display(), reason),
        })?;

        let get = |key: &str| {
            ini.get(company, key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let profile = CompanyProfile {
            display_name: get("name"),
            fraud_type: get("fraud_type"),
            amount: get("amount"),
            period: get("period"),
            description: get("description"),
        };

        Ok(Some(profile).filter(|p| !p.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER_OPEX: &str = "Year,Revenue,COGS,Operating_Expenses,EBIT,Net_Income,Total_Assets,\
Current_Assets,Fixed_Assets,Current_Liabilities,Total_Debt,Total_Equity,Receivables,\
Inventory,Retained_Earnings,Market_Cap,Depreciation";

    const HEADER_CFO: &str = "Year,Revenue,COGS,SGA,EBIT,Net_Income,Total_Assets,\
Current_Assets,Fixed_Assets,Current_Liabilities,Total_Debt,Total_Equity,Receivables,\
Inventory,Retained_Earnings,Market_Cap,Depreciation,CFO";

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let opex = format!(
            "{HEADER_OPEX}\n\
             2002,30360,17842,11046,1472,-3852,107036,12047,92989,29896,45358,15296,6815,400,12600,150,8100\n\
             2001,35179,20024,11803,3352,1384,103914,13129,88779,17346,30038,57930,7157,450,16400,30000,7900\n"
        );
        fs::write(path.join("WorldCom.csv"), opex).unwrap();

        let cfo = format!(
            "{HEADER_CFO}\n\
             2017,18000,10800,3200,2500,900,115000,31000,72000,28500,91000,9700,8200,1500,5800,12500,1350,-1800\n"
        );
        fs::write(path.join("ILFS.csv"), cfo).unwrap();
        fs::write(path.join("notes.txt"), "not a dataset").unwrap();

        (dir, path)
    }

    #[test]
    fn list_companies_reads_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_companies().unwrap(), vec!["ILFS", "WorldCom"]);
    }

    #[test]
    fn fetch_series_sorts_and_aliases_operating_expenses() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_series("WorldCom").unwrap();
        assert_eq!(series.company(), "WorldCom");
        assert_eq!(series.years(), vec![2001, 2002]);

        let r = &series.records()[1];
        assert_eq!(r.sga, 11046.0);
        assert_eq!(r.net_income, -3852.0);
        assert_eq!(r.cfo, None);
        assert!(!series.has_cash_flow());
    }

    #[test]
    fn fetch_series_reads_optional_cfo() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_series("ILFS").unwrap();
        assert_eq!(series.records()[0].cfo, Some(-1800.0));
        assert!(series.has_cash_flow());
    }

    #[test]
    fn fetch_series_unknown_company() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_series("Enron"),
            Err(FraudlensError::UnknownCompany { .. })
        ));
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Bad.csv"), "Year,Revenue\n2001,100\n").unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        assert!(matches!(
            adapter.fetch_series("Bad"),
            Err(FraudlensError::DataLoad { .. })
        ));
    }

    #[test]
    fn non_numeric_value_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let content = format!(
            "{HEADER_CFO}\n2017,lots,10800,3200,2500,900,115000,31000,72000,28500,91000,9700,8200,1500,5800,12500,1350,0\n"
        );
        fs::write(dir.path().join("Bad.csv"), content).unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        assert!(matches!(
            adapter.fetch_series("Bad"),
            Err(FraudlensError::DataLoad { .. })
        ));
    }

    #[test]
    fn duplicate_year_is_rejected() {
        let dir = TempDir::new().unwrap();
        let row = "2017,18000,10800,3200,2500,900,115000,31000,72000,28500,91000,9700,8200,1500,5800,12500,1350,0";
        fs::write(
            dir.path().join("Dup.csv"),
            format!("{HEADER_CFO}\n{row}\n{row}\n"),
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        assert!(matches!(
            adapter.fetch_series("Dup"),
            Err(FraudlensError::DuplicateYear { year: 2017, .. })
        ));
    }

    #[test]
    fn profiles_file_is_not_a_company() {
        let (_dir, path) = setup_test_data();
        fs::write(path.join(PROFILES_FILE), "[WorldCom]\nperiod = 2000-2002\n").unwrap();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_companies().unwrap(), vec!["ILFS", "WorldCom"]);
    }

    #[test]
    fn fetch_profile_reads_company_section() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join(PROFILES_FILE),
            "[WorldCom]\n\
             name = WorldCom Inc.\n\
             fraud_type = Accounting Fraud\n\
             amount = $11 billion\n\
             period = 2000-2002\n\
             description = Expenses booked as capital expenditures.\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);

        let profile = adapter.fetch_profile("WorldCom").unwrap().unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("WorldCom Inc."));
        assert_eq!(
            profile.headline().as_deref(),
            Some("Accounting Fraud - $11 billion")
        );
        assert_eq!(profile.period.as_deref(), Some("2000-2002"));
        assert!(adapter.fetch_profile("ILFS").unwrap().is_none());
    }

    #[test]
    fn fetch_profile_without_file_is_none() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_profile("WorldCom").unwrap().is_none());
    }

    #[test]
    fn list_companies_missing_directory() {
        let adapter = CsvAdapter::new(PathBuf::from("/nonexistent/fraudlens/data"));
        assert!(matches!(
            adapter.list_companies(),
            Err(FraudlensError::DataLoad { .. })
        ));
    }
}
