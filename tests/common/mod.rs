#![allow(dead_code)]

use fraudlens::domain::error::FraudlensError;
use fraudlens::domain::financial_record::{CompanySeries, FinancialRecord};
use fraudlens::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<FinancialRecord>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_records(mut self, company: &str, records: Vec<FinancialRecord>) -> Self {
        self.data.insert(company.to_string(), records);
        self
    }

    pub fn with_error(mut self, company: &str, reason: &str) -> Self {
        self.errors.insert(company.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn list_companies(&self) -> Result<Vec<String>, FraudlensError> {
        let mut names: Vec<String> = self
            .data
            .keys()
            .chain(self.errors.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn fetch_series(&self, company: &str) -> Result<CompanySeries, FraudlensError> {
        if let Some(reason) = self.errors.get(company) {
            return Err(FraudlensError::DataLoad {
                reason: reason.clone(),
            });
        }
        match self.data.get(company) {
            Some(records) => CompanySeries::new(company, records.clone()),
            None => Err(FraudlensError::UnknownCompany {
                company: company.to_string(),
            }),
        }
    }
}

/// A healthy mid-sized company: no red flags, Grey zone (Z about 2.32).
pub fn make_record(year: i32) -> FinancialRecord {
    FinancialRecord {
        year,
        revenue: 1_000.0,
        cogs: 600.0,
        sga: 150.0,
        ebit: 250.0,
        net_income: 120.0,
        total_assets: 2_000.0,
        current_assets: 800.0,
        fixed_assets: 1_000.0,
        current_liabilities: 400.0,
        total_debt: 700.0,
        total_equity: 900.0,
        receivables: 200.0,
        inventory: 100.0,
        retained_earnings: 500.0,
        market_cap: 1_500.0,
        depreciation: 80.0,
        cfo: Some(150.0),
    }
}

pub fn make_series(company: &str, years: &[i32]) -> CompanySeries {
    CompanySeries::new(company, years.iter().map(|&y| make_record(y)).collect()).unwrap()
}

/// WorldCom, restated, as published without cash-flow data.
pub fn worldcom() -> CompanySeries {
    let rows: [[f64; 17]; 3] = [
        [
            2000.0, 39.090e9, 23.854e9, 8.644e9, 6.592e9, 7.577e9, 103.279e9, 14.931e9,
            85.348e9, 19.803e9, 28.079e9, 39.838e9, 7.874e9, 0.5e9, 15.0e9, 115.0e9, 6.5e9,
        ],
        [
            2001.0, 35.179e9, 20.663e9, 10.586e9, 3.930e9, 1.501e9, 164.496e9, 18.301e9,
            143.195e9, 24.983e9, 41.838e9, 35.267e9, 9.468e9, 0.6e9, 16.5e9, 45.0e9, 7.2e9,
        ],
        [
            2002.0, 30.360e9, 17.842e9, 11.046e9, 1.472e9, -3.852e9, 107.036e9, 12.047e9,
            92.989e9, 29.896e9, 45.358e9, 15.296e9, 6.815e9, 0.4e9, 12.6e9, 0.15e9, 8.1e9,
        ],
    ];
    let records = rows
        .iter()
        .map(|r| FinancialRecord {
            year: r[0] as i32,
            revenue: r[1],
            cogs: r[2],
            sga: r[3],
            ebit: r[4],
            net_income: r[5],
            total_assets: r[6],
            current_assets: r[7],
            fixed_assets: r[8],
            current_liabilities: r[9],
            total_debt: r[10],
            total_equity: r[11],
            receivables: r[12],
            inventory: r[13],
            retained_earnings: r[14],
            market_cap: r[15],
            depreciation: r[16],
            cfo: None,
        })
        .collect();
    CompanySeries::new("WorldCom", records).unwrap()
}

pub const CSV_HEADER: &str = "Year,Revenue,COGS,SGA,EBIT,Net_Income,Total_Assets,Current_Assets,\
Fixed_Assets,Current_Liabilities,Total_Debt,Total_Equity,Receivables,Inventory,\
Retained_Earnings,Market_Cap,Depreciation,CFO";

/// CSV rows for `make_record`, one per year.
pub fn csv_for_years(years: &[i32]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for &y in years {
        out.push_str(&format!(
            "{y},1000,600,150,250,120,2000,800,1000,400,700,900,200,100,500,1500,80,150\n"
        ));
    }
    out
}
