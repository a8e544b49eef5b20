//! SQLite data adapter.
//!
//! Table `financials`: one row per (company, year), every statement line as
//! a REAL column, `cfo` nullable. Table `profiles` holds optional case
//! notes keyed by company.

use crate::domain::config_validation::{self, DataSource};
use crate::domain::error::FraudlensError;
use crate::domain::financial_record::{CompanyProfile, CompanySeries, FinancialRecord};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};

const SELECT_SERIES: &str = "SELECT year, revenue, cogs, sga, ebit, net_income, total_assets,
            current_assets, fixed_assets, current_liabilities, total_debt, total_equity,
            receivables, inventory, retained_earnings, market_cap, depreciation, cfo
     FROM financials
     WHERE company = ?1
     ORDER BY year ASC";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn query_err(e: rusqlite::Error) -> FraudlensError {
    FraudlensError::DatabaseQuery {
        reason: e.to_string(),
    }
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FraudlensError> {
        let db_path = config_validation::source_path(config, DataSource::Sqlite)?;
        let pool_size = config_validation::pool_size(config)?;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| FraudlensError::Database {
                    reason: e.to_string(),
                })?;

        tracing::debug!(path = %db_path, pool_size, "opened sqlite pool");
        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, FraudlensError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| FraudlensError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, FraudlensError> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| FraudlensError::Database {
                reason: e.to_string(),
            })
    }

    pub fn initialize_schema(&self) -> Result<(), FraudlensError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS financials (
                company TEXT NOT NULL,
                year INTEGER NOT NULL,
                revenue REAL NOT NULL,
                cogs REAL NOT NULL,
                sga REAL NOT NULL,
                ebit REAL NOT NULL,
                net_income REAL NOT NULL,
                total_assets REAL NOT NULL,
                current_assets REAL NOT NULL,
                fixed_assets REAL NOT NULL,
                current_liabilities REAL NOT NULL,
                total_debt REAL NOT NULL,
                total_equity REAL NOT NULL,
                receivables REAL NOT NULL,
                inventory REAL NOT NULL,
                retained_earnings REAL NOT NULL,
                market_cap REAL NOT NULL,
                depreciation REAL NOT NULL,
                cfo REAL,
                PRIMARY KEY (company, year)
            );
            CREATE INDEX IF NOT EXISTS idx_financials_company ON financials(company);
            CREATE TABLE IF NOT EXISTS profiles (
                company TEXT PRIMARY KEY,
                display_name TEXT,
                fraud_type TEXT,
                amount TEXT,
                period TEXT,
                description TEXT
            );",
        )
        .map_err(query_err)?;

        Ok(())
    }

    /// Insert or replace every year of `series` in one transaction.
    pub fn insert_series(&self, series: &CompanySeries) -> Result<(), FraudlensError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        for r in series.records() {
            tx.execute(
                "INSERT OR REPLACE INTO financials (company, year, revenue, cogs, sga, ebit,
                    net_income, total_assets, current_assets, fixed_assets, current_liabilities,
                    total_debt, total_equity, receivables, inventory, retained_earnings,
                    market_cap, depreciation, cfo)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                    ?16, ?17, ?18, ?19)",
                params![
                    series.company(),
                    r.year,
                    r.revenue,
                    r.cogs,
                    r.sga,
                    r.ebit,
                    r.net_income,
                    r.total_assets,
                    r.current_assets,
                    r.fixed_assets,
                    r.current_liabilities,
                    r.total_debt,
                    r.total_equity,
                    r.receivables,
                    r.inventory,
                    r.retained_earnings,
                    r.market_cap,
                    r.depreciation,
                    r.cfo
                ],
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        Ok(())
    }

    pub fn insert_profile(
        &self,
        company: &str,
        profile: &CompanyProfile,
    ) -> Result<(), FraudlensError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO profiles (company, display_name, fraud_type, amount,
                period, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                company,
                profile.display_name,
                profile.fraud_type,
                profile.amount,
                profile.period,
                profile.description
            ],
        )
        .map_err(query_err)?;
        Ok(())
    }
}

impl DataPort for SqliteAdapter {
    fn list_companies(&self) -> Result<Vec<String>, FraudlensError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare("SELECT DISTINCT company FROM financials ORDER BY company")
            .map_err(query_err)?;

        let rows = stmt.query_map([], |row| row.get(0)).map_err(query_err)?;

        let mut companies = Vec::new();
        for row in rows {
            companies.push(row.map_err(query_err)?);
        }

        Ok(companies)
    }

    fn fetch_series(&self, company: &str) -> Result<CompanySeries, FraudlensError> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(SELECT_SERIES).map_err(query_err)?;
        let rows = stmt
            .query_map(params![company], |row| {
                Ok(FinancialRecord {
                    year: row.get(0)?,
                    revenue: row.get(1)?,
                    cogs: row.get(2)?,
                    sga: row.get(3)?,
                    ebit: row.get(4)?,
                    net_income: row.get(5)?,
                    total_assets: row.get(6)?,
                    current_assets: row.get(7)?,
                    fixed_assets: row.get(8)?,
                    current_liabilities: row.get(9)?,
                    total_debt: row.get(10)?,
                    total_equity: row.get(11)?,
                    receivables: row.get(12)?,
                    inventory: row.get(13)?,
                    retained_earnings: row.get(14)?,
                    market_cap: row.get(15)?,
                    depreciation: row.get(16)?,
                    cfo: row.get(17)?,
                })
            })
            .map_err(query_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(query_err)?);
        }

        if records.is_empty() {
            return Err(FraudlensError::UnknownCompany {
                company: company.to_string(),
            });
        }

        CompanySeries::new(company, records)
    }

    fn fetch_profile(&self, company: &str) -> Result<Option<CompanyProfile>, FraudlensError> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT display_name, fraud_type, amount, period, description
             FROM profiles
             WHERE company = ?1",
            params![company],
            |row| {
                Ok(CompanyProfile {
                    display_name: row.get(0)?,
                    fraud_type: row.get(1)?,
                    amount: row.get(2)?,
                    period: row.get(3)?,
                    description: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(query_err)
    }
}
