//! CLI definition and dispatch.
//!
//! Progress and diagnostics go to stderr through `tracing`; results are
//! printed to stdout.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::typst_report::tables::fmt_amount;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::analysis::{analyze, AnalysisSettings, YearAnalysis};
use crate::domain::benford::{self, BenfordAnalysis};
use crate::domain::comparative::{self, TREND_FIELDS};
use crate::domain::config_validation::{self, validate_config, DataSource};
use crate::domain::dataset::Dataset;
use crate::domain::error::{AnalysisError, FraudlensError};
use crate::domain::financial_record::{CompanyProfile, Field};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "fraudlens",
    about = "Forensic accounting analytics: Altman Z, Beneish M, Benford and red flags"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one company for one fiscal year
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        company: String,
        /// Defaults to the latest year on record
        #[arg(long)]
        year: Option<i32>,
        /// Write a Typst report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Benford's-Law digit analysis for one company
    Benford {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        company: String,
    },
    /// Compare one metric across companies for a year
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        year: i32,
        #[arg(long, default_value = "Revenue")]
        metric: String,
    },
    /// Year-over-year trend and common-size tables for one company
    Trend {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        company: String,
    },
    /// List companies in the dataset with their year ranges
    ListCompanies {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration and the dataset it points at
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Import a directory of company CSV files into the configured SQLite database
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        from: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            config,
            company,
            year,
            output,
        } => run_analyze(&config, &company, year, output.as_deref()),
        Command::Benford { config, company } => run_benford(&config, &company),
        Command::Compare {
            config,
            year,
            metric,
        } => run_compare(&config, year, &metric),
        Command::Trend { config, company } => run_trend(&config, &company),
        Command::ListCompanies { config } => run_list_companies(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Import { config, from } => run_import(&config, &from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

/// Config, dataset and resolved analysis settings for one command.
pub struct Session {
    pub config: FileConfigAdapter,
    pub dataset: Dataset,
    pub settings: AnalysisSettings,
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, FraudlensError> {
    tracing::info!("loading config from {}", path.display());
    let config = FileConfigAdapter::from_file(path)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn open_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, FraudlensError> {
    let source = config_validation::data_source(config)?;
    match source {
        DataSource::Csv => {
            let path = config_validation::source_path(config, source)?;
            Ok(Box::new(CsvAdapter::new(PathBuf::from(path))))
        }
        #[cfg(feature = "sqlite")]
        DataSource::Sqlite => {
            use crate::adapters::sqlite_adapter::SqliteAdapter;
            Ok(Box::new(SqliteAdapter::from_config(config)?))
        }
        #[cfg(not(feature = "sqlite"))]
        DataSource::Sqlite => Err(sqlite_unavailable()),
    }
}

#[cfg(not(feature = "sqlite"))]
fn sqlite_unavailable() -> FraudlensError {
    FraudlensError::ConfigInvalid {
        section: "data".to_string(),
        key: "source".to_string(),
        reason: "built without the sqlite feature".to_string(),
    }
}

pub fn open_session(config_path: &Path) -> Result<Session, FraudlensError> {
    let config = load_config(config_path)?;

    let port = open_data_port(&config)?;
    tracing::info!("loading dataset");
    let dataset = Dataset::load(port.as_ref())?;

    let tata_method = config_validation::tata_preference(&config)?.resolve(&dataset);
    tracing::info!(
        companies = dataset.len(),
        tata_method = %tata_method,
        "dataset loaded"
    );

    let settings = AnalysisSettings {
        tata_method,
        benford_fields: config_validation::benford_fields(&config)?,
    };

    Ok(Session {
        config,
        dataset,
        settings,
    })
}

fn fmt_result(value: &Result<f64, AnalysisError>, suffix: &str) -> String {
    match value {
        Ok(v) => format!("{v:.2}{suffix}"),
        Err(e) => e.short_label(),
    }
}

fn run_analyze(
    config_path: &Path,
    company: &str,
    year: Option<i32>,
    output: Option<&Path>,
) -> Result<(), FraudlensError> {
    let session = open_session(config_path)?;
    let series = session.dataset.company(company)?;
    let analysis = analyze(series, year, &session.settings)?;

    print_analysis(&analysis);

    if let Some(output) = output {
        let template_path = session
            .config
            .get_string("report", "template_path")
            .map(PathBuf::from);
        let adapter = TypstReportAdapter::new(template_path);
        adapter.write(&analysis, &output.to_string_lossy())?;
        println!("\nReport written to: {}", output.display());
    }

    Ok(())
}

fn print_analysis(a: &YearAnalysis) {
    println!("=== {} ({}) ===", a.company, a.year);
    if let Some(p) = &a.profile {
        if let Some(name) = &p.display_name {
            println!("Company:          {name}");
        }
        if let Some(headline) = p.headline() {
            println!("Case:             {headline}");
        }
        if let Some(period) = &p.period {
            println!("Period:           {period}");
        }
        if let Some(description) = &p.description {
            println!("{description}");
        }
    }
    println!("TATA method:      {}", a.tata_method);

    match &a.z_score {
        Ok(z) => println!("Altman Z-Score:   {:.2} ({} Zone)", z.score, z.zone),
        Err(e) => println!("Altman Z-Score:   {}", e.short_label()),
    }
    match &a.m_score {
        Ok(m) => println!("Beneish M-Score:  {:.2} ({})", m.score, m.risk),
        Err(e) => println!("Beneish M-Score:  {}", e.short_label()),
    }

    match &a.ratios {
        Ok(r) => {
            println!("\n=== Ratios ===");
            println!("Gross Margin:         {:.2}%", r.gross_margin);
            println!("Operating Margin:     {:.2}%", r.operating_margin);
            println!("Net Profit Margin:    {:.2}%", r.net_profit_margin);
            println!("ROA:                  {:.2}%", r.roa);
            println!("ROE:                  {:.2}%", r.roe);
            println!("Current Ratio:        {:.2}", r.current_ratio);
            println!("Quick Ratio:          {:.2}", r.quick_ratio);
            println!("Debt to Equity:       {:.2}", r.debt_to_equity);
            println!("Debt Ratio:           {:.2}%", r.debt_ratio);
            println!("Equity Ratio:         {:.2}%", r.equity_ratio);
            println!("Asset Turnover:       {:.2}", r.asset_turnover);
            println!("Receivables Turnover: {:.2}", r.receivables_turnover);
            println!("DSO:                  {:.1} days", r.days_sales_outstanding);
        }
        Err(e) => println!("\nRatios: {}", e.short_label()),
    }

    println!("\n=== Red Flags ===");
    if a.red_flags.is_empty() {
        println!("  none");
    }
    for flag in &a.red_flags {
        println!("  [{}] {}: {}", flag.severity, flag.title, flag.description);
    }

    match &a.benford {
        Ok(b) => println!(
            "\nBenford:          chi-square {:.3}, {}",
            b.chi_square,
            benford_verdict(b)
        ),
        Err(e) => println!("\nBenford:          {}", e.short_label()),
    }
}

fn benford_verdict(b: &BenfordAnalysis) -> &'static str {
    if b.compliant {
        "compliant"
    } else {
        "NOT compliant"
    }
}

fn run_benford(config_path: &Path, company: &str) -> Result<(), FraudlensError> {
    let session = open_session(config_path)?;
    let series = session.dataset.company(company)?;
    let values = benford::collect_values(series, &session.settings.benford_fields);
    let analysis = benford::benford(&values)?;

    let fields: Vec<&str> = session
        .settings
        .benford_fields
        .iter()
        .map(|f| f.name())
        .collect();
    println!("=== Benford's Law: {} ===", series.company());
    println!("Fields: {}", fields.join(", "));
    println!("Sample size: {}\n", analysis.sample_size);
    println!("Digit  Count  Observed%  Expected%");
    for d in 0..9 {
        println!(
            "{:>5}  {:>5}  {:>9.2}  {:>9.2}",
            d + 1,
            analysis.counts[d],
            analysis.observed[d],
            analysis.expected[d]
        );
    }
    println!(
        "\nChi-square: {:.3} (critical {:.3}): {}",
        analysis.chi_square,
        benford::CHI_SQUARE_CRITICAL,
        benford_verdict(&analysis)
    );
    Ok(())
}

fn run_compare(config_path: &Path, year: i32, metric: &str) -> Result<(), FraudlensError> {
    let metric: Field = metric.parse()?;
    let session = open_session(config_path)?;

    let values = comparative::compare(session.dataset.series(), year, metric);
    if values.is_empty() {
        tracing::warn!(year, metric = %metric, "no company has a value for this year");
    }

    println!("=== {} in {} ===", metric, year);
    for (company, value) in &values {
        println!("{:<20} {:>14}", company, fmt_amount(*value));
    }
    Ok(())
}

fn run_trend(config_path: &Path, company: &str) -> Result<(), FraudlensError> {
    let session = open_session(config_path)?;
    let series = session.dataset.company(company)?;

    println!("=== Trend (YoY %): {} ===", series.company());
    let header: Vec<String> = TREND_FIELDS
        .iter()
        .map(|f| format!("{:>24}", f.name()))
        .collect();
    println!("{:<6}{}", "Year", header.join(""));
    let rows = comparative::trend(series);
    if rows.is_empty() {
        println!("  (at least two years are needed)");
    }
    for row in &rows {
        let cells: Vec<String> = TREND_FIELDS
            .iter()
            .filter_map(|&f| row.get(f))
            .map(|cell| format!("{:>24}", fmt_result(cell, "%")))
            .collect();
        println!("{:<6}{}", row.year, cells.join(""));
    }

    println!("\n=== Common-Size (% of Revenue) ===");
    println!(
        "{:<6}{:>10}{:>10}{:>10}{:>10}{:>12}{:>16}",
        "Year", "Revenue", "COGS", "SGA", "EBIT", "Net_Income", "Revenue Index"
    );
    let index = comparative::revenue_index(series);
    for (row, idx) in comparative::common_size(series).iter().zip(index.iter()) {
        let idx = fmt_result(&idx.outcome, "");
        match &row.outcome {
            Ok(cs) => println!(
                "{:<6}{:>10.1}{:>10.1}{:>10.1}{:>10.1}{:>12.1}{:>16}",
                row.year, cs.revenue, cs.cogs, cs.sga, cs.ebit, cs.net_income, idx
            ),
            Err(e) => println!("{:<6}  {}{:>16}", row.year, e.short_label(), idx),
        }
    }
    Ok(())
}

fn run_list_companies(config_path: &Path) -> Result<(), FraudlensError> {
    let session = open_session(config_path)?;

    for series in session.dataset.series() {
        let years = series.years();
        let range = match (years.first(), years.last()) {
            (Some(first), Some(last)) => format!("{first}-{last}"),
            _ => "-".to_string(),
        };
        let headline = series
            .profile()
            .and_then(CompanyProfile::headline)
            .map(|h| format!("  {h}"))
            .unwrap_or_default();
        println!(
            "{:<20} {:<10} {:>2} years  CFO: {}{}",
            series.company(),
            range,
            series.len(),
            if series.has_cash_flow() { "yes" } else { "no" },
            headline
        );
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), FraudlensError> {
    let session = open_session(config_path)?;
    println!("Configuration is valid");
    println!("Companies:   {}", session.dataset.companies().join(", "));
    println!("TATA method: {}", session.settings.tata_method);
    Ok(())
}

#[cfg(feature = "sqlite")]
fn run_import(config_path: &Path, from: &Path) -> Result<(), FraudlensError> {
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    let config = load_config(config_path)?;
    if config_validation::data_source(&config)? != DataSource::Sqlite {
        return Err(FraudlensError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: "import requires source = sqlite".to_string(),
        });
    }

    let db = SqliteAdapter::from_config(&config)?;
    db.initialize_schema()?;

    let csv = CsvAdapter::new(from.to_path_buf());
    let companies = csv.list_companies()?;
    for company in &companies {
        let series = csv.fetch_series(company)?;
        db.insert_series(&series)?;
        if let Some(profile) = csv.fetch_profile(company)? {
            db.insert_profile(company, &profile)?;
        }
        tracing::info!(company = %company, years = series.len(), "imported");
    }

    println!("Imported {} companies from {}", companies.len(), from.display());
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
fn run_import(_config_path: &Path, _from: &Path) -> Result<(), FraudlensError> {
    Err(sqlite_unavailable())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_command() {
        let cli = Cli::try_parse_from([
            "fraudlens",
            "analyze",
            "-c",
            "config/accrual.ini",
            "--company",
            "WorldCom",
            "--year",
            "2002",
            "-o",
            "report.typ",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze {
                company,
                year,
                output,
                ..
            } => {
                assert_eq!(company, "WorldCom");
                assert_eq!(year, Some(2002));
                assert_eq!(output, Some(PathBuf::from("report.typ")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn compare_metric_defaults_to_revenue() {
        let cli =
            Cli::try_parse_from(["fraudlens", "compare", "-c", "x.ini", "--year", "2016"]).unwrap();
        match cli.command {
            Command::Compare { year, metric, .. } => {
                assert_eq!(year, 2016);
                assert_eq!(metric, "Revenue");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_companies_uses_kebab_case() {
        assert!(Cli::try_parse_from(["fraudlens", "list-companies", "-c", "x.ini"]).is_ok());
    }

    #[test]
    fn analyze_requires_company() {
        assert!(Cli::try_parse_from(["fraudlens", "analyze", "-c", "x.ini"]).is_err());
    }

    #[test]
    fn fmt_result_renders_errors_as_text() {
        assert_eq!(fmt_result(&Ok(12.345), "%"), "12.35%");
        assert_eq!(
            fmt_result(&Err(AnalysisError::division_by_zero("Revenue")), "%"),
            "undefined (Revenue = 0)"
        );
    }
}
