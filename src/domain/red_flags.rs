//! Rule-based red-flag detection for a single (company, year).
//!
//! Rules are evaluated independently and reported in a fixed order:
//!
//! 1. Net profit margin below 5%                       (high)
//! 2. Current ratio below 1.0                          (high)
//! 3. Debt-to-equity above 2.0                         (medium)
//! 4. Negative total equity                            (high)
//! 5. Z-Score below 1.81                               (high)
//! 6. Receivables/revenue up more than 20% on prior    (medium)

use std::fmt;

use crate::domain::error::{checked_div, AnalysisError};
use crate::domain::financial_record::FinancialRecord;
use crate::domain::ratios;
use crate::domain::z_score::DISTRESS_THRESHOLD;

const LOW_MARGIN_PCT: f64 = 5.0;
const MIN_CURRENT_RATIO: f64 = 1.0;
const MAX_DEBT_TO_EQUITY: f64 = 2.0;
const RECEIVABLES_GROWTH_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedFlag {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl RedFlag {
    fn new(title: &str, description: String, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            description,
            severity,
        }
    }
}

/// Evaluate every rule for `record`. A rule whose input is undefined (a zero
/// denominator, or `z_score` of `None`) is skipped; the others still run.
/// `prior` is the preceding record in the series, if any.
pub fn red_flags(
    record: &FinancialRecord,
    z_score: Option<f64>,
    prior: Option<&FinancialRecord>,
) -> Vec<RedFlag> {
    let mut flags = Vec::new();

    if let Some(margin) = rule_input(ratios::net_profit_margin(record), "Low Net Profit Margin")
        .filter(|m| *m < LOW_MARGIN_PCT)
    {
        flags.push(RedFlag::new(
            "Low Net Profit Margin",
            format!("Net profit margin of {margin:.2}% indicates poor profitability."),
            Severity::High,
        ));
    }

    if let Some(cr) = rule_input(ratios::current_ratio(record), "Liquidity Crisis")
        .filter(|cr| *cr < MIN_CURRENT_RATIO)
    {
        flags.push(RedFlag::new(
            "Liquidity Crisis",
            format!("Current ratio of {cr:.2} suggests inability to meet short-term obligations."),
            Severity::High,
        ));
    }

    if let Some(de) = rule_input(ratios::debt_to_equity(record), "High Leverage")
        .filter(|de| *de > MAX_DEBT_TO_EQUITY)
    {
        flags.push(RedFlag::new(
            "High Leverage",
            format!("Debt-to-equity ratio of {de:.2} indicates excessive debt burden."),
            Severity::Medium,
        ));
    }

    if record.total_equity < 0.0 {
        flags.push(RedFlag::new(
            "Negative Equity",
            "Company has negative equity - liabilities exceed assets.".to_string(),
            Severity::High,
        ));
    }

    if let Some(z) = z_score.filter(|z| *z < DISTRESS_THRESHOLD) {
        flags.push(RedFlag::new(
            "Bankruptcy Risk",
            format!("Z-Score of {z:.2} indicates high probability of bankruptcy."),
            Severity::High,
        ));
    }

    if let Some(prev) = prior {
        let shares = receivables_share(prev).zip(receivables_share(record));
        if let Some((prev_share, cur_share)) = shares {
            if cur_share > prev_share * RECEIVABLES_GROWTH_FACTOR {
                flags.push(RedFlag::new(
                    "Growing Receivables",
                    "Receivables growing faster than revenue - potential revenue recognition issues."
                        .to_string(),
                    Severity::Medium,
                ));
            }
        }
    }

    flags
}

fn rule_input(value: Result<f64, AnalysisError>, rule: &str) -> Option<f64> {
    match value {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(rule, error = %e, "red flag rule skipped");
            None
        }
    }
}

fn receivables_share(r: &FinancialRecord) -> Option<f64> {
    rule_input(
        checked_div(r.receivables, r.revenue, "Revenue"),
        "Growing Receivables",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::financial_record::test_support::sample_record;

    fn titles(flags: &[RedFlag]) -> Vec<&str> {
        flags.iter().map(|f| f.title.as_str()).collect()
    }

    #[test]
    fn healthy_year_has_no_flags() {
        assert!(red_flags(&sample_record(2001), Some(3.5), None).is_empty());
    }

    #[test]
    fn leverage_rules_fire_in_order() {
        let prior = sample_record(2001);
        let mut record = sample_record(2002);
        record.net_income = 10.0;
        record.current_assets = 300.0;
        record.total_debt = 2_000.0;
        record.receivables = 400.0;

        let flags = red_flags(&record, Some(0.5), Some(&prior));
        assert_eq!(
            titles(&flags),
            vec![
                "Low Net Profit Margin",
                "Liquidity Crisis",
                "High Leverage",
                "Bankruptcy Risk",
                "Growing Receivables",
            ]
        );
        assert_eq!(flags[2].severity, Severity::Medium);
        assert_eq!(flags[4].severity, Severity::Medium);
        assert_eq!(flags[0].severity, Severity::High);
        assert_eq!(flags[3].severity, Severity::High);
    }

    #[test]
    fn negative_equity_fires_between_liquidity_and_bankruptcy() {
        let prior = sample_record(2001);
        let mut record = sample_record(2002);
        record.net_income = 10.0;
        record.current_assets = 300.0;
        record.total_equity = -200.0;
        record.receivables = 400.0;

        // negative equity makes D/E negative, so the leverage rule stays quiet
        let flags = red_flags(&record, Some(0.5), Some(&prior));
        assert_eq!(
            titles(&flags),
            vec![
                "Low Net Profit Margin",
                "Liquidity Crisis",
                "Negative Equity",
                "Bankruptcy Risk",
                "Growing Receivables",
            ]
        );
        assert_eq!(flags[2].severity, Severity::High);
    }

    #[test]
    fn low_margin_description_formats_percent() {
        let mut record = sample_record(2001);
        record.net_income = 31.234;
        let flags = red_flags(&record, None, None);
        assert_eq!(titles(&flags), vec!["Low Net Profit Margin"]);
        assert_eq!(
            flags[0].description,
            "Net profit margin of 3.12% indicates poor profitability."
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let mut record = sample_record(2001);
        record.net_income = 50.0; // exactly 5%
        record.current_assets = 400.0; // exactly 1.0
        record.total_debt = 1_800.0; // exactly 2.0 D/E
        let flags = red_flags(&record, Some(1.81), None);
        assert_eq!(titles(&flags), vec![] as Vec<&str>);
    }

    #[test]
    fn missing_z_score_skips_bankruptcy_rule() {
        let record = sample_record(2001);
        assert!(red_flags(&record, None, None).is_empty());
        assert_eq!(
            titles(&red_flags(&record, Some(1.0), None)),
            vec!["Bankruptcy Risk"]
        );
    }

    #[test]
    fn zero_receivables_does_not_hide_distress() {
        let mut record = sample_record(2002);
        record.receivables = 0.0;
        record.current_assets = 300.0;
        let flags = red_flags(&record, Some(0.23), Some(&sample_record(2001)));
        assert_eq!(titles(&flags), vec!["Liquidity Crisis", "Bankruptcy Risk"]);
    }

    #[test]
    fn zero_equity_skips_only_the_leverage_rule() {
        let mut record = sample_record(2002);
        record.total_equity = 0.0;
        record.current_assets = 300.0;
        let flags = red_flags(&record, Some(1.0), None);
        assert_eq!(titles(&flags), vec!["Liquidity Crisis", "Bankruptcy Risk"]);
    }

    #[test]
    fn zero_revenue_skips_margin_and_receivables_rules() {
        let prior = sample_record(2001);
        let mut record = sample_record(2002);
        record.revenue = 0.0;
        record.current_assets = 300.0;
        let flags = red_flags(&record, Some(3.0), Some(&prior));
        assert_eq!(titles(&flags), vec!["Liquidity Crisis"]);
        assert!(flags.iter().all(|f| !f.description.contains("NaN")));
    }

    #[test]
    fn receivables_rule_needs_prior_year() {
        let mut record = sample_record(2002);
        record.receivables = 400.0;
        assert!(red_flags(&record, Some(3.0), None).is_empty());

        let prior = sample_record(2001);
        assert_eq!(
            titles(&red_flags(&record, Some(3.0), Some(&prior))),
            vec!["Growing Receivables"]
        );
    }

    #[test]
    fn receivables_growth_of_exactly_twenty_percent_is_not_flagged() {
        let prior = sample_record(2001);
        let mut record = sample_record(2002);
        record.receivables = 240.0;
        assert!(red_flags(&record, Some(3.0), Some(&prior)).is_empty());
    }

    #[test]
    fn zero_prior_revenue_skips_receivables_rule() {
        let mut prior = sample_record(2001);
        prior.revenue = 0.0;
        let mut record = sample_record(2002);
        record.receivables = 900.0;
        assert!(red_flags(&record, Some(3.0), Some(&prior)).is_empty());
    }
}
