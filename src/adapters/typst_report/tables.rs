//! Table formatting for reports.
//!
//! Provides functions to generate Typst markup for:
//! - Company summary and risk scores
//! - Ratio, Benford, trend and common-size tables
//! - The red-flag list
//!
//! Values that could not be computed render as italic text, never as 0.

use crate::domain::analysis::YearAnalysis;
use crate::domain::benford::{BenfordAnalysis, CHI_SQUARE_CRITICAL};
use crate::domain::comparative::{CommonSizeRow, TrendRow, TREND_FIELDS};
use crate::domain::error::AnalysisError;
use crate::domain::financial_record::{Field, YearResult};
use crate::domain::m_score::{MScore, ManipulationRisk};
use crate::domain::ratios::RatioSet;
use crate::domain::red_flags::{RedFlag, Severity};
use crate::domain::z_score::{ZScore, ZZone};

/// Escape characters that Typst treats as markup inside `[...]` content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '[' | ']' | '#' | '$' | '*' | '_' | '@' | '<' | '>' | '`' | '~'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Scale large monetary amounts to B / M suffixes.
pub fn fmt_amount(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else {
        format!("{:.2}", value)
    }
}

fn not_computable_cell(err: &AnalysisError) -> String {
    format!("text(fill: gray, [_{}_])", escape(&err.short_label()))
}

fn value_cell(value: &Result<f64, AnalysisError>, suffix: &str) -> String {
    match value {
        Ok(v) => format!("[{:.2}{}]", v, suffix),
        Err(e) => not_computable_cell(e),
    }
}

pub fn render_company_summary(a: &YearAnalysis) -> String {
    let r = &a.record;
    let years = match (a.years.first(), a.years.last()) {
        (Some(first), Some(last)) => format!("{first} to {last} ({} years)", a.years.len()),
        _ => "-".to_string(),
    };
    let cfo = r.cfo.map(fmt_amount).unwrap_or_else(|| "not reported".to_string());

    let mut out = String::from("#table(\n  columns: 2,\n  [*Property*], [*Value*],\n");
    let rows = [
        ("Company", escape(&a.company)),
        ("Fiscal Year", a.year.to_string()),
        ("Years Available", years),
        ("Accrual Method (TATA)", a.tata_method.to_string()),
        ("Revenue", fmt_amount(r.revenue)),
        ("Net Income", fmt_amount(r.net_income)),
        ("Total Assets", fmt_amount(r.total_assets)),
        ("Total Equity", fmt_amount(r.total_equity)),
        ("Cash Flow from Operations", cfo),
    ];
    for (label, value) in rows {
        out.push_str(&format!("  [{}], [{}],\n", label, value));
    }
    if let Some(p) = &a.profile {
        let notes = [
            ("Registered Name", p.display_name.clone()),
            ("Case", p.headline()),
            ("Period", p.period.clone()),
            ("Description", p.description.clone()),
        ];
        for (label, value) in notes {
            if let Some(value) = value {
                out.push_str(&format!("  [{}], [{}],\n", label, escape(&value)));
            }
        }
    }
    out.push_str(")\n");
    out
}

pub fn render_scores_table(
    z: &Result<ZScore, AnalysisError>,
    m: &Result<MScore, AnalysisError>,
) -> String {
    let mut out = String::from(
        "#table(\n  columns: 3,\n  align: (left, right, left),\n  [*Model*], [*Score*], [*Classification*],\n",
    );

    match z {
        Ok(z) => {
            let color = match z.zone {
                ZZone::Safe => "green",
                ZZone::Grey => "orange",
                ZZone::Distress => "red",
            };
            out.push_str(&format!(
                "  [Altman Z-Score], [{:.2}], text(fill: {}, [{} Zone]),\n",
                z.score, color, z.zone
            ));
        }
        Err(e) => out.push_str(&format!(
            "  [Altman Z-Score], {}, [-],\n",
            not_computable_cell(e)
        )),
    }

    match m {
        Ok(m) => {
            let color = match m.risk {
                ManipulationRisk::LikelyManipulator => "red",
                ManipulationRisk::Unlikely => "green",
            };
            out.push_str(&format!(
                "  [Beneish M-Score], [{:.2}], text(fill: {}, [{}]),\n",
                m.score, color, m.risk
            ));
        }
        Err(e) => out.push_str(&format!(
            "  [Beneish M-Score], {}, [-],\n",
            not_computable_cell(e)
        )),
    }
    out.push_str(")\n");

    if let Ok(z) = z {
        out.push_str("\n#table(\n  columns: 6,\n  [*X1*], [*X2*], [*X3*], [*X4*], [*X5*], [*Z*],\n");
        out.push_str(&format!(
            "  [{:.3}], [{:.3}], [{:.3}], [{:.3}], [{:.3}], [{:.3}],\n)\n",
            z.x1, z.x2, z.x3, z.x4, z.x5, z.score
        ));
    }

    if let Ok(m) = m {
        let c = &m.components;
        out.push_str(
            "\n#table(\n  columns: 8,\n  [*DSRI*], [*GMI*], [*AQI*], [*SGI*], [*DEPI*], [*SGAI*], [*LVGI*], [*TATA*],\n",
        );
        out.push_str(&format!(
            "  [{:.3}], [{:.3}], [{:.3}], [{:.3}], [{:.3}], [{:.3}], [{:.3}], [{:.3}],\n)\n",
            c.dsri, c.gmi, c.aqi, c.sgi, c.depi, c.sgai, c.lvgi, c.tata
        ));
    }

    out
}

pub fn render_ratio_table(ratios: &Result<RatioSet, AnalysisError>) -> String {
    let set = match ratios {
        Ok(set) => set,
        Err(e) => return format!("_Ratios not computable: {}._\n", escape(&e.short_label())),
    };

    let rows: [(&str, f64, &str); 13] = [
        ("Gross Margin", set.gross_margin, "%"),
        ("Operating Margin", set.operating_margin, "%"),
        ("Net Profit Margin", set.net_profit_margin, "%"),
        ("Return on Assets", set.roa, "%"),
        ("Return on Equity", set.roe, "%"),
        ("Current Ratio", set.current_ratio, ""),
        ("Quick Ratio", set.quick_ratio, ""),
        ("Debt to Equity", set.debt_to_equity, ""),
        ("Debt Ratio", set.debt_ratio, "%"),
        ("Equity Ratio", set.equity_ratio, "%"),
        ("Asset Turnover", set.asset_turnover, ""),
        ("Receivables Turnover", set.receivables_turnover, ""),
        ("Days Sales Outstanding", set.days_sales_outstanding, " days"),
    ];

    let mut out = String::from(
        "#table(\n  columns: 2,\n  align: (left, right),\n  [*Ratio*], [*Value*],\n",
    );
    for (label, value, suffix) in rows {
        out.push_str(&format!("  [{}], [{:.2}{}],\n", label, value, suffix));
    }
    out.push_str(")\n");
    out
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "red",
        Severity::Medium => "orange",
        Severity::Low => "olive",
    }
}

pub fn render_red_flags(flags: &[RedFlag]) -> String {
    if flags.is_empty() {
        return "_No red flags detected._\n".to_string();
    }

    let mut out = String::new();
    for flag in flags {
        out.push_str(&format!(
            "- #text(fill: {}, [*{}*]) ({}): {}\n",
            severity_color(flag.severity),
            escape(&flag.title),
            flag.severity,
            escape(&flag.description)
        ));
    }
    out
}

pub fn render_benford_table(
    benford: &Result<BenfordAnalysis, AnalysisError>,
    fields: &[Field],
) -> String {
    let field_list = fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ");

    let analysis = match benford {
        Ok(a) => a,
        Err(e) => {
            return format!(
                "_Benford analysis not computable over {}: {}._\n",
                escape(&field_list),
                escape(&e.short_label())
            );
        }
    };

    let mut out = format!(
        "Pooled fields: {} ({} values).\n\n",
        escape(&field_list),
        analysis.sample_size
    );
    out.push_str(
        "#table(\n  columns: 4,\n  align: (center, right, right, right),\n  [*Digit*], [*Count*], [*Observed %*], [*Expected %*],\n",
    );
    for d in 0..9 {
        out.push_str(&format!(
            "  [{}], [{}], [{:.2}], [{:.2}],\n",
            d + 1,
            analysis.counts[d],
            analysis.observed[d],
            analysis.expected[d]
        ));
    }
    out.push_str(")\n\n");

    let (color, verdict) = if analysis.compliant {
        ("green", "Compliant with Benford's Law")
    } else {
        ("red", "Not compliant with Benford's Law")
    };
    out.push_str(&format!(
        "Chi-square: {:.3} (critical value {:.3}). #text(fill: {}, [*{}*])\n",
        analysis.chi_square,
        CHI_SQUARE_CRITICAL,
        color,
        verdict
    ));
    out
}

pub fn render_trend_table(rows: &[TrendRow]) -> String {
    if rows.is_empty() {
        return "_At least two years are needed for trend analysis._\n".to_string();
    }

    let mut out = format!("#table(\n  columns: {},\n  [*Year*],", TREND_FIELDS.len() + 1);
    for field in TREND_FIELDS {
        out.push_str(&format!(" [*{}*],", escape(field.name())));
    }
    out.push('\n');

    for row in rows {
        out.push_str(&format!("  [{}],", row.year));
        for field in TREND_FIELDS {
            if let Some(cell) = row.get(field) {
                out.push_str(&format!(" {},", value_cell(cell, "%")));
            }
        }
        out.push('\n');
    }
    out.push_str(")\n");
    out
}

pub fn render_common_size_table(
    rows: &[YearResult<CommonSizeRow>],
    revenue_index: &[YearResult<f64>],
) -> String {
    if rows.is_empty() {
        return "_No records._\n".to_string();
    }

    let mut out = String::from(
        "#table(\n  columns: 7,\n  [*Year*], [*Revenue*], [*COGS*], [*SGA*], [*EBIT*], [*Net Income*], [*Revenue Index*],\n",
    );
    for row in rows {
        let index = revenue_index
            .iter()
            .find(|r| r.year == row.year)
            .map(|r| value_cell(&r.outcome, ""))
            .unwrap_or_else(|| "[-]".to_string());

        match &row.outcome {
            Ok(cs) => out.push_str(&format!(
                "  [{}], [{:.1}], [{:.1}], [{:.1}], [{:.1}], [{:.1}], {},\n",
                row.year, cs.revenue, cs.cogs, cs.sga, cs.ebit, cs.net_income, index
            )),
            Err(e) => {
                let cell = not_computable_cell(e);
                out.push_str(&format!(
                    "  [{}], {cell}, {cell}, {cell}, {cell}, {cell}, {},\n",
                    row.year, index
                ));
            }
        }
    }
    out.push_str(")\n");
    out
}
