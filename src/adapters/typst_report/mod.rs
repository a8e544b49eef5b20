//! Typst report generation.
//!
//! Orchestrates placeholder resolution: reads a Typst template (either the
//! built-in default or a custom file via `template_path`), resolves all
//! `{{PLACEHOLDER}}` markers by calling helpers from `tables`, and writes the
//! final `.typ` file.

pub mod default_template;
pub mod tables;

use std::fs;
use std::path::PathBuf;

use crate::domain::analysis::YearAnalysis;
use crate::domain::error::FraudlensError;
use crate::ports::report_port::ReportPort;

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup ready to be written to a `.typ` file.
pub fn resolve(template: &str, analysis: &YearAnalysis) -> String {
    let mut output = template.to_string();

    output = output.replace(
        "{{COMPANY_SUMMARY}}",
        &tables::render_company_summary(analysis),
    );
    output = output.replace(
        "{{SCORES_TABLE}}",
        &tables::render_scores_table(&analysis.z_score, &analysis.m_score),
    );
    output = output.replace("{{RED_FLAGS}}", &tables::render_red_flags(&analysis.red_flags));
    output = output.replace("{{RATIO_TABLE}}", &tables::render_ratio_table(&analysis.ratios));
    output = output.replace(
        "{{BENFORD_TABLE}}",
        &tables::render_benford_table(&analysis.benford, &analysis.benford_fields),
    );
    output = output.replace("{{TREND_TABLE}}", &tables::render_trend_table(&analysis.trend));
    output = output.replace(
        "{{COMMON_SIZE_TABLE}}",
        &tables::render_common_size_table(&analysis.common_size, &analysis.revenue_index),
    );

    output
}

/// Writes `.typ` reports, optionally from a custom template.
pub struct TypstReportAdapter {
    template_path: Option<PathBuf>,
}

impl TypstReportAdapter {
    pub fn new(template_path: Option<PathBuf>) -> Self {
        Self { template_path }
    }

    fn load_template(&self) -> Result<String, FraudlensError> {
        match &self.template_path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                FraudlensError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to read template {}: {}", path.display(), e),
                ))
            }),
            None => Ok(default_template::template().to_string()),
        }
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(&self, analysis: &YearAnalysis, output_path: &str) -> Result<(), FraudlensError> {
        let template = self.load_template()?;
        let typst_content = resolve(&template, analysis);
        fs::write(output_path, typst_content)?;
        tracing::info!(path = output_path, "report written");
        Ok(())
    }
}
