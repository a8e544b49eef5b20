//! Built-in Typst report template.
//!
//! Sections are filled by `{{PLACEHOLDER}}` substitution in
//! [`super::resolve`].

const TEMPLATE: &str = r#"#set page(paper: "a4", margin: (x: 1.8cm, y: 2cm), numbering: "1 / 1")
#set text(font: "Liberation Sans", size: 10pt)
#set table(stroke: 0.5pt + gray, inset: 5pt)
#show heading.where(level: 1): set text(size: 18pt)

= Forensic Accounting Report

{{COMPANY_SUMMARY}}

== Risk Scores

{{SCORES_TABLE}}

== Red Flags

{{RED_FLAGS}}

== Financial Ratios

{{RATIO_TABLE}}

== Benford's Law Analysis

{{BENFORD_TABLE}}

== Trend Analysis (Year-over-Year %)

{{TREND_TABLE}}

== Common-Size Income Statement (% of Revenue)

{{COMMON_SIZE_TABLE}}
"#;

pub fn template() -> &'static str {
    TEMPLATE
}

/// Every placeholder the built-in template uses.
pub const PLACEHOLDERS: [&str; 7] = [
    "{{COMPANY_SUMMARY}}",
    "{{SCORES_TABLE}}",
    "{{RED_FLAGS}}",
    "{{RATIO_TABLE}}",
    "{{BENFORD_TABLE}}",
    "{{TREND_TABLE}}",
    "{{COMMON_SIZE_TABLE}}",
];
