//! Core domain types and analytics.

pub mod financial_record;
pub mod dataset;
pub mod ratios;
pub mod z_score;
pub mod m_score;
pub mod benford;
pub mod comparative;
pub mod red_flags;
pub mod analysis;
pub mod config_validation;
pub mod error;
