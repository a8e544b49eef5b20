//! Configuration validation and typed reads.
//!
//! Validates every config field before a dataset is loaded.

use crate::domain::benford::DEFAULT_FIELDS;
use crate::domain::dataset::TataPreference;
use crate::domain::error::FraudlensError;
use crate::domain::financial_record::{parse_fields, Field};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_POOL_SIZE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Csv,
    Sqlite,
}

impl DataSource {
    /// The config section holding this source's settings.
    pub fn section(self) -> &'static str {
        match self {
            DataSource::Csv => "csv",
            DataSource::Sqlite => "sqlite",
        }
    }
}

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), FraudlensError> {
    let source = data_source(config)?;
    source_path(config, source)?;
    validate_pool_size(config)?;
    tata_preference(config)?;
    benford_fields(config)?;
    Ok(())
}

/// `[data] source`, defaulting to `csv`.
pub fn data_source(config: &dyn ConfigPort) -> Result<DataSource, FraudlensError> {
    match config.get_string("data", "source") {
        None => Ok(DataSource::Csv),
        Some(s) => match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(DataSource::Csv),
            "sqlite" => Ok(DataSource::Sqlite),
            _ => Err(FraudlensError::ConfigInvalid {
                section: "data".to_string(),
                key: "source".to_string(),
                reason: format!("unknown source '{s}', expected csv or sqlite"),
            }),
        },
    }
}

pub fn source_path(config: &dyn ConfigPort, source: DataSource) -> Result<String, FraudlensError> {
    config
        .get_string(source.section(), "path")
        .ok_or_else(|| FraudlensError::ConfigMissing {
            section: source.section().to_string(),
            key: "path".to_string(),
        })
}

/// `[sqlite] pool_size`, defaulting to 4. Must be a whole number of at
/// least 1.
pub fn pool_size(config: &dyn ConfigPort) -> Result<u32, FraudlensError> {
    let Some(raw) = config.get_string("sqlite", "pool_size") else {
        return Ok(DEFAULT_POOL_SIZE);
    };
    raw.parse::<u32>()
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| FraudlensError::ConfigInvalid {
            section: "sqlite".to_string(),
            key: "pool_size".to_string(),
            reason: format!("'{raw}' is not a pool size of at least 1"),
        })
}

fn validate_pool_size(config: &dyn ConfigPort) -> Result<(), FraudlensError> {
    pool_size(config).map(|_| ())
}

/// `[analysis] tata_method`, defaulting to `auto`.
pub fn tata_preference(config: &dyn ConfigPort) -> Result<TataPreference, FraudlensError> {
    match config.get_string("analysis", "tata_method") {
        None => Ok(TataPreference::Auto),
        Some(s) => s.parse(),
    }
}

/// `[analysis] benford_fields`, defaulting to the standard eight lines.
pub fn benford_fields(config: &dyn ConfigPort) -> Result<Vec<Field>, FraudlensError> {
    let Some(list) = config.get_string("analysis", "benford_fields") else {
        return Ok(DEFAULT_FIELDS.to_vec());
    };
    let invalid = |reason: String| FraudlensError::ConfigInvalid {
        section: "analysis".to_string(),
        key: "benford_fields".to_string(),
        reason,
    };
    let fields = parse_fields(&list).map_err(|e| invalid(e.to_string()))?;
    if fields.is_empty() {
        return Err(invalid("at least one field is required".to_string()));
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_csv_config_passes() {
        let config = make_config(
            r#"
[data]
source = csv

[csv]
path = data/accrual

[analysis]
tata_method = accrual
benford_fields = Revenue,COGS,Operating_Expenses
"#,
        );
        assert!(validate_config(&config).is_ok());
        assert_eq!(data_source(&config).unwrap(), DataSource::Csv);
        assert_eq!(
            benford_fields(&config).unwrap(),
            vec![Field::Revenue, Field::Cogs, Field::Sga]
        );
    }

    #[test]
    fn valid_sqlite_config_passes() {
        let config =
            make_config("[data]\nsource = sqlite\n[sqlite]\npath = fraudlens.db\npool_size = 2\n");
        assert!(validate_config(&config).is_ok());
        assert_eq!(pool_size(&config).unwrap(), 2);
    }

    #[test]
    fn source_defaults_to_csv() {
        let config = make_config("[csv]\npath = data\n");
        assert_eq!(data_source(&config).unwrap(), DataSource::Csv);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_source_fails() {
        let config = make_config("[data]\nsource = parquet\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, FraudlensError::ConfigInvalid { key, .. } if key == "source"));
    }

    #[test]
    fn missing_path_for_selected_source_fails() {
        let config = make_config("[data]\nsource = sqlite\n[csv]\npath = data\n");
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, FraudlensError::ConfigMissing { section, key } if section == "sqlite" && key == "path")
        );
    }

    #[test]
    fn pool_size_zero_fails() {
        let config = make_config("[csv]\npath = data\n[sqlite]\npool_size = 0\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, FraudlensError::ConfigInvalid { key, .. } if key == "pool_size"));
    }

    #[test]
    fn non_numeric_pool_size_fails() {
        let config = make_config("[csv]\npath = data\n[sqlite]\npool_size = many\n");
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, FraudlensError::ConfigInvalid { ref key, ref reason, .. } if key == "pool_size" && reason.contains("many"))
        );
        assert!(pool_size(&make_config("[sqlite]\npool_size = -3\n")).is_err());
    }

    #[test]
    fn pool_size_defaults() {
        let config = make_config("[csv]\npath = data\n");
        assert_eq!(pool_size(&config).unwrap(), DEFAULT_POOL_SIZE);
    }

    #[test]
    fn unknown_tata_method_fails() {
        let config = make_config("[csv]\npath = data\n[analysis]\ntata_method = both\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, FraudlensError::ConfigInvalid { key, .. } if key == "tata_method"));
    }

    #[test]
    fn tata_method_defaults_to_auto() {
        let config = make_config("[csv]\npath = data\n");
        assert_eq!(tata_preference(&config).unwrap(), TataPreference::Auto);
    }

    #[test]
    fn unknown_benford_field_fails() {
        let config = make_config("[csv]\npath = data\n[analysis]\nbenford_fields = Revenue,EBITDA\n");
        let err = validate_config(&config).unwrap_err();
        match err {
            FraudlensError::ConfigInvalid { key, reason, .. } => {
                assert_eq!(key, "benford_fields");
                assert!(reason.contains("EBITDA"));
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn empty_benford_list_fails() {
        let config = make_config("[csv]\npath = data\n[analysis]\nbenford_fields = , ,\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, FraudlensError::ConfigInvalid { key, .. } if key == "benford_fields"));
    }

    #[test]
    fn benford_fields_default() {
        let config = make_config("[csv]\npath = data\n");
        assert_eq!(benford_fields(&config).unwrap(), DEFAULT_FIELDS.to_vec());
    }
}
