use crate::{
    error::{AntError, ErrorCode},
    genetic_code::{TableId, STANDARD_TABLE},
    report::ReportFormat,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SETTINGS_PATH: &str = ".ant_settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntSettings {
    pub default_table: TableId,
    pub report_format: ReportFormat,
    /// `tracing` filter used when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for AntSettings {
    fn default() -> Self {
        Self {
            default_table: STANDARD_TABLE,
            report_format: ReportFormat::Text,
            log_filter: "warn".to_string(),
        }
    }
}

impl AntSettings {
    pub fn load_from_path(path: &str) -> Result<Self, AntError> {
        let text = std::fs::read_to_string(path).map_err(|e| AntError {
            code: ErrorCode::Io,
            message: format!("Could not read settings file '{path}': {e}"),
        })?;
        serde_json::from_str(&text).map_err(|e| AntError {
            code: ErrorCode::InvalidInput,
            message: format!("Could not parse settings JSON '{path}': {e}"),
        })
    }

    /// Settings from `path`, or the defaults when no such file exists
    pub fn load_or_default(path: &str) -> Result<Self, AntError> {
        if Path::new(path).exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_path(&self, path: &str) -> Result<(), AntError> {
        let text = serde_json::to_string_pretty(self).map_err(|e| AntError {
            code: ErrorCode::Internal,
            message: format!("Could not serialize settings: {e}"),
        })?;
        std::fs::write(path, text).map_err(|e| AntError {
            code: ErrorCode::Io,
            message: format!("Could not write settings file '{path}': {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"default_table": 11}"#).unwrap();
        let settings = AntSettings::load_from_path(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.default_table, 11);
        assert_eq!(settings.report_format, ReportFormat::Text);
        assert_eq!(settings.log_filter, "warn");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let path = path.to_str().unwrap();
        let settings = AntSettings {
            default_table: 1001,
            report_format: ReportFormat::Csv,
            log_filter: "debug".to_string(),
        };
        settings.save_to_path(path).unwrap();
        assert_eq!(AntSettings::load_from_path(path).unwrap(), settings);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let path = path.to_str().unwrap();
        assert_eq!(AntSettings::load_or_default(path).unwrap(), AntSettings::default());
        assert_eq!(
            AntSettings::load_from_path(path).unwrap_err().code,
            ErrorCode::Io
        );
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = AntSettings::load_from_path(path.to_str().unwrap()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
