// User settings
// Loaded from ~/.config/potmap/settings.json

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use potmap_core::{CoreError, Electrode, Parameters, DEFAULT_COVER_DEPTH_MM};
use potmap_report::{ReportOptions, DEFAULT_TABLE_ROW_LIMIT, DEFAULT_TITLE};

use crate::error::ConfigError;

/// Report formatting preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportSettings {
    /// `.` or `,`
    pub decimal_separator: char,

    /// Rows shown in gradient and uncertain-point tables
    pub table_row_limit: usize,

    pub title: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            table_row_limit: DEFAULT_TABLE_ROW_LIMIT,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Reference electrode used when a survey does not name one
    pub electrode: Electrode,

    pub cover_depth_mm: u32,

    #[serde(rename = "resistivityKOhmCm")]
    pub resistivity_kohm_cm: Option<f64>,

    pub report: ReportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            electrode: Electrode::Cse,
            cover_depth_mm: DEFAULT_COVER_DEPTH_MM,
            resistivity_kohm_cm: None,
            report: ReportSettings::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("potmap")
            .join("settings.json")
    }

    /// Load settings from the user config dir, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file gives defaults silently;
    /// an unreadable or invalid one gives defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("cannot read {}: {e}; using default settings", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}: {e}; using default settings", path.display());
                Self::default()
            }
        }
    }

    /// Parse and validate. Lines starting with `//` are comments.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        let settings: Settings =
            serde_json::from_str(&cleaned).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.report.decimal_separator, '.' | ',') {
            return Err(ConfigError::Validation(format!(
                "report.decimalSeparator must be '.' or ',', got '{}'",
                self.report.decimal_separator
            )));
        }
        if self.report.table_row_limit == 0 {
            return Err(ConfigError::Validation(
                "report.tableRowLimit must be at least 1".into(),
            ));
        }
        self.default_parameters()?;
        Ok(())
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Parameters seeded from these settings, thresholds from the catalog.
    pub fn default_parameters(&self) -> Result<Parameters, CoreError> {
        Parameters::new(self.electrode, self.cover_depth_mm, self.resistivity_kohm_cm, None)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            title: self.report.title.clone(),
            decimal_separator: self.report.decimal_separator,
            table_row_limit: self.report.table_row_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        let params = settings.default_parameters().unwrap();
        assert_eq!(params.severe_threshold_mv(), -350.0);
        assert_eq!(params.cover_depth_mm(), 30);
    }

    #[test]
    fn test_partial_file_with_comments() {
        let json = r#"{
    // site default
    "electrode": "SCE",
    "resistivityKOhmCm": 15.0,
    "report": { "decimalSeparator": "," }
}"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.electrode, Electrode::Sce);
        assert_eq!(settings.cover_depth_mm, 30);
        assert_eq!(settings.resistivity_kohm_cm, Some(15.0));
        assert_eq!(settings.report.decimal_separator, ',');
        assert_eq!(settings.report.table_row_limit, 10);
        assert_eq!(settings.default_parameters().unwrap().low_threshold_mv(), -110.0);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());

        fs::write(&path, r#"{ "coverDepthMm": 0 }"#).unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_invalid_report_settings() {
        assert!(matches!(
            Settings::from_json(r#"{ "report": { "decimalSeparator": ";" } }"#),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "report": { "tableRowLimit": 0 } }"#),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.electrode = Electrode::AgAgCl;
        settings.report.title = "Bridge 14".to_string();
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }
}
