// Survey job file (TOML)
//
// One file per survey: where the grid lives, how it was measured, who
// measured it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use potmap_core::{AttachedPhoto, Electrode, InspectionInfo, Parameters};

use crate::error::ConfigError;
use crate::overrides::ParameterOverrides;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyConfig {
    /// Grid CSV. Relative paths resolve against the job file's directory.
    pub grid: PathBuf,

    /// Electrode code, case-insensitive (`CSE`, `SCE`, `AgAgCl`)
    #[serde(default)]
    pub electrode: Option<String>,

    #[serde(default)]
    pub cover_depth_mm: Option<u32>,

    #[serde(default)]
    pub resistivity_kohm_cm: Option<f64>,

    /// Overrides the catalog pair; must come with `low_threshold_mv`
    #[serde(default)]
    pub severe_threshold_mv: Option<f64>,

    #[serde(default)]
    pub low_threshold_mv: Option<f64>,

    #[serde(default)]
    pub comments: String,

    #[serde(default)]
    pub inspection: InspectionInfo,

    #[serde(default)]
    pub photos: Vec<AttachedPhoto>,
}

impl SurveyConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: SurveyConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a job file and resolve its grid path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml(&input)?;
        if config.grid.is_relative() {
            if let Some(dir) = path.parent() {
                config.grid = dir.join(&config.grid);
            }
        }
        log::debug!("loaded survey {} (grid {})", path.display(), config.grid.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.as_os_str().is_empty() {
            return Err(ConfigError::Validation("grid path is empty".into()));
        }

        if self.severe_threshold_mv.is_some() != self.low_threshold_mv.is_some() {
            return Err(ConfigError::Validation(
                "severe_threshold_mv and low_threshold_mv must be set together".into(),
            ));
        }

        self.parameters()?;

        let mut seen = HashSet::new();
        for photo in &self.photos {
            if photo.id.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "photo '{}' has an empty id",
                    photo.name
                )));
            }
            if !seen.insert(photo.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate photo id '{}'",
                    photo.id
                )));
            }
        }

        Ok(())
    }

    /// Parameters from this job alone; unset fields take the defaults.
    pub fn parameters(&self) -> Result<Parameters, ConfigError> {
        self.parameters_with(&Parameters::default())
    }

    /// Parameters from this job, falling back to `base` for unset fields.
    pub fn parameters_with(&self, base: &Parameters) -> Result<Parameters, ConfigError> {
        Ok(self.overrides()?.apply(base)?)
    }

    pub fn overrides(&self) -> Result<ParameterOverrides, ConfigError> {
        let electrode = match &self.electrode {
            Some(code) => Some(code.parse::<Electrode>()?),
            None => None,
        };
        Ok(ParameterOverrides {
            electrode,
            cover_depth_mm: self.cover_depth_mm,
            resistivity_kohm_cm: self.resistivity_kohm_cm,
            thresholds: self.severe_threshold_mv.zip(self.low_threshold_mv),
        })
    }
}
