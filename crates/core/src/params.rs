// Test parameters for a survey

use serde::{Deserialize, Serialize};

use crate::electrode::Electrode;
use crate::error::CoreError;

pub const DEFAULT_COVER_DEPTH_MM: u32 = 30;

/// Parameters the analysis depends on besides the grid itself.
///
/// Invariants: `severe_threshold_mv < low_threshold_mv`, cover depth > 0,
/// resistivity (when measured) > 0. Selecting an electrode resets both
/// thresholds to that electrode's catalog values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParametersData")]
pub struct Parameters {
    electrode: Electrode,
    cover_depth_mm: u32,
    resistivity_kohm_cm: Option<f64>,
    severe_threshold_mv: f64,
    low_threshold_mv: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct ParametersData {
    electrode: Electrode,
    cover_depth_mm: u32,
    #[serde(default)]
    resistivity_kohm_cm: Option<f64>,
    severe_threshold_mv: f64,
    low_threshold_mv: f64,
}

impl TryFrom<ParametersData> for Parameters {
    type Error = CoreError;

    fn try_from(data: ParametersData) -> Result<Self, Self::Error> {
        Parameters::new(
            data.electrode,
            data.cover_depth_mm,
            data.resistivity_kohm_cm,
            Some((data.severe_threshold_mv, data.low_threshold_mv)),
        )
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::for_electrode(Electrode::default())
    }
}

impl Parameters {
    /// Build validated parameters. `thresholds` overrides the catalog pair
    /// as `(severe_mv, low_mv)`.
    pub fn new(
        electrode: Electrode,
        cover_depth_mm: u32,
        resistivity_kohm_cm: Option<f64>,
        thresholds: Option<(f64, f64)>,
    ) -> Result<Self, CoreError> {
        let mut params = Self::for_electrode(electrode);
        params.set_cover_depth(cover_depth_mm)?;
        params.set_resistivity(resistivity_kohm_cm)?;
        if let Some((severe, low)) = thresholds {
            params.set_thresholds(severe, low)?;
        }
        Ok(params)
    }

    /// Catalog thresholds for `electrode`, default cover, no resistivity.
    pub fn for_electrode(electrode: Electrode) -> Self {
        let reference = electrode.reference();
        Self {
            electrode,
            cover_depth_mm: DEFAULT_COVER_DEPTH_MM,
            resistivity_kohm_cm: None,
            severe_threshold_mv: reference.severe_threshold_mv,
            low_threshold_mv: reference.low_threshold_mv,
        }
    }

    pub fn electrode(&self) -> Electrode {
        self.electrode
    }

    pub fn cover_depth_mm(&self) -> u32 {
        self.cover_depth_mm
    }

    pub fn resistivity_kohm_cm(&self) -> Option<f64> {
        self.resistivity_kohm_cm
    }

    pub fn severe_threshold_mv(&self) -> f64 {
        self.severe_threshold_mv
    }

    pub fn low_threshold_mv(&self) -> f64 {
        self.low_threshold_mv
    }

    /// Switch electrode; thresholds snap back to the catalog pair.
    pub fn select_electrode(&mut self, electrode: Electrode) {
        let reference = electrode.reference();
        self.electrode = electrode;
        self.severe_threshold_mv = reference.severe_threshold_mv;
        self.low_threshold_mv = reference.low_threshold_mv;
    }

    pub fn set_thresholds(&mut self, severe_mv: f64, low_mv: f64) -> Result<(), CoreError> {
        if !severe_mv.is_finite() || !low_mv.is_finite() || severe_mv >= low_mv {
            return Err(CoreError::InvalidThresholds { severe_mv, low_mv });
        }
        self.severe_threshold_mv = severe_mv;
        self.low_threshold_mv = low_mv;
        Ok(())
    }

    pub fn set_cover_depth(&mut self, mm: u32) -> Result<(), CoreError> {
        if mm == 0 {
            return Err(CoreError::InvalidCoverDepth(mm));
        }
        self.cover_depth_mm = mm;
        Ok(())
    }

    /// `None` means resistivity was not measured.
    pub fn set_resistivity(&mut self, kohm_cm: Option<f64>) -> Result<(), CoreError> {
        if let Some(r) = kohm_cm {
            if !r.is_finite() || r <= 0.0 {
                return Err(CoreError::InvalidResistivity(r));
            }
        }
        self.resistivity_kohm_cm = kohm_cm;
        Ok(())
    }
}
