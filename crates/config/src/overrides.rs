// Parameter overrides layered over a base set

use potmap_core::{CoreError, Electrode, Parameters};

/// Fields a survey file or command line may set. Unset fields keep the
/// base value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParameterOverrides {
    pub electrode: Option<Electrode>,
    pub cover_depth_mm: Option<u32>,
    pub resistivity_kohm_cm: Option<f64>,
    /// `(severe_mv, low_mv)`
    pub thresholds: Option<(f64, f64)>,
}

impl ParameterOverrides {
    /// Switching electrode without explicit thresholds selects the new
    /// electrode's catalog pair; keeping it keeps the base thresholds.
    pub fn apply(&self, base: &Parameters) -> Result<Parameters, CoreError> {
        let electrode = self.electrode.unwrap_or(base.electrode());
        let thresholds = match self.thresholds {
            Some(pair) => Some(pair),
            None if electrode == base.electrode() => {
                Some((base.severe_threshold_mv(), base.low_threshold_mv()))
            }
            None => None,
        };
        Parameters::new(
            electrode,
            self.cover_depth_mm.unwrap_or(base.cover_depth_mm()),
            self.resistivity_kohm_cm.or(base.resistivity_kohm_cm()),
            thresholds,
        )
    }
}
