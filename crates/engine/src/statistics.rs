//! Risk-band classification and aggregate statistics.
//!
//! The grid is stored in volts; thresholds arrive in millivolts and are
//! converted once. Band membership:
//! - `v < severe`        → severe
//! - `v > low`           → low
//! - `severe <= v <= low` → uncertain (both ends inclusive)

use serde::Serialize;

use potmap_core::GridModel;

// =============================================================================
// Types
// =============================================================================

/// ASTM C876 probability-of-corrosion band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    /// More than 90% probability of active corrosion
    Severe,
    /// Transition zone, no conclusion possible
    Uncertain,
    /// More than 90% probability of no corrosion
    Low,
}

impl RiskBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Severe => "severe",
            RiskBand::Uncertain => "uncertain",
            RiskBand::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BandStat {
    pub count: usize,
    /// Share of all cells, 0–100
    pub percentage: f64,
}

/// Aggregate view of the grid. Potentials in millivolts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub severe: BandStat,
    pub uncertain: BandStat,
    pub low: BandStat,
    pub mean: f64,
    /// Population standard deviation (divides by `total`)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Cell count, never below 1
    pub total: usize,
}

impl Statistics {
    pub fn band(&self, band: RiskBand) -> BandStat {
        match band {
            RiskBand::Severe => self.severe,
            RiskBand::Uncertain => self.uncertain,
            RiskBand::Low => self.low,
        }
    }

    pub fn severe_ratio(&self) -> f64 {
        self.severe.percentage / 100.0
    }

    pub fn uncertain_ratio(&self) -> f64 {
        self.uncertain.percentage / 100.0
    }

    pub fn low_ratio(&self) -> f64 {
        self.low.percentage / 100.0
    }
}

/// A cell inside the uncertain band. `value` in millivolts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UncertainPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

// =============================================================================
// Classification
// =============================================================================

/// Threshold pair converted to volts.
#[derive(Debug, Clone, Copy)]
pub struct BandThresholds {
    severe_v: f64,
    low_v: f64,
}

impl BandThresholds {
    pub fn from_mv(severe_mv: f64, low_mv: f64) -> Self {
        Self {
            severe_v: severe_mv / 1000.0,
            low_v: low_mv / 1000.0,
        }
    }

    /// Classify a reading given in volts.
    pub fn classify(&self, v: f64) -> RiskBand {
        if v < self.severe_v {
            RiskBand::Severe
        } else if v > self.low_v {
            RiskBand::Low
        } else {
            RiskBand::Uncertain
        }
    }
}

/// Classify every cell and compute mean, spread and range.
///
/// An empty grid is treated as `total = 1` so percentages stay finite;
/// mean, deviation, min and max are then 0.
pub fn calculate_statistics(grid: &GridModel, severe_mv: f64, low_mv: f64) -> Statistics {
    let thresholds = BandThresholds::from_mv(severe_mv, low_mv);
    let flat: Vec<f64> = grid.values().collect();

    let mut severe = 0usize;
    let mut uncertain = 0usize;
    let mut low = 0usize;
    for &v in &flat {
        match thresholds.classify(v) {
            RiskBand::Severe => severe += 1,
            RiskBand::Uncertain => uncertain += 1,
            RiskBand::Low => low += 1,
        }
    }

    let total = flat.len().max(1);
    let n = total as f64;
    let mean = flat.iter().sum::<f64>() / n;
    let variance = flat.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    let (min, max) = if flat.is_empty() {
        (0.0, 0.0)
    } else {
        flat.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
    };

    let band = |count: usize| BandStat {
        count,
        percentage: count as f64 / n * 100.0,
    };

    Statistics {
        severe: band(severe),
        uncertain: band(uncertain),
        low: band(low),
        mean: mean * 1000.0,
        std_dev: variance.sqrt() * 1000.0,
        min: min * 1000.0,
        max: max * 1000.0,
        total,
    }
}

/// Cells in the uncertain band, in row-major scan order.
pub fn uncertain_points(grid: &GridModel, severe_mv: f64, low_mv: f64) -> Vec<UncertainPoint> {
    let thresholds = BandThresholds::from_mv(severe_mv, low_mv);
    grid.cells()
        .filter(|cell| thresholds.classify(cell.value) == RiskBand::Uncertain)
        .map(|cell| UncertainPoint {
            x: cell.x,
            y: cell.y,
            value: cell.value * 1000.0,
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
