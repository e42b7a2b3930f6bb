//! Spatial potential gradients (mV/m).
//!
//! For each cell with a right and a lower neighbour:
//!
//! ```text
//! gradX = |V[r][c+1] - V[r][c]| / dx
//! gradY = |V[r+1][c] - V[r][c]| / dy
//! gradient = max(gradX, gradY) * 1000
//! ```
//!
//! `dx`/`dy` come from the first two coordinates of each axis and fall back
//! to 1 when an axis has a single coordinate. Such a grid has no interior
//! cells, so the field is empty; callers detect it with
//! [`GridModel::has_degenerate_axis`].

use serde::Serialize;

use potmap_core::GridModel;

/// Above this a gradient points to an active macrocell.
pub const MACROCELL_GRADIENT_MV_M: f64 = 150.0;
/// Above this a gradient counts as critical.
pub const CRITICAL_GRADIENT_MV_M: f64 = 100.0;
/// Above this a gradient is worth watching.
pub const ELEVATED_GRADIENT_MV_M: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientPoint {
    pub x: f64,
    pub y: f64,
    pub gradient: f64,
}

impl GradientPoint {
    pub fn level(&self) -> GradientLevel {
        GradientLevel::of(self.gradient)
    }
}

/// Dense gradient field over the truncated axes `x[0..cols-1]`, `y[0..rows-1]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GradientMatrix {
    pub x_vals: Vec<f64>,
    pub y_vals: Vec<f64>,
    pub matrix: Vec<Vec<f64>>,
}

/// Per-point status used by gradient tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientLevel {
    Normal,
    Elevated,
    Critical,
}

impl GradientLevel {
    pub fn of(gradient: f64) -> Self {
        if gradient > CRITICAL_GRADIENT_MV_M {
            GradientLevel::Critical
        } else if gradient > ELEVATED_GRADIENT_MV_M {
            GradientLevel::Elevated
        } else {
            GradientLevel::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GradientLevel::Normal => "Normal",
            GradientLevel::Elevated => "Elevated",
            GradientLevel::Critical => "Critical",
        }
    }
}

/// Max, mean and critical count over a gradient list. All zero when empty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GradientSummary {
    pub max: f64,
    pub mean: f64,
    pub critical_count: usize,
    pub point_count: usize,
}

impl GradientSummary {
    pub fn from_points(points: &[GradientPoint]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let max = points
            .iter()
            .map(|p| p.gradient)
            .fold(f64::NEG_INFINITY, f64::max);
        let mean = points.iter().map(|p| p.gradient).sum::<f64>() / points.len() as f64;
        let critical_count = points
            .iter()
            .filter(|p| p.gradient > CRITICAL_GRADIENT_MV_M)
            .count();
        Self {
            max,
            mean,
            critical_count,
            point_count: points.len(),
        }
    }
}

fn spacing(axis: &[f64]) -> f64 {
    match axis {
        [a, b, ..] => {
            let d = (b - a).abs();
            if d == 0.0 {
                1.0
            } else {
                d
            }
        }
        _ => 1.0,
    }
}

/// Gradient at `(r, c)`. Caller guarantees `r + 1 < rows` and `c + 1 < cols`.
fn cell_gradient(m: &[Vec<f64>], r: usize, c: usize, dx: f64, dy: f64) -> f64 {
    let grad_x = (m[r][c + 1] - m[r][c]).abs() / dx;
    let grad_y = (m[r + 1][c] - m[r][c]).abs() / dy;
    grad_x.max(grad_y) * 1000.0
}

/// Interior-cell gradients as a point list, anchored at each cell's
/// lower-index corner, row-major.
pub fn calculate_gradients(grid: &GridModel) -> Vec<GradientPoint> {
    if grid.has_degenerate_axis() {
        log::debug!(
            "gradient field empty: grid is {}x{}",
            grid.rows(),
            grid.cols()
        );
        return Vec::new();
    }

    let dx = spacing(grid.x_vals());
    let dy = spacing(grid.y_vals());
    let m = grid.matrix();

    let mut points = Vec::with_capacity((grid.rows() - 1) * (grid.cols() - 1));
    for r in 0..grid.rows() - 1 {
        for c in 0..grid.cols() - 1 {
            points.push(GradientPoint {
                x: grid.x_vals()[c],
                y: grid.y_vals()[r],
                gradient: cell_gradient(m, r, c, dx, dy),
            });
        }
    }
    points
}

/// Same field as [`calculate_gradients`], laid out as a matrix for
/// surface and contour rendering.
pub fn calculate_gradient_matrix(grid: &GridModel) -> GradientMatrix {
    if grid.has_degenerate_axis() {
        return GradientMatrix::default();
    }

    let dx = spacing(grid.x_vals());
    let dy = spacing(grid.y_vals());
    let m = grid.matrix();
    let rows = grid.rows() - 1;
    let cols = grid.cols() - 1;

    let matrix = (0..rows)
        .map(|r| (0..cols).map(|c| cell_gradient(m, r, c, dx, dy)).collect())
        .collect();

    GradientMatrix {
        x_vals: grid.x_vals()[..cols].to_vec(),
        y_vals: grid.y_vals()[..rows].to_vec(),
        matrix,
    }
}
