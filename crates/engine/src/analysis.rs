use serde::Serialize;

use potmap_core::{GridModel, Parameters};

use crate::gradient::{
    calculate_gradient_matrix, calculate_gradients, GradientMatrix, GradientPoint, GradientSummary,
};
use crate::interpretation::{interpret, Interpretation};
use crate::recommendation::{generate_recommendations, Recommendation};
use crate::statistics::{calculate_statistics, uncertain_points, Statistics, UncertainPoint};

/// Everything derived from one (grid, parameters) snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub statistics: Statistics,
    pub uncertain_points: Vec<UncertainPoint>,
    pub gradients: Vec<GradientPoint>,
    pub gradient_matrix: GradientMatrix,
    pub gradient_summary: GradientSummary,
    /// Set when the grid has fewer than two rows or columns; the gradient
    /// outputs are then empty.
    pub degenerate_axis: bool,
    pub interpretation: Interpretation,
    pub recommendations: Vec<Recommendation>,
}

/// Run the whole pipeline: statistics and gradients, then interpretation
/// and recommendations. Pure; identical inputs give identical output.
pub fn analyze(grid: &GridModel, params: &Parameters) -> Analysis {
    let severe = params.severe_threshold_mv();
    let low = params.low_threshold_mv();

    let statistics = calculate_statistics(grid, severe, low);
    let uncertain_points = uncertain_points(grid, severe, low);

    let degenerate_axis = grid.has_degenerate_axis();
    if degenerate_axis && !grid.is_empty() {
        log::warn!(
            "grid is {}x{}; potential gradients need at least two rows and two columns",
            grid.rows(),
            grid.cols()
        );
    }
    let gradients = calculate_gradients(grid);
    let gradient_matrix = calculate_gradient_matrix(grid);
    let gradient_summary = GradientSummary::from_points(&gradients);

    let interpretation = interpret(&statistics);
    let recommendations = generate_recommendations(&statistics, &gradients, params);

    log::debug!(
        "analyzed {} cell(s): {} severe, {} uncertain, {} low; {} gradient point(s); {} recommendation(s)",
        grid.len(),
        statistics.severe.count,
        statistics.uncertain.count,
        statistics.low.count,
        gradients.len(),
        recommendations.len(),
    );

    Analysis {
        statistics,
        uncertain_points,
        gradients,
        gradient_matrix,
        gradient_summary,
        degenerate_axis,
        interpretation,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpretation::InterpretationTier;

    #[test]
    fn scenario_two_by_two() {
        let grid = GridModel::new(
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![vec![-0.40, -0.10], vec![-0.05, -0.02]],
        )
        .unwrap();
        let a = analyze(&grid, &Parameters::default());

        assert_eq!(a.statistics.severe.count, 1);
        assert_eq!(a.statistics.low.count, 3);
        assert!(a.uncertain_points.is_empty());
        assert_eq!(a.gradients.len(), 1);
        assert!((a.gradient_summary.max - 350.0).abs() < 1e-9);
        assert!(!a.degenerate_axis);
        // 25% severe
        assert_eq!(a.interpretation.tier, InterpretationTier::AttentionRequired);
        assert_eq!(a.recommendations[0].title, "SIGNIFICANT LOCALIZED CORROSION");
        assert_eq!(a.recommendations[1].title, "HIGH POTENTIAL GRADIENTS");
    }

    #[test]
    fn single_cell_flags_degenerate_axis() {
        let grid = GridModel::new(vec![0.0], vec![0.0], vec![vec![-0.30]]).unwrap();
        let a = analyze(&grid, &Parameters::default());
        assert!(a.degenerate_axis);
        assert!(a.gradients.is_empty());
        assert_eq!(a.gradient_summary, GradientSummary::default());
        assert_eq!(a.uncertain_points.len(), 1);
        assert!((a.uncertain_points[0].value - -300.0).abs() < 1e-9);
    }
}
