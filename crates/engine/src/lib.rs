//! `potmap-engine`: corrosion analysis over a half-cell potential grid.
//!
//! Pure engine crate: receives a validated grid and parameters, returns
//! band statistics, gradients, an overall verdict and ASTM C876
//! recommendations. No IO.

pub mod analysis;
pub mod gradient;
pub mod interpretation;
pub mod recommendation;
pub mod statistics;

pub use analysis::{analyze, Analysis};
pub use gradient::{GradientLevel, GradientMatrix, GradientPoint, GradientSummary};
pub use interpretation::{interpret, Interpretation, InterpretationTier};
pub use recommendation::{generate_recommendations, Recommendation, RecommendationKind};
pub use statistics::{BandStat, RiskBand, Statistics, UncertainPoint};
