//! `potmap-core`: shared types for half-cell potential surveys.
//!
//! The grid of readings, the test parameters and the ASTM C876 electrode
//! catalog. Everything here validates on construction so the analysis
//! crates can stay infallible.

pub mod electrode;
pub mod error;
pub mod grid;
pub mod inspection;
pub mod params;

pub use electrode::{Electrode, ElectrodeCatalog, ElectrodeReference};
pub use error::{Axis, CoreError};
pub use grid::{Cell, GridModel};
pub use inspection::{AttachedPhoto, InspectionInfo};
pub use params::{Parameters, DEFAULT_COVER_DEPTH_MM};
