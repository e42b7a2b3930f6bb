//! `potmap-config`: user settings and survey job files.

pub mod error;
pub mod overrides;
pub mod settings;
pub mod survey;

pub use error::ConfigError;
pub use overrides::ParameterOverrides;
pub use settings::{ReportSettings, Settings};
pub use survey::SurveyConfig;
