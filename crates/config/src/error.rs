use std::fmt;

use potmap_core::CoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// TOML/JSON parse or deserialization error.
    Parse(String),
    /// Structurally valid but inconsistent configuration.
    Validation(String),
    Io(String),
    /// Parameters violate a core invariant.
    Core(CoreError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Core(e) => write!(f, "invalid parameters: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<CoreError> for ConfigError {
    fn from(e: CoreError) -> Self {
        Self::Core(e)
    }
}
