use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Backend failed to produce the artifact.
    Write(String),
    /// Document could not be encoded.
    Serialize(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write(msg) => write!(f, "report write error: {msg}"),
            Self::Serialize(msg) => write!(f, "report serialize error: {msg}"),
        }
    }
}

impl std::error::Error for ReportError {}
