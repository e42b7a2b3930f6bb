//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | General error (unspecified)              |
//! | 2       | Universal | CLI usage error (bad args, bad values)   |
//! | 3-9     | import    | Grid CSV could not be loaded             |
//! | 10-19   | config    | Settings / survey job file problems      |
//! | 20-29   | report    | Rendering or writing the report          |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant mapping function below

use potmap_config::ConfigError;
use potmap_io::ImportError;
use potmap_report::ReportError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, inconsistent option values.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Import (3-9)
// =============================================================================

/// Grid file missing or unreadable.
pub const EXIT_IMPORT_IO: u8 = 3;

/// Grid CSV malformed (too few lines, unreadable row).
pub const EXIT_IMPORT_MALFORMED: u8 = 4;

/// Grid CSV parsed but does not form a valid grid (ragged rows,
/// duplicate coordinates).
pub const EXIT_IMPORT_SHAPE: u8 = 5;

// =============================================================================
// Config (10-19)
// =============================================================================

/// Survey job file or settings could not be parsed.
pub const EXIT_CONFIG_PARSE: u8 = 10;

/// Configuration parsed but is inconsistent or violates parameter rules.
pub const EXIT_CONFIG_INVALID: u8 = 11;

/// Survey job file missing or unreadable.
pub const EXIT_CONFIG_IO: u8 = 12;

// =============================================================================
// Report (20-29)
// =============================================================================

/// Backend failed to render the document.
pub const EXIT_REPORT_RENDER: u8 = 20;

/// Output file could not be written.
pub const EXIT_REPORT_OUTPUT: u8 = 21;

// =============================================================================
// Error mapping
// =============================================================================

pub fn import_exit_code(err: &ImportError) -> u8 {
    match err {
        ImportError::Io(_) => EXIT_IMPORT_IO,
        ImportError::TooFewLines(_) | ImportError::Row { .. } => EXIT_IMPORT_MALFORMED,
        ImportError::Shape(_) => EXIT_IMPORT_SHAPE,
    }
}

pub fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::Parse(_) => EXIT_CONFIG_PARSE,
        ConfigError::Validation(_) | ConfigError::Core(_) => EXIT_CONFIG_INVALID,
        ConfigError::Io(_) => EXIT_CONFIG_IO,
    }
}

pub fn report_exit_code(err: &ReportError) -> u8 {
    match err {
        ReportError::Write(_) | ReportError::Serialize(_) => EXIT_REPORT_RENDER,
    }
}
