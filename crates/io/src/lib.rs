//! `potmap-io`: file boundary of the toolkit.
//!
//! Grid CSV import/export, grid fingerprinting, and the JSON and Markdown
//! report backends.

pub mod csv;
pub mod fingerprint;
pub mod json;
pub mod markdown;

pub use self::csv::ImportError;
pub use fingerprint::fingerprint;
pub use json::JsonDocumentWriter;
pub use markdown::MarkdownDocumentWriter;
