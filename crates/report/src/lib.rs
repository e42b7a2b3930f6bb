//! `potmap-report`: format-agnostic survey report.
//!
//! [`ReportDocumentBuilder`] turns an analysis into a [`ReportDocument`]:
//! ordered sections of plain-data blocks. Backends implement
//! [`DocumentWriter`] (and optionally [`ChartCapture`]) to produce the
//! final artifact.

pub mod builder;
pub mod document;
pub mod error;
pub mod render;

pub use builder::{ReportDocumentBuilder, ReportInput, ReportOptions, DEFAULT_TABLE_ROW_LIMIT, DEFAULT_TITLE};
pub use document::{
    Block, ChartId, KeyValue, Metric, ReportDocument, ReportMeta, Section, SectionId, Table,
    TextStyle,
};
pub use error::ReportError;
pub use render::{capture_charts, render, ChartCapture, ChartImages, DocumentWriter, NoCharts};
