//! Seams to the rendering backends.
//!
//! The builder never touches pixels or file formats. A backend supplies
//! chart images through [`ChartCapture`] and turns the finished document
//! into bytes through [`DocumentWriter`].

use std::collections::BTreeMap;

use crate::document::{ChartId, ReportDocument};
use crate::error::ReportError;

/// Captured chart images keyed by chart. A missing key means the capture
/// failed and the writer prints the placeholder's fallback text instead.
pub type ChartImages = BTreeMap<ChartId, Vec<u8>>;

pub trait ChartCapture {
    /// Rasterize one chart region. `None` when the chart is unavailable.
    fn capture_chart(&self, chart: ChartId) -> Option<Vec<u8>>;
}

pub trait DocumentWriter {
    /// Produce the final artifact.
    fn write_document(
        &self,
        document: &ReportDocument,
        images: &ChartImages,
    ) -> Result<Vec<u8>, ReportError>;

    /// File extension of the artifact, without the dot.
    fn extension(&self) -> &'static str;
}

/// Capture source for headless runs: every chart is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCharts;

impl ChartCapture for NoCharts {
    fn capture_chart(&self, _chart: ChartId) -> Option<Vec<u8>> {
        None
    }
}

/// Ask `capture` for every chart the document references. Missing images
/// are logged and left out; they never fail the report.
pub fn capture_charts(document: &ReportDocument, capture: &dyn ChartCapture) -> ChartImages {
    let mut images = ChartImages::new();
    for chart in document.chart_ids() {
        if images.contains_key(&chart) {
            continue;
        }
        match capture.capture_chart(chart) {
            Some(bytes) => {
                images.insert(chart, bytes);
            }
            None => log::warn!("chart '{}' unavailable, using text placeholder", chart.identifier()),
        }
    }
    images
}

/// Capture then write in one step.
pub fn render(
    document: &ReportDocument,
    capture: &dyn ChartCapture,
    writer: &dyn DocumentWriter,
) -> Result<Vec<u8>, ReportError> {
    let images = capture_charts(document, capture);
    log::debug!(
        "rendering {} section(s) as {} with {} chart image(s)",
        document.sections.len(),
        writer.extension(),
        images.len()
    );
    writer.write_document(document, &images)
}
