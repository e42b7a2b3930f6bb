// JSON report backend

use serde::Serialize;

use potmap_report::{ChartId, ChartImages, DocumentWriter, ReportDocument, ReportError};

/// Writes the document as pretty JSON, followed by a chart manifest.
/// Image bytes are not embedded; a missing chart carries its fallback text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentWriter;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    document: &'a ReportDocument,
    charts: Vec<ChartEntry>,
}

#[derive(Serialize)]
struct ChartEntry {
    chart: ChartId,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<String>,
}

fn chart_entries(document: &ReportDocument, images: &ChartImages) -> Vec<ChartEntry> {
    let mut entries: Vec<ChartEntry> = Vec::new();
    for section in &document.sections {
        for block in &section.blocks {
            if let potmap_report::Block::ImagePlaceholder { chart, fallback, .. } = block {
                if entries.iter().any(|e| e.chart == *chart) {
                    continue;
                }
                let image = images.get(chart);
                entries.push(ChartEntry {
                    chart: *chart,
                    available: image.is_some(),
                    bytes: image.map(Vec::len),
                    fallback: image.is_none().then(|| fallback.clone()),
                });
            }
        }
    }
    entries
}

impl DocumentWriter for JsonDocumentWriter {
    fn write_document(
        &self,
        document: &ReportDocument,
        images: &ChartImages,
    ) -> Result<Vec<u8>, ReportError> {
        let report = JsonReport {
            document,
            charts: chart_entries(document, images),
        };
        let mut out = serde_json::to_vec_pretty(&report)
            .map_err(|e| ReportError::Serialize(e.to_string()))?;
        out.push(b'\n');
        Ok(out)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
