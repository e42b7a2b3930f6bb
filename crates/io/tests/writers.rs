// Report backends over a full pipeline run.

use std::path::PathBuf;

use chrono::{TimeZone, Utc};

use potmap_core::{InspectionInfo, Parameters};
use potmap_engine::analyze;
use potmap_io::csv::import;
use potmap_io::{fingerprint, JsonDocumentWriter, MarkdownDocumentWriter};
use potmap_report::{
    ChartId, ChartImages, DocumentWriter, ReportDocument, ReportDocumentBuilder, ReportInput,
    ReportOptions,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn deck_report() -> ReportDocument {
    let grid = import(&fixtures_dir().join("deck.csv")).unwrap();
    let params = Parameters::default();
    let analysis = analyze(&grid, &params);
    let fp = fingerprint(&grid);
    let info = InspectionInfo {
        location: "Deck slab, bay 2".to_string(),
        ..InspectionInfo::default()
    };
    let input = ReportInput {
        params: &params,
        analysis: &analysis,
        inspection: &info,
        comments: "",
        photos: &[],
        generated_at: Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
        data_fingerprint: Some(fp.as_str()),
    };
    ReportDocumentBuilder::new(ReportOptions::default()).build(&input)
}

#[test]
fn deck_fixture_statistics() {
    let grid = import(&fixtures_dir().join("deck.csv")).unwrap();
    let analysis = analyze(&grid, &Parameters::default());
    let s = &analysis.statistics;
    assert_eq!(s.total, 45);
    assert_eq!(s.severe.count, 0);
    // -0.20 sits on the low threshold and counts as uncertain
    assert_eq!(s.uncertain.count, 22);
    assert_eq!(s.low.count, 23);
}

#[test]
fn markdown_prints_fallbacks_and_truncation() {
    let doc = deck_report();
    let bytes = MarkdownDocumentWriter.write_document(&doc, &ChartImages::new()).unwrap();
    let md = String::from_utf8(bytes).unwrap();

    assert!(md.starts_with("# Half-Cell Potential Mapping Report"));
    assert!(md.contains("## Executive Summary"));
    assert!(md.contains("- Location: Deck slab, bay 2"));
    assert_eq!(md.matches("[chart not available]").count(), 5);
    assert!(md.contains("_... and 12 more not shown_"));
    assert!(md.contains("_Space reserved for the inspector's observations._"));
    assert!(md.trim_end().ends_with("in Concrete._"));
}

#[test]
fn markdown_renders_recommendations_as_callouts() {
    let md = String::from_utf8(
        MarkdownDocumentWriter
            .write_document(&deck_report(), &ChartImages::new())
            .unwrap(),
    )
    .unwrap();
    let urgent = md.find("> **[URGENT] HIGH POTENTIAL GRADIENTS**").unwrap();
    let info = md.find("> **[INFO] Moderate Uncertainty Zone**").unwrap();
    // engine order: uncertain-area rule runs before the gradient rule
    assert!(info < urgent);
    assert!(md.contains(">\n> _ASTM C876-15, Appendix X1_"));
}

#[test]
fn markdown_links_captured_charts() {
    let doc = deck_report();
    let mut images = ChartImages::new();
    images.insert(ChartId::Potential2d, vec![1, 2, 3]);
    let md = String::from_utf8(MarkdownDocumentWriter.write_document(&doc, &images).unwrap()).unwrap();
    assert!(md.contains("(potential_2d.png)"));
    assert_eq!(md.matches("[chart not available]").count(), 4);
}

#[test]
fn json_carries_document_and_chart_manifest() {
    let doc = deck_report();
    let mut images = ChartImages::new();
    images.insert(ChartId::Histogram, vec![0; 16]);
    let bytes = JsonDocumentWriter.write_document(&doc, &images).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["meta"]["electrode"], "CSE");
    assert!(json["meta"]["data_fingerprint"].as_str().unwrap().starts_with("sha256:"));

    let charts = json["charts"].as_array().unwrap();
    assert_eq!(charts.len(), 5);
    assert_eq!(charts[0]["chart"], "histogram");
    assert_eq!(charts[0]["available"], true);
    assert_eq!(charts[0]["bytes"], 16);
    assert_eq!(charts[1]["available"], false);
    assert_eq!(charts[1]["fallback"], "[chart not available]");
}
