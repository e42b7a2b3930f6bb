//! Renderer-agnostic report document.
//!
//! A document is an ordered list of sections, each an ordered list of
//! blocks. Blocks hold plain strings and numbers only; a backend walks
//! them and decides layout, fonts and pagination.

use chrono::{DateTime, Utc};
use serde::Serialize;

use potmap_engine::RecommendationKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub meta: ReportMeta,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub title: String,
    pub subtitle: String,
    pub generated_at: DateTime<Utc>,
    /// Catalog code of the reference electrode
    pub electrode: String,
    /// SHA-256 of the input grid, when the caller supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_fingerprint: Option<String>,
    pub footer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Header,
    ExecutiveSummary,
    RiskAnalysis,
    Recommendations,
    PotentialMap,
    Surface3d,
    GradientMap,
    GradientMethodology,
    GradientPoints,
    UncertainPoints,
    Comments,
    Photos,
    Signature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    KeyValueBox {
        title: String,
        entries: Vec<KeyValue>,
    },
    Table(Table),
    TextBlock {
        text: String,
        style: TextStyle,
    },
    /// A chart the renderer must rasterize. `fallback` is printed when no
    /// image is available.
    ImagePlaceholder {
        chart: ChartId,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        fallback: String,
    },
    MetricTriplet {
        metrics: [Metric; 3],
    },
    /// One recommendation, verbatim.
    Callout {
        severity: RecommendationKind,
        title: String,
        body: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Normal,
    Emphasis,
    Caption,
    /// Stand-in text for content the user has not provided
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub unit: String,
}

/// A table possibly cut to a row limit. `omitted_rows` is always
/// `total_rows - rows.len()` and `note` spells it out when non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub omitted_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Shown instead of the body when there are no rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_text: Option<String>,
}

impl Table {
    /// Keep the first `limit` rows and record how many were dropped.
    pub fn limited(columns: &[&str], mut rows: Vec<Vec<String>>, limit: usize) -> Self {
        let total_rows = rows.len();
        let omitted_rows = total_rows.saturating_sub(limit);
        rows.truncate(limit);
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            total_rows,
            omitted_rows,
            note: (omitted_rows > 0).then(|| format!("... and {omitted_rows} more not shown")),
            empty_text: None,
        }
    }

    pub fn with_empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = Some(text.into());
        self
    }
}

/// Named chart region the renderer knows how to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    Histogram,
    RiskPie,
    Potential2d,
    Surface3d,
    GradientMap,
}

impl ChartId {
    pub fn identifier(&self) -> &'static str {
        match self {
            ChartId::Histogram => "histogram",
            ChartId::RiskPie => "risk_pie",
            ChartId::Potential2d => "potential_2d",
            ChartId::Surface3d => "surface_3d",
            ChartId::GradientMap => "gradient_map",
        }
    }
}

impl ReportDocument {
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Charts referenced by placeholders, in document order.
    pub fn chart_ids(&self) -> Vec<ChartId> {
        self.sections
            .iter()
            .flat_map(|s| s.blocks.iter())
            .filter_map(|b| match b {
                Block::ImagePlaceholder { chart, .. } => Some(*chart),
                _ => None,
            })
            .collect()
    }
}
