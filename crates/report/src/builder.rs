//! Assembles a [`ReportDocument`] from a finished analysis.
//!
//! Section order is fixed. Soft conditions (no gradients, no uncertain
//! points, no comments) become visibly empty sections rather than errors.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;

use potmap_core::{AttachedPhoto, InspectionInfo, Parameters};
use potmap_engine::gradient::{CRITICAL_GRADIENT_MV_M, ELEVATED_GRADIENT_MV_M, MACROCELL_GRADIENT_MV_M};
use potmap_engine::{Analysis, GradientPoint};

use crate::document::{
    Block, ChartId, KeyValue, Metric, ReportDocument, ReportMeta, Section, SectionId, Table,
    TextStyle,
};

pub const DEFAULT_TITLE: &str = "Half-Cell Potential Mapping Report";
pub const DEFAULT_TABLE_ROW_LIMIT: usize = 10;

const SUBTITLE: &str = "Reinforcement corrosion assessment per ASTM C876";
const FOOTER: &str = "Prepared according to ASTM C876-15, Standard Test Method for Corrosion \
                      Potentials of Uncoated Reinforcing Steel in Concrete.";
const COMMENTS_PLACEHOLDER: &str = "Space reserved for the inspector's observations.";
const CHART_FALLBACK: &str = "[chart not available]";

// =============================================================================
// Inputs
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub title: String,
    /// Decimal separator used for every number printed in the document
    pub decimal_separator: char,
    /// Row cap for the gradient and uncertain-point tables
    pub table_row_limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            decimal_separator: '.',
            table_row_limit: DEFAULT_TABLE_ROW_LIMIT,
        }
    }
}

/// Everything a report shows. All of it is borrowed and read-only.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub params: &'a Parameters,
    pub analysis: &'a Analysis,
    pub inspection: &'a InspectionInfo,
    pub comments: &'a str,
    pub photos: &'a [AttachedPhoto],
    pub generated_at: DateTime<Utc>,
    pub data_fingerprint: Option<&'a str>,
}

// =============================================================================
// Builder
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReportDocumentBuilder {
    options: ReportOptions,
}

impl ReportDocumentBuilder {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn build(&self, input: &ReportInput<'_>) -> ReportDocument {
        let mut sections = vec![
            self.header(input),
            self.executive_summary(input),
            self.risk_analysis(input),
            self.recommendations(input),
            potential_map(),
            surface_3d(),
            self.gradient_map(input),
            self.gradient_methodology(input),
            self.gradient_points(input),
            self.uncertain_points(input),
            comments(input),
        ];
        if !input.photos.is_empty() {
            sections.push(photos(input));
        }
        sections.push(signature(input));

        log::debug!(
            "report assembled: {} section(s), {} recommendation(s)",
            sections.len(),
            input.analysis.recommendations.len()
        );

        ReportDocument {
            meta: ReportMeta {
                title: self.options.title.clone(),
                subtitle: SUBTITLE.to_string(),
                generated_at: input.generated_at,
                electrode: input.params.electrode().code().to_string(),
                data_fingerprint: input.data_fingerprint.map(str::to_string),
                footer: FOOTER.to_string(),
            },
            sections,
        }
    }

    fn num(&self, value: f64, decimals: usize) -> String {
        let s = format!("{value:.decimals$}");
        if self.options.decimal_separator == '.' {
            s
        } else {
            s.replace('.', &self.options.decimal_separator.to_string())
        }
    }

    // -------------------------------------------------------------------------
    // Sections
    // -------------------------------------------------------------------------

    fn header(&self, input: &ReportInput<'_>) -> Section {
        let info = input.inspection;
        let mut entries = vec![
            KeyValue::new("Report date", input.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()),
            KeyValue::new("Reference electrode", input.params.electrode().reference().label),
        ];
        if let Some(date) = info.date {
            entries.push(KeyValue::new("Inspection date", date.format("%Y-%m-%d").to_string()));
        }
        if !info.location.is_empty() {
            entries.push(KeyValue::new("Location", info.location.as_str()));
        }
        if let Some(fp) = input.data_fingerprint {
            entries.push(KeyValue::new("Data fingerprint", fp));
        }

        Section {
            id: SectionId::Header,
            title: self.options.title.clone(),
            blocks: vec![
                Block::Heading { level: 1, text: self.options.title.clone() },
                Block::TextBlock { text: SUBTITLE.to_string(), style: TextStyle::Caption },
                Block::KeyValueBox { title: "Survey".to_string(), entries },
            ],
        }
    }

    fn executive_summary(&self, input: &ReportInput<'_>) -> Section {
        let p = input.params;
        let s = &input.analysis.statistics;
        let resistivity = match p.resistivity_kohm_cm() {
            Some(r) => format!("{} kOhm.cm", self.num(r, 1)),
            None => "not measured".to_string(),
        };

        Section {
            id: SectionId::ExecutiveSummary,
            title: "Executive Summary".to_string(),
            blocks: vec![
                Block::KeyValueBox {
                    title: "Test Parameters".to_string(),
                    entries: vec![
                        KeyValue::new("Electrode", p.electrode().code()),
                        KeyValue::new("Cover depth", format!("{} mm", p.cover_depth_mm())),
                        KeyValue::new("Resistivity", resistivity),
                    ],
                },
                Block::KeyValueBox {
                    title: "Global Statistics".to_string(),
                    entries: vec![
                        KeyValue::new("Mean", format!("{} mV", self.num(s.mean, 0))),
                        KeyValue::new("Std. deviation", format!("{} mV", self.num(s.std_dev, 0))),
                        KeyValue::new(
                            "Range",
                            format!("{} to {} mV", self.num(s.min, 0), self.num(s.max, 0)),
                        ),
                        KeyValue::new("Points", s.total.to_string()),
                    ],
                },
                Block::TextBlock {
                    text: input.analysis.interpretation.text.clone(),
                    style: TextStyle::Emphasis,
                },
            ],
        }
    }

    fn risk_analysis(&self, input: &ReportInput<'_>) -> Section {
        let p = input.params;
        let s = &input.analysis.statistics;
        let severe = self.num(p.severe_threshold_mv(), 0);
        let low = self.num(p.low_threshold_mv(), 0);
        let row = |label: &str, range: String, count: usize, pct: f64| {
            vec![label.to_string(), range, count.to_string(), format!("{}%", self.num(pct, 1))]
        };
        let rows = vec![
            row(
                "High risk (>90% probability of corrosion)",
                format!("< {severe}"),
                s.severe.count,
                s.severe.percentage,
            ),
            row(
                "Uncertain (transition zone)",
                format!("{severe} to {low}"),
                s.uncertain.count,
                s.uncertain.percentage,
            ),
            row(
                "Low risk (>90% probability of no corrosion)",
                format!("> {low}"),
                s.low.count,
                s.low.percentage,
            ),
        ];

        Section {
            id: SectionId::RiskAnalysis,
            title: "Risk Analysis per ASTM C876".to_string(),
            blocks: vec![
                Block::Table(Table::limited(
                    &["Classification", "Range (mV)", "Points", "Share"],
                    rows,
                    3,
                )),
                Block::TextBlock {
                    text: format!(
                        "Thresholds per ASTM C876-15 for the {} reference electrode.",
                        p.electrode().code()
                    ),
                    style: TextStyle::Caption,
                },
                chart(ChartId::Histogram, Some("Distribution of potentials")),
                chart(ChartId::RiskPie, Some("Share of each risk band")),
            ],
        }
    }

    fn recommendations(&self, input: &ReportInput<'_>) -> Section {
        let recs = &input.analysis.recommendations;
        let blocks = if recs.is_empty() {
            vec![Block::TextBlock {
                text: "No recommendation applies to this survey.".to_string(),
                style: TextStyle::Placeholder,
            }]
        } else {
            recs.iter()
                .map(|r| Block::Callout {
                    severity: r.kind,
                    title: r.title.clone(),
                    body: r.description.clone(),
                    reference: r.standard_ref.clone(),
                })
                .collect()
        };

        Section {
            id: SectionId::Recommendations,
            title: "Technical Recommendations".to_string(),
            blocks,
        }
    }

    fn gradient_map(&self, input: &ReportInput<'_>) -> Section {
        let a = input.analysis;
        let mut blocks = vec![chart(ChartId::GradientMap, None)];
        if a.gradients.is_empty() {
            blocks.push(Block::TextBlock {
                text: "Gradients need at least two distinct coordinates on each axis.".to_string(),
                style: TextStyle::Placeholder,
            });
        } else {
            let g = &a.gradient_summary;
            blocks.push(Block::MetricTriplet {
                metrics: [
                    Metric {
                        label: "Maximum gradient".to_string(),
                        value: self.num(g.max, 1),
                        unit: "mV/m".to_string(),
                    },
                    Metric {
                        label: "Mean gradient".to_string(),
                        value: self.num(g.mean, 1),
                        unit: "mV/m".to_string(),
                    },
                    Metric {
                        label: format!("Critical points (>{CRITICAL_GRADIENT_MV_M} mV/m)"),
                        value: g.critical_count.to_string(),
                        unit: String::new(),
                    },
                ],
            });
        }

        Section {
            id: SectionId::GradientMap,
            title: "Potential Gradient Map".to_string(),
            blocks,
        }
    }

    fn gradient_methodology(&self, input: &ReportInput<'_>) -> Section {
        let g = &input.analysis.gradient_summary;
        let mut blocks = vec![
            Block::TextBlock {
                text: "The potential gradient is the largest change in potential between \
                       adjacent points divided by the distance between them:"
                    .to_string(),
                style: TextStyle::Normal,
            },
            Block::TextBlock {
                text: "Gradient = max(|dVx|/dx, |dVy|/dy) x 1000 [mV/m]".to_string(),
                style: TextStyle::Emphasis,
            },
            Block::TextBlock {
                text: "dVx and dVy are the potential differences between horizontally and \
                       vertically adjacent points; dx and dy are the measurement spacings."
                    .to_string(),
                style: TextStyle::Normal,
            },
            Block::TextBlock {
                text: format!(
                    "Above {MACROCELL_GRADIENT_MV_M} mV/m gradients indicate active corrosion \
                     macrocells. Above {CRITICAL_GRADIENT_MV_M} mV/m they call for attention \
                     as possible localized activity. Below {ELEVATED_GRADIENT_MV_M} mV/m \
                     conditions are fairly uniform. High gradients in regions of negative \
                     potential mark active anodic zones where corrosion is progressing."
                ),
                style: TextStyle::Normal,
            },
        ];
        if g.point_count > 0 {
            blocks.push(Block::TextBlock {
                text: format!(
                    "In this survey the maximum gradient is {} mV/m, the mean is {} mV/m and \
                     {} of {} point(s) exceed {CRITICAL_GRADIENT_MV_M} mV/m.",
                    self.num(g.max, 1),
                    self.num(g.mean, 1),
                    g.critical_count,
                    g.point_count
                ),
                style: TextStyle::Normal,
            });
        }

        Section {
            id: SectionId::GradientMethodology,
            title: "Gradient Calculation Methodology".to_string(),
            blocks,
        }
    }

    fn gradient_points(&self, input: &ReportInput<'_>) -> Section {
        let mut ranked: Vec<&GradientPoint> = input.analysis.gradients.iter().collect();
        // stable: ties keep scan order
        ranked.sort_by_key(|p| Reverse(OrderedFloat(p.gradient)));
        let rows = ranked
            .iter()
            .map(|p| {
                vec![
                    self.num(p.x, 2),
                    self.num(p.y, 2),
                    self.num(p.gradient, 1),
                    p.level().label().to_string(),
                ]
            })
            .collect();

        Section {
            id: SectionId::GradientPoints,
            title: "Highest Gradient Points".to_string(),
            blocks: vec![Block::Table(
                Table::limited(
                    &["X (m)", "Y (m)", "Gradient (mV/m)", "Status"],
                    rows,
                    self.options.table_row_limit,
                )
                .with_empty_text("No gradient points."),
            )],
        }
    }

    fn uncertain_points(&self, input: &ReportInput<'_>) -> Section {
        let rows = input
            .analysis
            .uncertain_points
            .iter()
            .map(|p| vec![self.num(p.x, 2), self.num(p.y, 2), self.num(p.value, 0)])
            .collect();

        Section {
            id: SectionId::UncertainPoints,
            title: "Points in the Uncertain Zone".to_string(),
            blocks: vec![
                Block::TextBlock {
                    text: "Points in the transition zone that need special attention.".to_string(),
                    style: TextStyle::Normal,
                },
                Block::Table(
                    Table::limited(
                        &["X (m)", "Y (m)", "Potential (mV)"],
                        rows,
                        self.options.table_row_limit,
                    )
                    .with_empty_text("No points in the uncertain zone."),
                ),
            ],
        }
    }
}

// -----------------------------------------------------------------------------
// Sections that need no formatting options
// -----------------------------------------------------------------------------

fn chart(chart: ChartId, caption: Option<&str>) -> Block {
    Block::ImagePlaceholder {
        chart,
        caption: caption.map(str::to_string),
        fallback: CHART_FALLBACK.to_string(),
    }
}

fn potential_map() -> Section {
    Section {
        id: SectionId::PotentialMap,
        title: "Potential Map (2D)".to_string(),
        blocks: vec![chart(ChartId::Potential2d, None)],
    }
}

fn surface_3d() -> Section {
    Section {
        id: SectionId::Surface3d,
        title: "3D Topography (Isometric View)".to_string(),
        blocks: vec![chart(
            ChartId::Surface3d,
            Some(
                "Isometric view of the potential surface. More negative values (valleys) \
                 indicate a higher probability of corrosion.",
            ),
        )],
    }
}

fn comments(input: &ReportInput<'_>) -> Section {
    let text = input.comments.trim();
    let block = if text.is_empty() {
        Block::TextBlock {
            text: COMMENTS_PLACEHOLDER.to_string(),
            style: TextStyle::Placeholder,
        }
    } else {
        Block::TextBlock { text: text.to_string(), style: TextStyle::Normal }
    };
    Section {
        id: SectionId::Comments,
        title: "Observations and Comments".to_string(),
        blocks: vec![block],
    }
}

fn photos(input: &ReportInput<'_>) -> Section {
    let rows: Vec<Vec<String>> = input
        .photos
        .iter()
        .map(|p| vec![p.id.clone(), p.name.clone(), p.description.clone()])
        .collect();
    let count = rows.len();
    Section {
        id: SectionId::Photos,
        title: "Photographic Record".to_string(),
        blocks: vec![Block::Table(Table::limited(&["ID", "Name", "Description"], rows, count))],
    }
}

fn signature(input: &ReportInput<'_>) -> Section {
    let info = input.inspection;
    let or_blank = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    Section {
        id: SectionId::Signature,
        title: "Technical Responsibility".to_string(),
        blocks: vec![Block::KeyValueBox {
            title: "Responsible Engineer".to_string(),
            entries: vec![
                KeyValue::new("Name", or_blank(&info.responsible_name)),
                KeyValue::new("Role", or_blank(&info.responsible_role)),
                KeyValue::new("Registration", or_blank(&info.registration)),
                KeyValue::new("ART", or_blank(&info.art)),
                KeyValue::new("Signature", ""),
                KeyValue::new("Date", ""),
            ],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potmap_core::{Electrode, GridModel};
    use potmap_engine::analyze;

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn build(grid: &GridModel, params: &Parameters, comments: &str) -> ReportDocument {
        let analysis = analyze(grid, params);
        let info = InspectionInfo::default();
        let input = ReportInput {
            params,
            analysis: &analysis,
            inspection: &info,
            comments,
            photos: &[],
            generated_at: fixed_time(),
            data_fingerprint: None,
        };
        ReportDocumentBuilder::default().build(&input)
    }

    fn sample() -> GridModel {
        GridModel::new(
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![vec![-0.40, -0.10], vec![-0.05, -0.02]],
        )
        .unwrap()
    }

    #[test]
    fn section_order_is_fixed() {
        let doc = build(&sample(), &Parameters::default(), "");
        let ids: Vec<SectionId> = doc.sections.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                SectionId::Header,
                SectionId::ExecutiveSummary,
                SectionId::RiskAnalysis,
                SectionId::Recommendations,
                SectionId::PotentialMap,
                SectionId::Surface3d,
                SectionId::GradientMap,
                SectionId::GradientMethodology,
                SectionId::GradientPoints,
                SectionId::UncertainPoints,
                SectionId::Comments,
                SectionId::Signature,
            ]
        );
        assert_eq!(doc.meta.electrode, "CSE");
    }

    #[test]
    fn empty_comments_get_placeholder() {
        let doc = build(&sample(), &Parameters::default(), "   ");
        let section = doc.section(SectionId::Comments).unwrap();
        assert_eq!(
            section.blocks[0],
            Block::TextBlock {
                text: COMMENTS_PLACEHOLDER.to_string(),
                style: TextStyle::Placeholder,
            }
        );
    }

    #[test]
    fn decimal_separator_applies_to_numbers() {
        let params = Parameters::default();
        let analysis = analyze(&sample(), &params);
        let info = InspectionInfo::default();
        let input = ReportInput {
            params: &params,
            analysis: &analysis,
            inspection: &info,
            comments: "",
            photos: &[],
            generated_at: fixed_time(),
            data_fingerprint: None,
        };
        let builder = ReportDocumentBuilder::new(ReportOptions {
            decimal_separator: ',',
            ..ReportOptions::default()
        });
        let doc = builder.build(&input);
        let section = doc.section(SectionId::GradientPoints).unwrap();
        let Block::Table(table) = &section.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0], vec!["0,00", "1,00", "350,0", "Critical"]);
    }

    #[test]
    fn single_row_grid_has_no_gradient_metrics() {
        let grid = GridModel::new(vec![0.0, 1.0], vec![0.0], vec![vec![-0.1, -0.5]]).unwrap();
        let doc = build(&grid, &Parameters::for_electrode(Electrode::Sce), "");
        let section = doc.section(SectionId::GradientMap).unwrap();
        assert!(section
            .blocks
            .iter()
            .all(|b| !matches!(b, Block::MetricTriplet { .. })));
        assert!(matches!(
            section.blocks.last(),
            Some(Block::TextBlock { style: TextStyle::Placeholder, .. })
        ));
    }
}
