// potmap analyze - statistics, verdict and recommendations for one grid

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use potmap_config::{ParameterOverrides, Settings};
use potmap_core::{Electrode, GridModel, Parameters};
use potmap_engine::{analyze, Analysis};

use crate::util::{json_bytes, write_output};
use crate::CliError;

/// Parameter flags as given on the command line.
pub struct Overrides {
    pub electrode: Option<Electrode>,
    pub severe: Option<f64>,
    pub low: Option<f64>,
    pub cover_depth: Option<u32>,
    pub resistivity: Option<f64>,
}

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    grid: GridSummary,
    parameters: &'a Parameters,
    #[serde(flatten)]
    analysis: &'a Analysis,
}

#[derive(Serialize)]
struct GridSummary {
    rows: usize,
    cols: usize,
    fingerprint: String,
}

pub fn cmd_analyze(
    settings: &Settings,
    grid_path: PathBuf,
    flags: Overrides,
    json: bool,
) -> Result<(), CliError> {
    let base = settings
        .default_parameters()
        .map_err(|e| CliError::from(potmap_config::ConfigError::Core(e)))?;
    let overrides = ParameterOverrides {
        electrode: flags.electrode,
        cover_depth_mm: flags.cover_depth,
        resistivity_kohm_cm: flags.resistivity,
        thresholds: flags.severe.zip(flags.low),
    };
    let params = overrides
        .apply(&base)
        .map_err(|e| CliError::args(e.to_string()))?;

    log::debug!(
        "parameters: electrode {}, thresholds {} / {} mV, cover {} mm",
        params.electrode(),
        params.severe_threshold_mv(),
        params.low_threshold_mv(),
        params.cover_depth_mm()
    );

    let grid = potmap_io::csv::import(&grid_path)?;
    let analysis = analyze(&grid, &params);

    if json {
        let output = AnalyzeOutput {
            grid: GridSummary {
                rows: grid.rows(),
                cols: grid.cols(),
                fingerprint: potmap_io::fingerprint(&grid),
            },
            parameters: &params,
            analysis: &analysis,
        };
        return write_output(None, &json_bytes(&output)?);
    }

    write_output(None, summary(&grid, &params, &analysis).as_bytes())
}

/// Human-readable summary.
fn summary(grid: &GridModel, params: &Parameters, a: &Analysis) -> String {
    let s = &a.statistics;
    let g = &a.gradient_summary;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Grid:       {} x {} ({} points), electrode {} ({} / {} mV)",
        grid.rows(),
        grid.cols(),
        grid.len(),
        params.electrode(),
        params.severe_threshold_mv(),
        params.low_threshold_mv()
    );
    let _ = writeln!(out, "Severe:     {:>4} ({:>5.1}%)", s.severe.count, s.severe.percentage);
    let _ = writeln!(out, "Uncertain:  {:>4} ({:>5.1}%)", s.uncertain.count, s.uncertain.percentage);
    let _ = writeln!(out, "Low:        {:>4} ({:>5.1}%)", s.low.count, s.low.percentage);
    let _ = writeln!(
        out,
        "Potential:  mean {:.0} mV, std dev {:.0} mV, range {:.0} to {:.0} mV",
        s.mean, s.std_dev, s.min, s.max
    );
    if a.degenerate_axis {
        let _ = writeln!(out, "Gradients:  none (grid needs two rows and two columns)");
    } else {
        let _ = writeln!(
            out,
            "Gradients:  max {:.1} mV/m, mean {:.1} mV/m, {} critical",
            g.max, g.mean, g.critical_count
        );
    }
    let _ = writeln!(out, "\n{}", a.interpretation.text);

    if !a.recommendations.is_empty() {
        let _ = writeln!(out, "\nRecommendations:");
        for r in &a.recommendations {
            let _ = writeln!(out, "  [{}] {}", r.kind, r.title);
            let _ = writeln!(out, "      {}", r.description);
            if let Some(reference) = &r.standard_ref {
                let _ = writeln!(out, "      ({reference})");
            }
        }
    }
    out
}
