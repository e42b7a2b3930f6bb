// potmap report / potmap validate - survey job files

use std::path::{Path, PathBuf};

use chrono::Utc;

use potmap_config::{Settings, SurveyConfig};
use potmap_core::{GridModel, Parameters};
use potmap_engine::analyze;
use potmap_io::{JsonDocumentWriter, MarkdownDocumentWriter};
use potmap_report::{render, DocumentWriter, NoCharts, ReportDocumentBuilder, ReportInput};

use crate::util::write_output;
use crate::{CliError, ReportFormat};

/// A job file with its grid loaded and parameters resolved.
struct Job {
    config: SurveyConfig,
    params: Parameters,
    grid: GridModel,
}

fn load_job(settings: &Settings, path: &Path) -> Result<Job, CliError> {
    let config = SurveyConfig::load(path)?;
    let base = settings
        .default_parameters()
        .map_err(|e| CliError::from(potmap_config::ConfigError::Core(e)))?;
    let params = config.parameters_with(&base)?;
    let grid = potmap_io::csv::import(&config.grid)?;
    Ok(Job { config, params, grid })
}

fn resolve_format(format: Option<ReportFormat>, output: Option<&Path>) -> Result<ReportFormat, CliError> {
    if let Some(f) = format {
        return Ok(f);
    }
    let Some(path) = output else {
        return Ok(ReportFormat::Markdown);
    };
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("json") => Ok(ReportFormat::Json),
        Some("md") | Some("markdown") => Ok(ReportFormat::Markdown),
        _ => Err(CliError::args(format!(
            "cannot infer report format from {}",
            path.display()
        ))
        .with_hint("use --format json|markdown, or an .json/.md output file")),
    }
}

pub fn cmd_report(
    settings: &Settings,
    survey: PathBuf,
    output: Option<PathBuf>,
    format: Option<ReportFormat>,
) -> Result<(), CliError> {
    let format = resolve_format(format, output.as_deref())?;
    let job = load_job(settings, &survey)?;
    let analysis = analyze(&job.grid, &job.params);
    let fingerprint = potmap_io::fingerprint(&job.grid);

    let input = ReportInput {
        params: &job.params,
        analysis: &analysis,
        inspection: &job.config.inspection,
        comments: &job.config.comments,
        photos: &job.config.photos,
        generated_at: Utc::now(),
        data_fingerprint: Some(fingerprint.as_str()),
    };
    let document = ReportDocumentBuilder::new(settings.report_options()).build(&input);

    let writer: &dyn DocumentWriter = match format {
        ReportFormat::Json => &JsonDocumentWriter,
        ReportFormat::Markdown => &MarkdownDocumentWriter,
    };
    let bytes = render(&document, &NoCharts, writer)?;
    write_output(output.as_deref(), &bytes)?;

    if let Some(path) = &output {
        eprintln!(
            "wrote {} ({} sections, {} recommendations)",
            path.display(),
            document.sections.len(),
            analysis.recommendations.len()
        );
    }
    Ok(())
}

pub fn cmd_validate(settings: &Settings, survey: PathBuf) -> Result<(), CliError> {
    let job = load_job(settings, &survey)?;
    println!(
        "ok: {} x {} grid, electrode {} ({} / {} mV), {} photo(s)",
        job.grid.rows(),
        job.grid.cols(),
        job.params.electrode(),
        job.params.severe_threshold_mv(),
        job.params.low_threshold_mv(),
        job.config.photos.len()
    );
    if job.grid.has_degenerate_axis() {
        eprintln!("note: grid has a single row or column; no gradients will be computed");
    }
    Ok(())
}
