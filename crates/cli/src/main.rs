// potmap - half-cell potential mapping (ASTM C876) from the command line

mod analyze;
mod catalog;
mod exit_codes;
mod grid;
mod report;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use potmap_config::{ConfigError, Settings};
use potmap_core::{CoreError, Electrode};
use potmap_io::ImportError;
use potmap_report::ReportError;

use exit_codes::{
    config_exit_code, import_exit_code, report_exit_code, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "potmap")]
#[command(about = "Corrosion risk mapping from half-cell potential surveys (ASTM C876)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log pipeline details to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Settings file (defaults to the user config dir)
    #[arg(long, global = true, env = "POTMAP_SETTINGS", value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a grid and print statistics and recommendations
    #[command(after_help = "\
Examples:
  potmap analyze deck.csv
  potmap analyze deck.csv --electrode SCE --cover-depth 45
  potmap analyze deck.csv --severe=-300 --low=-180 --json")]
    Analyze {
        /// Grid CSV (`Y/X` header, one row per y coordinate)
        grid: PathBuf,

        /// Reference electrode (CSE, SCE, AgAgCl)
        #[arg(long, short = 'e', value_parser = parse_electrode)]
        electrode: Option<Electrode>,

        /// Severe threshold in mV (requires --low)
        #[arg(long, requires = "low", allow_negative_numbers = true)]
        severe: Option<f64>,

        /// Low-risk threshold in mV (requires --severe)
        #[arg(long, requires = "severe", allow_negative_numbers = true)]
        low: Option<f64>,

        /// Concrete cover depth in mm
        #[arg(long)]
        cover_depth: Option<u32>,

        /// Concrete resistivity in kOhm.cm
        #[arg(long)]
        resistivity: Option<f64>,

        /// Emit JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Run a survey job file and render its report
    #[command(after_help = "\
Examples:
  potmap report survey.toml
  potmap report survey.toml -o report.md
  potmap report survey.toml -o out.txt --format json")]
    Report {
        /// Survey job file (TOML)
        survey: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format (inferred from the output extension)
        #[arg(long, short = 'f')]
        format: Option<ReportFormat>,
    },

    /// Check a survey job file and its grid without rendering
    Validate {
        /// Survey job file (TOML)
        survey: PathBuf,
    },

    /// Write a blank grid template
    #[command(after_help = "\
Examples:
  potmap grid --x 0,0.15,0.30 --y 1.94,1.84,1.74
  potmap grid --x 0,0.5,1 --y 2,1.5,1,0.5,0 -o template.csv")]
    Grid {
        /// X coordinates in metres, comma-separated
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        x: Vec<f64>,

        /// Y coordinates in metres, comma-separated
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        y: Vec<f64>,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List reference electrodes and their thresholds
    Electrodes {
        /// Emit JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Markdown,
}

fn parse_electrode(s: &str) -> Result<Electrode, String> {
    s.parse::<Electrode>().map_err(|e| e.to_string())
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:   potmap-engine ", env!("CARGO_PKG_VERSION"),
        "\nbuild:    ", env!("POTMAP_BUILD_PROFILE"),
        "\ntarget:   ", env!("POTMAP_BUILD_TARGET"),
        "\nstandard: ASTM C876-15",
    )
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn load_settings(path: Option<PathBuf>) -> Settings {
    let path = path.unwrap_or_else(Settings::config_path);
    let settings = Settings::load_from(&path);
    log::debug!(
        "settings {}: electrode {}, cover {} mm",
        path.display(),
        settings.electrode,
        settings.cover_depth_mm
    );
    settings
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = load_settings(cli.settings);

    let result = match cli.command {
        Commands::Analyze {
            grid,
            electrode,
            severe,
            low,
            cover_depth,
            resistivity,
            json,
        } => analyze::cmd_analyze(
            &settings,
            grid,
            analyze::Overrides { electrode, severe, low, cover_depth, resistivity },
            json,
        ),
        Commands::Report { survey, output, format } => {
            report::cmd_report(&settings, survey, output, format)
        }
        Commands::Validate { survey } => report::cmd_validate(&settings, survey),
        Commands::Grid { x, y, output } => grid::cmd_grid(x, y, output),
        Commands::Electrodes { json } => catalog::cmd_electrodes(json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ImportError> for CliError {
    fn from(err: ImportError) -> Self {
        let hint = match &err {
            ImportError::TooFewLines(_) => {
                Some("a grid needs a `Y/X` header row followed by one row per y coordinate")
            }
            ImportError::Shape(CoreError::AxisOrder { .. }) => {
                Some("every x and y coordinate must appear once")
            }
            ImportError::Shape(CoreError::Shape { .. }) => {
                Some("each row needs one reading per x coordinate")
            }
            _ => None,
        };
        Self {
            code: import_exit_code(&err),
            message: err.to_string(),
            hint: hint.map(str::to_string),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::Core(CoreError::UnknownElectrode(_)) => {
                Some("known electrodes: CSE, SCE, AgAgCl (see `potmap electrodes`)")
            }
            ConfigError::Parse(_) => Some("check the TOML syntax; dates are quoted, e.g. date = \"2026-03-14\""),
            _ => None,
        };
        Self {
            code: config_exit_code(&err),
            message: err.to_string(),
            hint: hint.map(str::to_string),
        }
    }
}

impl From<ReportError> for CliError {
    fn from(err: ReportError) -> Self {
        Self::new(report_exit_code(&err), err.to_string())
    }
}
