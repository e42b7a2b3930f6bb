// potmap grid - blank template for field readings

use std::path::PathBuf;

use potmap_core::GridModel;

use crate::util::write_output;
use crate::CliError;

pub fn cmd_grid(x: Vec<f64>, y: Vec<f64>, output: Option<PathBuf>) -> Result<(), CliError> {
    let grid = GridModel::blank(x, y).map_err(|e| CliError::args(e.to_string()))?;
    if grid.is_empty() {
        return Err(CliError::args("--x and --y each need at least one coordinate"));
    }
    write_output(output.as_deref(), potmap_io::csv::export_to_string(&grid).as_bytes())?;
    if let Some(path) = &output {
        eprintln!("wrote {} ({} x {} template)", path.display(), grid.rows(), grid.cols());
    }
    Ok(())
}
