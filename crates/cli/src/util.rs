use std::io::{self, Write};
use std::path::Path;

use crate::exit_codes::EXIT_REPORT_OUTPUT;
use crate::CliError;

/// Write `bytes` to `output`, or to stdout when `None`.
pub(crate) fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<(), CliError> {
    match output {
        Some(path) => std::fs::write(path, bytes).map_err(|e| {
            CliError::new(EXIT_REPORT_OUTPUT, format!("cannot write {}: {e}", path.display()))
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|_| stdout.flush())
                .map_err(|e| CliError::new(EXIT_REPORT_OUTPUT, format!("stdout: {e}")))
        }
    }
}

/// Pretty JSON plus trailing newline.
pub(crate) fn json_bytes<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, CliError> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| CliError::new(crate::exit_codes::EXIT_ERROR, e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}
