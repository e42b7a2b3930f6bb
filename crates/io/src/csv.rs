// Grid CSV import/export
//
// Layout: first row is `Y/X` followed by the x coordinates, each further
// row is a y coordinate followed by that row's readings (volts). Numbers
// may use a comma as decimal separator.

use std::fmt;
use std::io::Read;
use std::path::Path;

use potmap_core::{CoreError, GridModel};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ImportError {
    /// Fewer than two non-comment lines (header plus one row).
    TooFewLines(usize),
    /// A line the CSV reader could not split.
    Row { line: usize, message: String },
    /// Parsed data does not form a valid grid.
    Shape(CoreError),
    Io(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewLines(n) => {
                write!(f, "invalid CSV: expected a header and at least one row, found {n} line(s)")
            }
            Self::Row { line, message } => write!(f, "line {line}: {message}"),
            Self::Shape(e) => write!(f, "invalid grid: {e}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<CoreError> for ImportError {
    fn from(e: CoreError) -> Self {
        Self::Shape(e)
    }
}

// ============================================================================
// Import
// ============================================================================

pub fn import(path: &Path) -> Result<GridModel, ImportError> {
    let content = read_file_as_utf8(path).map_err(ImportError::Io)?;
    import_from_string(&content)
}

/// Parse a grid. On error nothing is returned, so a caller holding a
/// previous grid keeps it untouched.
pub fn import_from_string(content: &str) -> Result<GridModel, ImportError> {
    let lines = data_lines(content);
    if lines.len() < 2 {
        return Err(ImportError::TooFewLines(lines.len()));
    }

    let delimiter = sniff_delimiter(lines[0].1);
    let header = split_record(lines[0], delimiter)?;
    let x_raw: Vec<f64> = header.iter().skip(1).map(|f| parse_number(f)).collect();

    let mut y_raw = Vec::new();
    let mut rows_raw = Vec::new();
    for &(line_no, text) in &lines[1..] {
        let fields = split_record((line_no, text), delimiter)?;
        if fields.len() < 2 {
            log::debug!("line {line_no}: skipped, no readings");
            continue;
        }
        let values: Vec<f64> = fields[1..].iter().map(|f| parse_number(f)).collect();
        if values.len() != x_raw.len() {
            return Err(ImportError::Shape(CoreError::Shape {
                row: rows_raw.len(),
                expected: x_raw.len(),
                found: values.len(),
            }));
        }
        y_raw.push(parse_number(&fields[0]));
        rows_raw.push(values);
    }

    let (x_vals, y_vals, matrix) = sort_axes(x_raw, y_raw, rows_raw);
    let grid = GridModel::new(x_vals, y_vals, matrix)?;
    log::debug!("imported {}x{} grid (delimiter {:?})", grid.rows(), grid.cols(), delimiter as char);
    Ok(grid)
}

/// Non-blank, non-comment lines with their 1-based line numbers in `content`.
fn data_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| {
            let t = l.trim();
            !t.is_empty() && !t.starts_with('#')
        })
        .collect()
}

/// `;` when the header line has one, `,` otherwise.
fn sniff_delimiter(header: &str) -> u8 {
    if header.contains(';') {
        b';'
    } else {
        b','
    }
}

fn split_record((line_no, text): (usize, &str), delimiter: u8) -> Result<Vec<String>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    match reader.records().next() {
        Some(Ok(record)) => Ok(record.iter().map(str::to_string).collect()),
        Some(Err(e)) => Err(ImportError::Row { line: line_no, message: e.to_string() }),
        None => Ok(Vec::new()),
    }
}

/// Permissive number parse: comma or dot decimal, anything unreadable is 0.
pub fn parse_number(field: &str) -> f64 {
    match field.trim().replace(',', ".").parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Sort x ascending and y descending, carrying every reading along with
/// its coordinates.
fn sort_axes(
    x: Vec<f64>,
    y: Vec<f64>,
    rows: Vec<Vec<f64>>,
) -> (Vec<f64>, Vec<f64>, Vec<Vec<f64>>) {
    let mut x_order: Vec<usize> = (0..x.len()).collect();
    x_order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
    let mut y_order: Vec<usize> = (0..y.len()).collect();
    y_order.sort_by(|&a, &b| y[b].total_cmp(&y[a]));

    let matrix = y_order
        .iter()
        .map(|&r| x_order.iter().map(|&c| rows[r][c]).collect())
        .collect();
    (
        x_order.iter().map(|&c| x[c]).collect(),
        y_order.iter().map(|&r| y[r]).collect(),
        matrix,
    )
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Spreadsheet exports on Windows
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

// ============================================================================
// Export
// ============================================================================

/// Comma decimal separator. Two decimals when that reads back exactly,
/// otherwise the shortest text that parses back to the same value.
fn format_number(v: f64) -> String {
    let fixed = format!("{v:.2}");
    let text = if fixed.parse::<f64>().ok() == Some(v) {
        fixed
    } else {
        v.to_string()
    };
    text.replace('.', ",")
}

fn records(grid: &GridModel) -> impl Iterator<Item = Vec<String>> + '_ {
    let header = std::iter::once("Y/X".to_string())
        .chain(grid.x_vals().iter().map(|&x| format_number(x)))
        .collect();
    std::iter::once(header).chain(grid.y_vals().iter().zip(grid.matrix()).map(|(&y, row)| {
        std::iter::once(format_number(y))
            .chain(row.iter().map(|&v| format_number(v)))
            .collect()
    }))
}

pub fn export_to_string(grid: &GridModel) -> String {
    let mut out = String::new();
    for record in records(grid) {
        out.push_str(&record.join(";"));
        out.push('\n');
    }
    out
}

pub fn export(grid: &GridModel, path: &Path) -> std::io::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)?;
    for record in records(grid) {
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_semicolon_with_decimal_commas() {
        let content = "Y/X;0,00;0,15;0,30\n1,94;-0,19;-0,17;-0,19\n1,84;-0,18;-0,22;-0,17\n";
        let grid = import_from_string(content).unwrap();
        assert_eq!(grid.x_vals(), &[0.0, 0.15, 0.30]);
        assert_eq!(grid.y_vals(), &[1.94, 1.84]);
        assert_eq!(grid.value(1, 1), Some(-0.22));
    }

    #[test]
    fn test_comma_delimiter_with_dot_decimals() {
        let content = "Y/X,0,1\n1,-0.40,-0.10\n0,-0.05,-0.02\n";
        let grid = import_from_string(content).unwrap();
        assert_eq!(grid.x_vals(), &[0.0, 1.0]);
        assert_eq!(grid.matrix()[0], vec![-0.40, -0.10]);
    }

    #[test]
    fn test_comments_and_single_field_rows_skipped() {
        let content = "# survey A\nY/X;0;1\n# row below\n1;-0,4;-0,1\nnotes\n0;-0,05;-0,02\n";
        let grid = import_from_string(content).unwrap();
        assert_eq!(grid.rows(), 2);
    }

    #[test]
    fn test_line_numbers_count_blank_lines() {
        let content = "\n\n# survey\nY/X;0;1\n\n1;-0,4;-0,1\n0;-0,05;-0,02\n";
        let numbers: Vec<usize> = data_lines(content).iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![4, 6, 7]);
        assert_eq!(import_from_string(content).unwrap().rows(), 2);
    }

    #[test]
    fn test_too_few_lines() {
        assert_eq!(import_from_string("Y/X;0;1\n"), Err(ImportError::TooFewLines(1)));
        assert_eq!(import_from_string("# only\n\n"), Err(ImportError::TooFewLines(0)));
    }

    #[test]
    fn test_non_numeric_becomes_zero() {
        let grid = import_from_string("Y/X;0;1\n0;abc;-0,1\n").unwrap();
        assert_eq!(grid.matrix()[0], vec![0.0, -0.1]);
        assert_eq!(parse_number("NaN"), 0.0);
        assert_eq!(parse_number(" 1,5 "), 1.5);
    }

    #[test]
    fn test_ragged_row_is_shape_error() {
        let err = import_from_string("Y/X;0;1\n0;-0,1\n").unwrap_err();
        assert!(matches!(err, ImportError::Shape(CoreError::Shape { row: 0, expected: 2, found: 1 })));
    }

    #[test]
    fn test_unsorted_axes_keep_values_with_coordinates() {
        // x given descending, y given ascending
        let content = "Y/X;1;0\n0;-0,02;-0,05\n1;-0,10;-0,40\n";
        let grid = import_from_string(content).unwrap();
        assert_eq!(grid.x_vals(), &[0.0, 1.0]);
        assert_eq!(grid.y_vals(), &[1.0, 0.0]);
        assert_eq!(grid.matrix()[0], vec![-0.40, -0.10]);
        assert_eq!(grid.matrix()[1], vec![-0.05, -0.02]);
    }

    #[test]
    fn test_duplicate_coordinate_rejected() {
        let err = import_from_string("Y/X;0;0\n0;-0,1;-0,2\n").unwrap_err();
        assert!(matches!(err, ImportError::Shape(CoreError::AxisOrder { .. })));
    }

    #[test]
    fn test_export_format() {
        let grid = GridModel::new(vec![0.0, 0.15], vec![1.94], vec![vec![-0.19, -0.171]]).unwrap();
        assert_eq!(export_to_string(&grid), "Y/X;0,00;0,15\n1,94;-0,19;-0,171\n");
    }

    #[test]
    fn test_close_coordinates_survive_export() {
        let grid = GridModel::new(vec![0.0, 0.004], vec![0.0], vec![vec![-0.30, -0.31]]).unwrap();
        let text = export_to_string(&grid);
        assert_eq!(text, "Y/X;0,00;0,004\n0,00;-0,30;-0,31\n");
        assert_eq!(import_from_string(&text).unwrap(), grid);
    }

    #[test]
    fn test_millivolt_readings_are_exact() {
        // -352 mV is severe for CSE; rounding to -0,35 would make it uncertain
        let grid = GridModel::new(vec![0.0], vec![0.0], vec![vec![-0.352]]).unwrap();
        let back = import_from_string(&export_to_string(&grid)).unwrap();
        assert_eq!(back.value(0, 0), Some(-0.352));
        assert_eq!(back, grid);
    }

    #[test]
    fn test_file_export_matches_string_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        let grid = GridModel::new(
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![vec![-0.40, -0.10], vec![-0.05, -0.02]],
        )
        .unwrap();

        export(&grid, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, export_to_string(&grid));
        assert_eq!(import(&path).unwrap(), grid);
    }

    #[test]
    fn test_windows_1252_file_decoded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // 0xB0 is the degree sign in Windows-1252, invalid as UTF-8
        fs::write(&path, b"# ponte \xB0\nY/X;0\n0;-0,3\n").unwrap();
        let grid = import(&path).unwrap();
        assert_eq!(grid.matrix()[0], vec![-0.3]);
    }
}
