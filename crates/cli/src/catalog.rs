// potmap electrodes - reference electrode catalog

use serde::Serialize;

use potmap_core::ElectrodeCatalog;

use crate::util::{json_bytes, write_output};
use crate::CliError;

#[derive(Serialize)]
struct CatalogEntry {
    code: &'static str,
    label: &'static str,
    severe_threshold_mv: f64,
    low_threshold_mv: f64,
}

pub fn cmd_electrodes(json: bool) -> Result<(), CliError> {
    let entries: Vec<CatalogEntry> = ElectrodeCatalog::all()
        .iter()
        .map(|r| CatalogEntry {
            code: r.electrode.code(),
            label: r.label,
            severe_threshold_mv: r.severe_threshold_mv,
            low_threshold_mv: r.low_threshold_mv,
        })
        .collect();

    if json {
        return write_output(None, &json_bytes(&entries)?);
    }

    let mut out = String::from("CODE     SEVERE (mV)  LOW (mV)  ELECTRODE\n");
    for e in &entries {
        out.push_str(&format!(
            "{:<8} {:>11}  {:>8}  {}\n",
            e.code, e.severe_threshold_mv, e.low_threshold_mv, e.label
        ));
    }
    write_output(None, out.as_bytes())
}
