// Grid fingerprint

use sha2::{Digest, Sha256};

use potmap_core::GridModel;

use crate::csv::export_to_string;

/// SHA-256 of the canonical CSV export → "sha256:<64 hex>".
pub fn fingerprint(grid: &GridModel) -> String {
    let mut hasher = Sha256::new();
    hasher.update(export_to_string(grid).as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}
