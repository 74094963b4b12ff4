//! CSV export

use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::Result;

/// Write rows to `path` with headers taken from the field names.
///
/// Returns the number of data rows written. An empty slice produces an empty file.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}
