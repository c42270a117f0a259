//! Closing-price CSV export.
//!
//! Output is two columns (`date,close`), one row per record, no header.
//! Every record is decoded before the output path is touched, so a record
//! the provider cannot decode leaves any existing file intact.

use crate::data::{FetchError, PriceProvider, PriceRow, RecordSet};
use std::path::Path;

/// Decode `records` through `provider` and write them to `path`.
///
/// Returns the number of rows written, which always equals `records.len()`.
pub fn write_closes(
    path: &Path,
    provider: &dyn PriceProvider,
    records: &RecordSet,
) -> Result<usize, FetchError> {
    let rows = records
        .records()
        .iter()
        .map(|record| provider.decode_row(record))
        .collect::<Result<Vec<_>, _>>()?;

    write_rows(path, &rows)?;
    log::info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// Create or truncate `path` and write `rows` in order.
pub fn write_rows(path: &Path, rows: &[PriceRow]) -> Result<(), FetchError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
